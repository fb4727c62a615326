//! Client connection handle

use std::net::SocketAddr;

use ferry_net::{fault, Connection, Frame};
use ferry_record::codec;
use ferry_record::{ArrayMap, Table};
use tokio::net::ToSocketAddrs;

use crate::{Error, Result};

/// Connection handle to a ferry server
///
/// The handle owns its connection. Dropping it releases the socket on
/// every exit path; [`Client::close`] shuts it down eagerly.
pub struct Client {
    conn: Connection,
}

impl Client {
    /// Connect to a server
    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Self> {
        let conn = Connection::connect(addr).await?;
        tracing::debug!("Connected to {}", conn.peer_addr()?);
        Ok(Self { conn })
    }

    /// Remote server address
    pub fn peer_addr(&self) -> Result<SocketAddr> {
        Ok(self.conn.peer_addr()?)
    }

    /// Encode `arrays` and store the table on the server under `command`
    ///
    /// Absent entries are dropped during encoding. A mapping with no
    /// entries at all is rejected locally without touching the server.
    pub async fn write(&mut self, command: &str, arrays: &ArrayMap) -> Result<()> {
        let table = codec::encode(arrays)?;

        self.conn
            .send_frame(&Frame::Put {
                command: command.to_string(),
                table,
            })
            .await?;

        match self.conn.recv_frame().await? {
            Frame::PutOk { .. } => Ok(()),
            Frame::Error { code, message } => Err(map_fault(command, code, message)),
            _ => Err(Error::UnexpectedFrame { expected: "PUT_OK" }),
        }
    }

    /// Fetch the transformed table stored under `command`
    pub async fn get(&mut self, command: &str) -> Result<Table> {
        self.conn
            .send_frame(&Frame::Get {
                command: command.to_string(),
            })
            .await?;

        match self.conn.recv_frame().await? {
            Frame::Table(table) => Ok(table),
            Frame::Error { code, message } => Err(map_fault(command, code, message)),
            _ => Err(Error::UnexpectedFrame { expected: "TABLE" }),
        }
    }

    /// Store `arrays` under `command` and return the transformed result
    ///
    /// This is two round trips, a write followed by a get. Another client
    /// writing to the same command in between changes what comes back.
    pub async fn compute(&mut self, command: &str, arrays: &ArrayMap) -> Result<ArrayMap> {
        self.write(command, arrays).await?;
        let table = self.get(command).await?;
        Ok(codec::decode(&table)?)
    }

    /// Shut the connection down gracefully
    pub async fn close(self) -> Result<()> {
        self.conn.close().await?;
        Ok(())
    }
}

/// Map a wire fault onto the matching error kind
fn map_fault(command: &str, code: u32, message: String) -> Error {
    match code {
        fault::NOT_FOUND => Error::NotFound {
            command: command.to_string(),
        },
        fault::TRANSFORM => Error::Transform { message },
        _ => Error::Server { code, message },
    }
}
