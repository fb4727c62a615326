//! The accept loop: frames in, dispatcher calls, frames out

use std::net::SocketAddr;
use std::sync::Arc;

use ferry_net::frames::fault;
use ferry_net::transport::{Connection, Listener};
use ferry_net::Frame;
use tokio::sync::Notify;

use crate::config::ServerConfig;
use crate::dispatch::{Dispatcher, Transform};
use crate::{Error, Result};

/// Table server: accepts framed connections and feeds them to a dispatcher
///
/// The listener is bound when the server is built, so binding port 0 and
/// reading [`Server::local_addr`] works for tests and ephemeral setups.
pub struct Server {
    listener: Listener,
    dispatcher: Arc<Dispatcher>,
    shutdown: Arc<Notify>,
}

impl Server {
    /// Bind a server that answers GETs through the given transform
    pub async fn bind(config: &ServerConfig, transform: impl Transform + 'static) -> Result<Self> {
        let addr = config.socket_addr()?;
        let listener = Listener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        Ok(Self {
            listener,
            dispatcher: Arc::new(Dispatcher::new(transform)),
            shutdown: Arc::new(Notify::new()),
        })
    }

    /// The dispatcher serving this server
    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Local bound address
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections until shutdown
    ///
    /// Each connection gets its own task and is answered frame by frame
    /// until the peer hangs up. A failed request answers with an ERROR
    /// frame; it does not tear the connection down. A failed accept is
    /// logged and the loop keeps listening.
    pub async fn serve(&self) -> Result<()> {
        loop {
            tokio::select! {
                _ = self.shutdown.notified() => {
                    tracing::info!("Server shutting down");
                    return Ok(());
                }
                accepted = self.listener.accept() => {
                    match accepted {
                        Ok((conn, peer)) => {
                            let dispatcher = self.dispatcher.clone();
                            tokio::spawn(async move {
                                if let Err(e) = handle_connection(conn, dispatcher).await {
                                    tracing::warn!("Connection from {} failed: {}", peer, e);
                                }
                            });
                        }
                        Err(e) => {
                            tracing::warn!("Failed to accept connection: {}", e);
                        }
                    }
                }
            }
        }
    }

    /// Signal the accept loop to stop
    ///
    /// In-flight connection tasks finish on their own.
    pub fn shutdown(&self) {
        self.shutdown.notify_one();
    }
}

/// Answer frames on one connection until the peer hangs up
async fn handle_connection(mut conn: Connection, dispatcher: Arc<Dispatcher>) -> Result<()> {
    while let Some(frame) = conn.next_frame().await? {
        let response = match frame {
            Frame::Put { command, table } => {
                dispatcher.put(command.clone(), table);
                Frame::PutOk { command }
            }
            Frame::Get { command } => match dispatcher.get(&command) {
                Ok(table) => Frame::Table(table),
                Err(e) => {
                    tracing::debug!("GET {:?} failed: {}", command, e);
                    error_frame(&e)
                }
            },
            other => {
                tracing::warn!("Unexpected frame type {} from peer", other.frame_type());
                Frame::Error {
                    code: fault::INTERNAL,
                    message: format!("Unexpected frame type: {}", other.frame_type()),
                }
            }
        };
        conn.send_frame(&response).await?;
    }
    Ok(())
}

/// Map a dispatcher error onto a wire fault
fn error_frame(err: &Error) -> Frame {
    use ferry_record::Error as RecordError;

    let code = match err {
        Error::NotFound { .. } => fault::NOT_FOUND,
        Error::Codec(RecordError::EmptyInput) => fault::EMPTY_INPUT,
        Error::Codec(RecordError::EmptyTable | RecordError::ShapeMismatch { .. }) => {
            fault::BAD_TABLE
        }
        Error::Transform { .. } => fault::TRANSFORM,
        _ => fault::INTERNAL,
    };

    Frame::Error {
        code,
        message: err.to_string(),
    }
}
