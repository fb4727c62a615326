//! TCP transport: framed connections and the listener

use std::net::SocketAddr;

use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};

use crate::codec::Frame;
use crate::{Error, Result};

/// Initial read buffer capacity
const READ_BUF_SIZE: usize = 8 * 1024;

/// A framed connection over TCP
///
/// The connection is owned by whoever holds it and the socket is released
/// when it drops; [`Connection::close`] shuts the stream down eagerly.
pub struct Connection {
    stream: TcpStream,
    buf: BytesMut,
}

impl Connection {
    /// Wrap an accepted stream
    pub fn new(stream: TcpStream) -> Self {
        Self {
            stream,
            buf: BytesMut::with_capacity(READ_BUF_SIZE),
        }
    }

    /// Connect to a remote listener
    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Self> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|e| Error::Connection(format!("Failed to connect: {}", e)))?;
        Ok(Self::new(stream))
    }

    /// Remote peer address
    pub fn peer_addr(&self) -> Result<SocketAddr> {
        Ok(self.stream.peer_addr()?)
    }

    /// Send a single frame
    pub async fn send_frame(&mut self, frame: &Frame) -> Result<()> {
        let mut buf = BytesMut::new();
        frame.encode(&mut buf)?;

        tracing::trace!("Sending frame type {} ({} bytes)", frame.frame_type(), buf.len());

        self.stream
            .write_all(&buf)
            .await
            .map_err(|e| Error::Connection(format!("Failed to send frame: {}", e)))?;

        Ok(())
    }

    /// Receive the next frame
    ///
    /// Returns `Ok(None)` when the peer closes the connection at a frame
    /// boundary. Closing mid-frame is a connection error.
    pub async fn next_frame(&mut self) -> Result<Option<Frame>> {
        loop {
            if let Some(frame) = Frame::decode(&mut self.buf)? {
                tracing::trace!("Received frame type {}", frame.frame_type());
                return Ok(Some(frame));
            }

            let n = self
                .stream
                .read_buf(&mut self.buf)
                .await
                .map_err(|e| Error::Connection(format!("Failed to receive: {}", e)))?;

            if n == 0 {
                if self.buf.is_empty() {
                    return Ok(None);
                }
                return Err(Error::Connection("Connection closed mid-frame".into()));
            }
        }
    }

    /// Receive the next frame, treating a closed connection as an error
    pub async fn recv_frame(&mut self) -> Result<Frame> {
        self.next_frame()
            .await?
            .ok_or_else(|| Error::Connection("Connection closed".into()))
    }

    /// Shut the connection down gracefully
    pub async fn close(mut self) -> Result<()> {
        self.stream.shutdown().await?;
        Ok(())
    }
}

/// Listener accepting framed connections
pub struct Listener {
    inner: TcpListener,
}

impl Listener {
    /// Bind to an address
    pub async fn bind(addr: impl ToSocketAddrs) -> Result<Self> {
        let inner = TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Connection(format!("Failed to bind: {}", e)))?;
        Ok(Self { inner })
    }

    /// Accept the next connection
    pub async fn accept(&self) -> Result<(Connection, SocketAddr)> {
        let (stream, peer) = self
            .inner
            .accept()
            .await
            .map_err(|e| Error::Connection(format!("Failed to accept: {}", e)))?;

        tracing::debug!("Accepted connection from {}", peer);

        Ok((Connection::new(stream), peer))
    }

    /// Local bound address
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.inner
            .local_addr()
            .map_err(|e| Error::Connection(format!("Failed to get local address: {}", e)))
    }
}
