//! Connection lifecycle for a single exchange.

use crate::error::ClientError;
use hl7wire_protocol::Decoder;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// Default read buffer size (8 KiB).
pub const DEFAULT_READ_BUFFER_SIZE: usize = 8 * 1024;

/// Minimum read buffer size (1 KiB).
pub const MIN_READ_BUFFER_SIZE: usize = 1024;

/// Maximum read buffer size (1 MiB).
pub const MAX_READ_BUFFER_SIZE: usize = 1024 * 1024;

/// Connection configuration.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Receiver address.
    pub addr: SocketAddr,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Timeout for each read while awaiting the acknowledgment.
    pub read_timeout: Duration,
    /// Read buffer size for socket reads.
    pub read_buffer_size: usize,
}

impl ConnectionConfig {
    pub fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(30),
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn with_read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size.clamp(MIN_READ_BUFFER_SIZE, MAX_READ_BUFFER_SIZE);
        self
    }
}

/// A connection carrying exactly one framed exchange.
///
/// The socket is owned by this value, so it closes when the value is dropped
/// on any path, success or failure. A connection is never reused.
pub(crate) struct Connection {
    stream: TcpStream,
    read_timeout: Duration,
    read_buffer_size: usize,
}

impl Connection {
    /// Opens a fresh TCP connection to the receiver.
    pub(crate) async fn open(config: &ConnectionConfig) -> Result<Self, ClientError> {
        tracing::debug!("Connecting to {}...", config.addr);

        let stream = tokio::time::timeout(config.connect_timeout, TcpStream::connect(config.addr))
            .await
            .map_err(|_| {
                tracing::debug!("Connection timeout");
                ClientError::ConnectTimeout(config.connect_timeout)
            })?
            .map_err(|e| {
                tracing::debug!("Connection failed: {}", e);
                ClientError::Connect(e)
            })?;

        stream.set_nodelay(true).ok();
        tracing::debug!("TCP connected");

        Ok(Self {
            stream,
            read_timeout: config.read_timeout,
            read_buffer_size: config.read_buffer_size,
        })
    }

    /// Writes the entire framed message, then flushes.
    pub(crate) async fn send_frame(&mut self, framed: &[u8]) -> Result<(), ClientError> {
        self.stream
            .write_all(framed)
            .await
            .map_err(ClientError::Send)?;
        self.stream.flush().await.map_err(ClientError::Send)?;

        tracing::debug!("Frame sent ({} bytes), awaiting acknowledgment", framed.len());
        Ok(())
    }

    /// Reads until a complete acknowledgment frame arrives or the peer closes.
    pub(crate) async fn read_ack(&mut self) -> Result<String, ClientError> {
        let mut decoder = Decoder::new();
        let mut buf = vec![0u8; self.read_buffer_size];

        loop {
            let n = tokio::time::timeout(self.read_timeout, self.stream.read(&mut buf))
                .await
                .map_err(|_| {
                    tracing::debug!("Read timeout with {} bytes buffered", decoder.buffered());
                    ClientError::ReceiveTimeout(self.read_timeout)
                })?
                .map_err(ClientError::Receive)?;

            if n == 0 {
                tracing::debug!("Peer closed with {} bytes buffered", decoder.buffered());
                // Peer closed without terminating the frame: decode whatever
                // arrived, matching the tolerant unwrap on the framing layer.
                return match decoder.finish()? {
                    Some(ack) => Ok(ack),
                    None => Err(ClientError::ConnectionClosed),
                };
            }

            decoder.extend(&buf[..n]);
            if let Some(ack) = decoder.decode_frame()? {
                tracing::debug!("Acknowledgment frame complete");
                return Ok(ack);
            }
        }
    }

    /// Shuts the stream down, signalling the peer the exchange is over.
    pub(crate) async fn close(mut self) {
        let _ = self.stream.shutdown().await;
    }
}
