//! High-level MLLP client.

use crate::connection::{Connection, ConnectionConfig};
use crate::error::ClientError;
use hl7wire_protocol::frame;
use std::net::SocketAddr;

/// An MLLP sending client.
///
/// Holds only configuration. Every [`exchange`](Client::exchange) opens its
/// own connection and discards it afterwards, so sequential exchanges share
/// no state and no sockets.
pub struct Client {
    config: ConnectionConfig,
}

impl Client {
    /// Creates a new client with the given configuration.
    pub fn new(config: ConnectionConfig) -> Self {
        Self { config }
    }

    /// Returns the configured receiver endpoint.
    pub fn endpoint(&self) -> SocketAddr {
        self.config.addr
    }

    /// Performs one request/response exchange.
    ///
    /// Wraps `payload` in MLLP framing, delivers it over a fresh TCP
    /// connection, reads the framed response until its trailer (or the peer
    /// closes), and returns the unwrapped acknowledgment text.
    ///
    /// The connection closes on every exit path. On failure the delivery is
    /// unconfirmed rather than known-failed: the receiver may have processed
    /// the message even though no acknowledgment came back.
    pub async fn exchange(&self, payload: &str) -> Result<String, ClientError> {
        let framed = frame::wrap(payload);

        let mut conn = Connection::open(&self.config).await?;
        conn.send_frame(&framed).await?;
        let ack = conn.read_ack().await?;
        conn.close().await;

        tracing::debug!("Exchange complete ({} byte acknowledgment)", ack.len());
        Ok(ack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use hl7wire_protocol::TRAILER;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    /// Reads one inbound frame (up to and including the trailer).
    async fn read_frame(sock: &mut TcpStream) -> Vec<u8> {
        let mut received = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = sock.read(&mut buf).await.unwrap();
            if n == 0 {
                return received;
            }
            received.extend_from_slice(&buf[..n]);
            if received.windows(2).any(|w| w == TRAILER) {
                return received;
            }
        }
    }

    async fn spawn_acker(ack: &'static [u8]) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut sock, _)) = listener.accept().await {
                tokio::spawn(async move {
                    read_frame(&mut sock).await;
                    sock.write_all(ack).await.unwrap();
                });
            }
        });
        addr
    }

    #[tokio::test]
    async fn test_exchange_returns_unwrapped_ack() {
        let addr = spawn_acker(b"\x0bACK\x1c\x0d").await;
        let client = Client::new(ConnectionConfig::new(addr));
        assert_eq!(client.exchange("HELLO").await.unwrap(), "ACK");
    }

    #[tokio::test]
    async fn test_wire_frame_is_byte_exact() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel();

        tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let received = read_frame(&mut sock).await;
            sock.write_all(b"\x0bAA\x1c\x0d").await.unwrap();
            tx.send(received).unwrap();
        });

        let client = Client::new(ConnectionConfig::new(addr));
        client.exchange("HELLO").await.unwrap();
        assert_eq!(rx.await.unwrap(), b"\x0bHELLO\x1c\x0d");
    }

    #[tokio::test]
    async fn test_connection_refused() {
        // Bind then drop to obtain a port with no listener behind it.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = Client::new(
            ConnectionConfig::new(addr).with_connect_timeout(Duration::from_secs(2)),
        );
        let err = client.exchange("HELLO").await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Connection);
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_ack_split_across_segments() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            read_frame(&mut sock).await;
            for chunk in [&b"\x0bMSH|^~\\&|"[..], &b"RCV\x0dMSA|AA|1\x1c"[..], &b"\x0d"[..]] {
                sock.write_all(chunk).await.unwrap();
                sock.flush().await.unwrap();
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        });

        let client = Client::new(ConnectionConfig::new(addr));
        let ack = client.exchange("HELLO").await.unwrap();
        assert_eq!(ack, "MSH|^~\\&|RCV\x0dMSA|AA|1");
    }

    #[tokio::test]
    async fn test_peer_close_without_trailer_decodes_remainder() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            read_frame(&mut sock).await;
            sock.write_all(b"\x0bACK").await.unwrap();
            // Drop closes without ever sending the trailer.
        });

        let client = Client::new(ConnectionConfig::new(addr));
        assert_eq!(client.exchange("HELLO").await.unwrap(), "ACK");
    }

    #[tokio::test]
    async fn test_peer_close_without_bytes_is_receive_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            read_frame(&mut sock).await;
        });

        let client = Client::new(ConnectionConfig::new(addr));
        let err = client.exchange("HELLO").await.unwrap_err();
        assert!(matches!(err, ClientError::ConnectionClosed));
        assert_eq!(err.kind(), FailureKind::Receive);
    }

    #[tokio::test]
    async fn test_silent_peer_is_receive_timeout() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            read_frame(&mut sock).await;
            // Hold the socket open without acking.
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(sock);
        });

        let client = Client::new(
            ConnectionConfig::new(addr).with_read_timeout(Duration::from_millis(100)),
        );
        let err = client.exchange("HELLO").await.unwrap_err();
        assert!(matches!(err, ClientError::ReceiveTimeout(_)));
        assert_eq!(err.kind(), FailureKind::Receive);
    }

    #[tokio::test]
    async fn test_non_utf8_ack_is_decode_error() {
        let addr = spawn_acker(b"\x0b\xff\xfe\x1c\x0d").await;
        let client = Client::new(ConnectionConfig::new(addr));
        let err = client.exchange("HELLO").await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Decode);
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_sequential_exchanges_use_fresh_connections() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let accepts = Arc::new(AtomicUsize::new(0));

        let counter = accepts.clone();
        tokio::spawn(async move {
            while let Ok((mut sock, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                tokio::spawn(async move {
                    read_frame(&mut sock).await;
                    sock.write_all(b"\x0bACK\x1c\x0d").await.unwrap();
                });
            }
        });

        let client = Client::new(ConnectionConfig::new(addr));
        client.exchange("ONE").await.unwrap();
        client.exchange("TWO").await.unwrap();
        assert_eq!(accepts.load(Ordering::SeqCst), 2);
    }
}
