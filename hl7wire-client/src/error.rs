//! Client error types.

use hl7wire_protocol::ProtocolError;
use std::io;
use std::time::Duration;
use thiserror::Error;

/// Failure taxonomy for a message exchange.
///
/// Every [`ClientError`] maps onto one of these categories; callers that only
/// care about which stage of the exchange failed can match on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The TCP connection could not be established.
    Connection,
    /// The framed message could not be fully written.
    Send,
    /// The response could not be read before timeout or orderly close.
    Receive,
    /// The received bytes could not be interpreted as a framed text message.
    Decode,
}

/// Errors returned from a message exchange.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("connection error: {0}")]
    Connect(#[source] io::Error),

    #[error("connection timed out after {0:?}")]
    ConnectTimeout(Duration),

    #[error("send error: {0}")]
    Send(#[source] io::Error),

    #[error("receive error: {0}")]
    Receive(#[source] io::Error),

    #[error("no acknowledgment within {0:?}")]
    ReceiveTimeout(Duration),

    #[error("connection closed before any acknowledgment bytes arrived")]
    ConnectionClosed,

    #[error("decode error: {0}")]
    Protocol(#[from] ProtocolError),
}

impl ClientError {
    /// Returns the failure category for this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            ClientError::Connect(_) | ClientError::ConnectTimeout(_) => FailureKind::Connection,
            ClientError::Send(_) => FailureKind::Send,
            ClientError::Receive(_)
            | ClientError::ReceiveTimeout(_)
            | ClientError::ConnectionClosed => FailureKind::Receive,
            ClientError::Protocol(_) => FailureKind::Decode,
        }
    }

    /// Returns whether retrying the whole exchange might succeed.
    ///
    /// The client never retries on its own: after any failure the delivery is
    /// unconfirmed (the receiver may have processed the message even though
    /// the acknowledgment never arrived), and the decision to resend belongs
    /// to the caller.
    pub fn is_retryable(&self) -> bool {
        !matches!(self.kind(), FailureKind::Decode)
    }
}
