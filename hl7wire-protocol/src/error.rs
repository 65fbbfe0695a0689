//! Protocol error types.

use thiserror::Error;

/// Errors raised while decoding received frames.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("frame too large: {size} bytes buffered without a trailer (max {max})")]
    FrameTooLarge { size: usize, max: usize },

    #[error("invalid UTF-8 in received frame")]
    InvalidUtf8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProtocolError::FrameTooLarge { size: 100, max: 50 };
        assert!(err.to_string().contains("100"));
        assert!(err.to_string().contains("50"));

        let err = ProtocolError::InvalidUtf8;
        assert!(err.to_string().contains("UTF-8"));
    }
}
