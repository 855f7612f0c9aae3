//! Error types for the session and the wire protocol.

use thiserror::Error;

/// Failures applying local or remote document changes.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RemoteError {
    /// The wire payload did not parse into operations.
    #[error("invalid delta payload: {0}")]
    InvalidPayload(String),

    /// An operation addressed text beyond the document.
    #[error("operation out of range: pos {pos} len {len} against document of {doc_len} chars")]
    OutOfRange {
        pos: usize,
        len: usize,
        doc_len: usize,
    },

    /// A local edit arrived while the session is read-only.
    #[error("session is read-only")]
    ReadOnly,
}

impl From<serde_json::Error> for RemoteError {
    fn from(err: serde_json::Error) -> Self {
        RemoteError::InvalidPayload(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = RemoteError::OutOfRange {
            pos: 10,
            len: 2,
            doc_len: 4,
        };
        assert_eq!(
            err.to_string(),
            "operation out of range: pos 10 len 2 against document of 4 chars"
        );
        assert_eq!(RemoteError::ReadOnly.to_string(), "session is read-only");
    }

    #[test]
    fn test_json_error_converts() {
        let parse_err = serde_json::from_str::<u32>("[]").unwrap_err();
        let err: RemoteError = parse_err.into();
        assert!(matches!(err, RemoteError::InvalidPayload(_)));
    }
}
