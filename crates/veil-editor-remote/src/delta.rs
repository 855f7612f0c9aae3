//! Wire operations for collaborative sync.
//!
//! The transport speaks JSON; an op is externally tagged with its variant
//! name, positions are char offsets, and a batch is a plain array. The
//! same shape goes out through the local-change callback, so both
//! directions share one vocabulary.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::error::RemoteError;

/// One document operation as it travels the wire.
///
/// `{"Insert":{"pos":5,"content":","}}` /
/// `{"Delete":{"pos":0,"len":1}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeltaOp {
    Insert { pos: usize, content: SmolStr },
    Delete { pos: usize, len: usize },
}

impl DeltaOp {
    /// Length change this op causes, in chars.
    pub fn len_delta(&self) -> isize {
        match self {
            DeltaOp::Insert { content, .. } => content.chars().count() as isize,
            DeltaOp::Delete { len, .. } => -(*len as isize),
        }
    }
}

/// Parse a single op.
pub fn parse_op(json: &str) -> Result<DeltaOp, RemoteError> {
    Ok(serde_json::from_str(json)?)
}

/// Parse a batch (a JSON array of ops).
pub fn parse_batch(json: &str) -> Result<Vec<DeltaOp>, RemoteError> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let op = parse_op(r#"{"Insert":{"pos":5,"content":","}}"#).unwrap();
        assert_eq!(
            op,
            DeltaOp::Insert {
                pos: 5,
                content: ",".into(),
            }
        );

        let ops = parse_batch(r#"[{"Insert":{"pos":5,"content":","}},{"Delete":{"pos":0,"len":1}}]"#)
            .unwrap();
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[1], DeltaOp::Delete { pos: 0, len: 1 });

        // Serialization mirrors the inbound shape exactly.
        assert_eq!(
            serde_json::to_string(&ops[0]).unwrap(),
            r#"{"Insert":{"pos":5,"content":","}}"#
        );
    }

    #[test]
    fn test_malformed_payload() {
        assert!(matches!(
            parse_op(r#"{"Paste":{"pos":5}}"#),
            Err(RemoteError::InvalidPayload(_))
        ));
        assert!(matches!(
            parse_batch("not json"),
            Err(RemoteError::InvalidPayload(_))
        ));
        assert!(matches!(
            parse_op(r#"{"Delete":{"pos":-1,"len":1}}"#),
            Err(RemoteError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_len_delta() {
        let insert = DeltaOp::Insert {
            pos: 0,
            content: "🌍ab".into(),
        };
        assert_eq!(insert.len_delta(), 3);
        assert_eq!(DeltaOp::Delete { pos: 2, len: 5 }.len_delta(), -5);
    }
}
