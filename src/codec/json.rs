//! Human-readable JSON encoding.

use crate::codec::content::Content;
use crate::error::{RankEvalError, Result};

/// Write `content` as JSON, compact or pretty-printed.
pub fn encode(content: &Content, pretty: bool) -> Result<Vec<u8>> {
    let bytes = if pretty {
        serde_json::to_vec_pretty(content)?
    } else {
        serde_json::to_vec(content)?
    };
    Ok(bytes)
}

/// Read a JSON document.
pub fn decode(bytes: &[u8]) -> Result<Content> {
    serde_json::from_slice(bytes)
        .map_err(|e| RankEvalError::malformed(format!("Failed to parse JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pretty_and_compact_decode_alike() {
        let content = Content::object()
            .field("id", "q1")
            .field("size", 10i64)
            .field("boost", 2.0f64)
            .field("tags", vec!["a", "b"])
            .build();

        let compact = encode(&content, false).unwrap();
        let pretty = encode(&content, true).unwrap();

        assert!(!compact.contains(&b'\n'));
        assert!(pretty.contains(&b'\n'));
        assert_eq!(decode(&compact).unwrap(), content);
        assert_eq!(decode(&pretty).unwrap(), content);
    }

    #[test]
    fn test_integral_float_stays_float() {
        let content = Content::Float(2.0);
        let decoded = decode(&encode(&content, false).unwrap()).unwrap();
        assert_eq!(decoded, Content::Float(2.0));
    }

    #[test]
    fn test_invalid_json() {
        let result = decode(br#"{"id": "#);
        assert!(matches!(result, Err(RankEvalError::Malformed(_))));
    }
}
