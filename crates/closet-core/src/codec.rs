//! JSON encoding of record collections.
//!
//! Each collection is stored as one JSON array under its own key:
//! ```json
//! [
//!   {"id": "p1", "title": "Blue Denim Jacket", "wearHistory": [], ...},
//!   ...
//! ]
//! ```
//! Encoding is compact and field order follows the struct definitions, so
//! decoding and re-encoding a collection reproduces it byte for byte.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ClosetError;

/// Encode a collection as a JSON array.
///
/// # Errors
///
/// Returns [`ClosetError::Serialization`] if a record cannot be serialized.
pub fn encode_collection<T: Serialize>(records: &[T]) -> Result<String, ClosetError> {
    serde_json::to_string(records).map_err(ClosetError::from)
}

/// Decode a JSON array into a collection.
///
/// # Errors
///
/// Returns [`ClosetError::Serialization`] if the text is not a JSON array
/// of records of the expected shape.
pub fn decode_collection<T: DeserializeOwned>(text: &str) -> Result<Vec<T>, ClosetError> {
    serde_json::from_str(text).map_err(ClosetError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{Outfit, Piece};
    use crate::seed::{initial_outfits, initial_pieces};

    #[test]
    fn encode_produces_json_array() {
        let text = encode_collection(&initial_pieces()).unwrap();
        assert!(text.starts_with('['));
        assert!(text.contains("\"wearHistory\":[]"));
    }

    #[test]
    fn decode_rejects_non_array() {
        let result = decode_collection::<Piece>("{\"id\": \"p1\"}");
        assert!(matches!(result, Err(ClosetError::Serialization(_))));
    }

    #[test]
    fn decode_rejects_missing_required_fields() {
        let result = decode_collection::<Outfit>("[{\"id\": \"o1\", \"title\": \"x\"}]");
        assert!(result.is_err());
    }

    #[test]
    fn reencoding_is_byte_identical() {
        let first = encode_collection(&initial_outfits()).unwrap();
        let decoded: Vec<Outfit> = decode_collection(&first).unwrap();
        let second = encode_collection(&decoded).unwrap();
        assert_eq!(first, second);
    }
}
