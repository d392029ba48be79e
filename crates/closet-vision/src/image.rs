//! Image payloads exchanged with providers.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// A base64-encoded image and its MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditedImage {
    pub base64: String,
    pub mime_type: String,
}

impl EditedImage {
    #[must_use]
    pub fn from_bytes(bytes: &[u8], mime_type: &str) -> Self {
        Self {
            base64: STANDARD.encode(bytes),
            mime_type: mime_type.to_string(),
        }
    }

    /// Decode the payload back to raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`base64::DecodeError`] if the payload is not valid base64.
    pub fn to_bytes(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(&self.base64)
    }

    /// `data:{mime};base64,{payload}`, suitable for storing in a record's
    /// image list.
    #[must_use]
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64)
    }
}

/// MIME type for a file extension, for the formats providers accept.
#[must_use]
pub fn mime_for_extension(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        _ => None,
    }
}

/// File extension to use when saving an image of `mime_type`.
#[must_use]
pub fn extension_for_mime(mime_type: &str) -> &'static str {
    match mime_type {
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "image/heic" => "heic",
        "image/heif" => "heif",
        _ => "png",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_survive_encoding() {
        let image = EditedImage::from_bytes(&[0x89, b'P', b'N', b'G'], "image/png");
        assert_eq!(image.to_bytes().unwrap(), vec![0x89, b'P', b'N', b'G']);
        assert!(image.data_url().starts_with("data:image/png;base64,"));
    }

    #[test]
    fn invalid_payload_fails_to_decode() {
        let image = EditedImage {
            base64: "not base64!".to_string(),
            mime_type: "image/png".to_string(),
        };
        assert!(image.to_bytes().is_err());
    }

    #[test]
    fn mime_lookup_is_case_insensitive() {
        assert_eq!(mime_for_extension("JPG"), Some("image/jpeg"));
        assert_eq!(mime_for_extension("webp"), Some("image/webp"));
        assert_eq!(mime_for_extension("txt"), None);
        assert_eq!(extension_for_mime("image/jpeg"), "jpg");
    }
}
