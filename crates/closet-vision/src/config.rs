//! Endpoint and model configuration for the provider backends.

use serde::Deserialize;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_IMAGE_MODEL: &str = "gemini-2.5-flash-image-preview";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";

/// Where and how to reach each provider. Every field is optional in the
/// `[vision]` table of `closet.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    pub gemini_base_url: String,
    pub openai_base_url: String,
    pub gemini_model: String,
    /// Model used for image editing (background removal).
    pub gemini_image_model: String,
    pub openai_model: String,
    /// Request timeout. `None` leaves it to the HTTP stack.
    pub timeout_secs: Option<u64>,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_image_model: DEFAULT_GEMINI_IMAGE_MODEL.to_string(),
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            timeout_secs: None,
        }
    }
}

impl VisionConfig {
    /// Point both providers at one base URL (a local mock, a proxy).
    #[must_use]
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            gemini_base_url: base_url.to_string(),
            openai_base_url: base_url.to_string(),
            ..Self::default()
        }
    }

    pub(crate) fn gemini_url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{model}:generateContent",
            self.gemini_base_url.trim_end_matches('/')
        )
    }

    pub(crate) fn openai_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.openai_base_url.trim_end_matches('/')
        )
    }
}
