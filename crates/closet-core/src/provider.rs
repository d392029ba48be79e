//! Image-understanding provider selector.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// The external vendor used for photo auto-fill and background removal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Gemini,
    #[serde(rename = "openai")]
    OpenAi,
}

impl Provider {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Provider::Gemini => "gemini",
            Provider::OpenAi => "openai",
        }
    }

    /// Human-facing vendor name for messages.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Provider::Gemini => "Gemini",
            Provider::OpenAi => "OpenAI",
        }
    }

    /// Only Gemini offers image editing.
    #[must_use]
    pub fn supports_background_removal(self) -> bool {
        matches!(self, Provider::Gemini)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gemini" => Ok(Provider::Gemini),
            "openai" => Ok(Provider::OpenAi),
            other => Err(ValidationError::UnknownProvider(other.to_string())),
        }
    }
}
