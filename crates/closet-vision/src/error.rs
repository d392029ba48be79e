//! Error types for the provider adapter.

use serde::Deserialize;
use thiserror::Error;

use closet_core::Provider;

/// What the caller was trying to do, for user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Analyze,
    RemoveBackground,
}

impl Operation {
    fn failure_text(self) -> &'static str {
        match self {
            Operation::Analyze => "Failed to analyze image",
            Operation::RemoveBackground => "Failed to remove background",
        }
    }
}

/// Errors surfaced to the user verbatim.
#[derive(Debug, Error)]
pub enum VisionError {
    /// No API key; raised before any network call.
    #[error("{0}")]
    Configuration(String),

    /// Network failure, non-2xx status, or a reply of the wrong shape.
    /// `detail` carries the underlying cause for logs.
    #[error("{message}")]
    Provider {
        provider: Provider,
        message: String,
        detail: String,
    },

    /// The selected provider does not offer this operation.
    #[error("{0}")]
    Unsupported(String),
}

impl VisionError {
    pub(crate) fn missing_key(provider: Provider) -> Self {
        Self::Configuration(format!(
            "{} API key is not configured. Please add it in settings.",
            provider.display_name()
        ))
    }

    pub(crate) fn provider(provider: Provider, op: Operation, cause: &CallError) -> Self {
        Self::Provider {
            provider,
            message: format!(
                "{} with {}. Please check your API key and try again.",
                op.failure_text(),
                provider.display_name()
            ),
            detail: cause.to_string(),
        }
    }
}

/// Why a single provider call failed.
#[derive(Debug, Error)]
pub(crate) enum CallError {
    #[error("network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Status(u16, String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Error envelope shared by both vendors: `{"error": {"message": "..."}}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorDetail {
    pub message: String,
}

/// Best-effort message from a non-2xx body.
pub(crate) fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.to_string())
}
