//! Provider-neutral entry points.
//!
//! [`VisionClient`] checks configuration before touching the network,
//! dispatches to the selected backend, and turns every failure into a
//! user-facing [`VisionError`].

use std::time::Duration;

use serde::de::DeserializeOwned;

use closet_core::{AnalysisResult, Provider};

use crate::config::VisionConfig;
use crate::error::{api_error_message, CallError, Operation, VisionError};
use crate::image::EditedImage;
use crate::{gemini, openai};

const USER_AGENT: &str = concat!("closet/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the image providers. Cheap to clone.
#[derive(Debug, Clone)]
pub struct VisionClient {
    http: reqwest::Client,
    config: VisionConfig,
}

impl VisionClient {
    /// Build a client from endpoint configuration.
    ///
    /// # Errors
    ///
    /// Returns [`VisionError::Configuration`] if the HTTP stack cannot be
    /// initialised.
    pub fn new(config: VisionConfig) -> Result<Self, VisionError> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| VisionError::Configuration(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    #[must_use]
    pub fn config(&self) -> &VisionConfig {
        &self.config
    }

    /// Describe a clothing item in a base64-encoded image.
    ///
    /// # Errors
    ///
    /// - [`VisionError::Configuration`] if `api_key` is empty. No request is
    ///   made in that case.
    /// - [`VisionError::Provider`] on network failure, a non-2xx status, or
    ///   a reply that is not a valid description.
    pub async fn analyze(
        &self,
        api_key: &str,
        provider: Provider,
        image_base64: &str,
        mime_type: &str,
    ) -> Result<AnalysisResult, VisionError> {
        require_key(api_key, provider)?;
        tracing::info!(provider = provider.as_str(), mime_type, "analyzing image");

        let result = match provider {
            Provider::Gemini => {
                gemini::analyze(&self.http, &self.config, api_key, image_base64, mime_type).await
            }
            Provider::OpenAi => {
                openai::analyze(&self.http, &self.config, api_key, image_base64, mime_type).await
            }
        };

        result.map_err(|cause| fail(provider, Operation::Analyze, &cause))
    }

    /// Return a copy of the image with its background replaced by solid
    /// white.
    ///
    /// # Errors
    ///
    /// - [`VisionError::Unsupported`] if `provider` cannot edit images.
    /// - [`VisionError::Configuration`] if `api_key` is empty.
    /// - [`VisionError::Provider`] on network failure, a non-2xx status, or
    ///   a reply without an image.
    pub async fn remove_background(
        &self,
        api_key: &str,
        provider: Provider,
        image_base64: &str,
        mime_type: &str,
    ) -> Result<EditedImage, VisionError> {
        if !provider.supports_background_removal() {
            return Err(VisionError::Unsupported(format!(
                "Background removal is only supported by the {} provider.",
                Provider::Gemini.display_name()
            )));
        }
        require_key(api_key, provider)?;
        tracing::info!(provider = provider.as_str(), mime_type, "removing background");

        gemini::remove_background(&self.http, &self.config, api_key, image_base64, mime_type)
            .await
            .map_err(|cause| fail(provider, Operation::RemoveBackground, &cause))
    }
}

fn require_key(api_key: &str, provider: Provider) -> Result<(), VisionError> {
    if api_key.trim().is_empty() {
        return Err(VisionError::missing_key(provider));
    }
    Ok(())
}

fn fail(provider: Provider, op: Operation, cause: &CallError) -> VisionError {
    tracing::warn!(provider = provider.as_str(), error = %cause, "provider call failed");
    VisionError::provider(provider, op, cause)
}

/// Send a JSON request and decode a 2xx JSON reply.
pub(crate) async fn send_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> Result<T, CallError> {
    let response = request
        .send()
        .await
        .map_err(|e| CallError::Network(e.to_string()))?;

    let status = response.status();
    tracing::debug!(status = status.as_u16(), "provider responded");

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(CallError::Status(status.as_u16(), api_error_message(&body)));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| CallError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use closet_core::Season;
    use httpmock::prelude::*;
    use serde_json::json;

    const IMAGE: &str = "aW1hZ2U=";

    fn client(server: &MockServer) -> VisionClient {
        VisionClient::new(VisionConfig::with_base_url(&server.base_url())).unwrap()
    }

    fn description() -> serde_json::Value {
        json!({
            "title": "Blue Denim Jacket",
            "color": "Blue",
            "style": "Casual",
            "season": "Spring",
            "tags": ["denim", "jacket", "outerwear"]
        })
    }

    #[tokio::test]
    async fn gemini_analyze_sends_inline_image_and_schema() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1beta/models/gemini-2.5-flash:generateContent")
                .header("x-goog-api-key", "g-key")
                .body_includes(r#""inlineData":{"data":"aW1hZ2U=","mimeType":"image/jpeg"}"#)
                .body_includes(r#""responseMimeType":"application/json""#)
                .body_includes(r#""responseSchema""#);
            then.status(200).json_body(json!({
                "candidates": [{
                    "content": { "parts": [{ "text": description().to_string() }] }
                }]
            }));
        });

        let result = client(&server)
            .analyze("g-key", Provider::Gemini, IMAGE, "image/jpeg")
            .await
            .unwrap();

        mock.assert();
        assert_eq!(result.title, "Blue Denim Jacket");
        assert_eq!(result.season, Season::Spring);
        assert_eq!(result.tags, ["denim", "jacket", "outerwear"]);
    }

    #[tokio::test]
    async fn openai_analyze_uses_bearer_auth_and_data_url() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .header("authorization", "Bearer sk-test")
                .body_includes("data:image/png;base64,aW1hZ2U=")
                .body_includes(r#""model":"gpt-4o""#)
                .body_includes(r#""response_format":{"type":"json_object"}"#);
            then.status(200).json_body(json!({
                "choices": [{
                    "message": { "role": "assistant", "content": description().to_string() }
                }]
            }));
        });

        let result = client(&server)
            .analyze("sk-test", Provider::OpenAi, IMAGE, "image/png")
            .await
            .unwrap();

        mock.assert();
        assert_eq!(result.color, "Blue");
        assert_eq!(result.style, "Casual");
    }

    #[tokio::test]
    async fn empty_key_fails_without_a_request() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST);
            then.status(200);
        });

        let err = client(&server)
            .analyze("  ", Provider::OpenAi, IMAGE, "image/png")
            .await
            .unwrap_err();

        assert!(matches!(err, VisionError::Configuration(_)));
        assert_eq!(
            err.to_string(),
            "OpenAI API key is not configured. Please add it in settings."
        );
        mock.assert_calls(0);
    }

    #[tokio::test]
    async fn error_status_becomes_provider_error_with_vendor_detail() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(401)
                .json_body(json!({ "error": { "message": "Incorrect API key provided" } }));
        });

        let err = client(&server)
            .analyze("sk-bad", Provider::OpenAi, IMAGE, "image/png")
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Failed to analyze image with OpenAI. Please check your API key and try again."
        );
        match err {
            VisionError::Provider { provider, detail, .. } => {
                assert_eq!(provider, Provider::OpenAi);
                assert!(detail.contains("401"));
                assert!(detail.contains("Incorrect API key provided"));
            }
            other => panic!("expected provider error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_description_is_a_provider_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST)
                .path("/v1beta/models/gemini-2.5-flash:generateContent");
            then.status(200).json_body(json!({
                "candidates": [{ "content": { "parts": [{ "text": "a blue jacket" }] } }]
            }));
        });

        let err = client(&server)
            .analyze("g-key", Provider::Gemini, IMAGE, "image/jpeg")
            .await
            .unwrap_err();

        assert!(matches!(err, VisionError::Provider { .. }));
        assert!(err.to_string().starts_with("Failed to analyze image with Gemini"));
    }

    #[tokio::test]
    async fn gemini_remove_background_returns_first_inline_image() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1beta/models/gemini-2.5-flash-image-preview:generateContent")
                .header("x-goog-api-key", "g-key")
                .body_includes(r#""responseModalities":["TEXT","IMAGE"]"#);
            then.status(200).json_body(json!({
                "candidates": [{
                    "content": { "parts": [
                        { "text": "Done." },
                        { "inlineData": { "data": "d2hpdGU=", "mimeType": "image/png" } }
                    ] }
                }]
            }));
        });

        let edited = client(&server)
            .remove_background("g-key", Provider::Gemini, IMAGE, "image/jpeg")
            .await
            .unwrap();

        mock.assert();
        assert_eq!(edited.base64, "d2hpdGU=");
        assert_eq!(edited.mime_type, "image/png");
    }

    #[tokio::test]
    async fn remove_background_without_image_is_a_provider_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST)
                .path("/v1beta/models/gemini-2.5-flash-image-preview:generateContent");
            then.status(200).json_body(json!({
                "candidates": [{ "content": { "parts": [{ "text": "I can't do that." }] } }]
            }));
        });

        let err = client(&server)
            .remove_background("g-key", Provider::Gemini, IMAGE, "image/jpeg")
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Failed to remove background with Gemini. Please check your API key and try again."
        );
    }

    #[tokio::test]
    async fn openai_background_removal_is_unsupported() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST);
            then.status(200);
        });

        // Checked before the key, so even an empty key reports unsupported.
        let err = client(&server)
            .remove_background("", Provider::OpenAi, IMAGE, "image/png")
            .await
            .unwrap_err();

        assert!(matches!(err, VisionError::Unsupported(_)));
        assert_eq!(
            err.to_string(),
            "Background removal is only supported by the Gemini provider."
        );
        mock.assert_calls(0);
    }

    #[tokio::test]
    async fn unreachable_host_is_a_provider_error() {
        // Port 9 (discard) on loopback is not listening in test environments.
        let config = VisionConfig {
            timeout_secs: Some(2),
            ..VisionConfig::with_base_url("http://127.0.0.1:9")
        };
        let err = VisionClient::new(config)
            .unwrap()
            .analyze("g-key", Provider::Gemini, IMAGE, "image/jpeg")
            .await
            .unwrap_err();

        match err {
            VisionError::Provider { detail, .. } => assert!(detail.starts_with("network error")),
            other => panic!("expected provider error, got {other:?}"),
        }
    }
}
