//! Gemini `generateContent` backend.
//!
//! Requests carry the image as an `inlineData` part followed by a text
//! instruction. Analysis asks for `application/json` output constrained by a
//! response schema; background removal asks for an image modality and reads
//! the first inline image of the reply.

use serde::Deserialize;
use serde_json::json;

use closet_core::AnalysisResult;

use crate::client::send_json;
use crate::config::VisionConfig;
use crate::error::CallError;
use crate::image::EditedImage;
use crate::prompt::{analysis_schema, parse_analysis, ANALYZE_INSTRUCTION, REMOVE_BACKGROUND_INSTRUCTION};

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    text: Option<String>,
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    data: String,
    mime_type: String,
}

impl GenerateResponse {
    fn parts(&self) -> &[Part] {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map_or(&[], |c| c.parts.as_slice())
    }

    /// All text parts of the first candidate, concatenated.
    fn text(&self) -> Option<String> {
        let text: String = self.parts().iter().filter_map(|p| p.text.as_deref()).collect();
        (!text.trim().is_empty()).then_some(text)
    }

    fn first_image(self) -> Option<EditedImage> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .find_map(|p| p.inline_data)
            .map(|d| EditedImage {
                base64: d.data,
                mime_type: d.mime_type,
            })
    }
}

pub(crate) async fn analyze(
    http: &reqwest::Client,
    config: &VisionConfig,
    api_key: &str,
    image: &str,
    mime_type: &str,
) -> Result<AnalysisResult, CallError> {
    let body = json!({
        "contents": [{
            "parts": [
                { "inlineData": { "data": image, "mimeType": mime_type } },
                { "text": ANALYZE_INSTRUCTION }
            ]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": analysis_schema()
        }
    });

    let request = http
        .post(config.gemini_url(&config.gemini_model))
        .header(API_KEY_HEADER, api_key)
        .json(&body);
    let response: GenerateResponse = send_json(request).await?;

    let text = response
        .text()
        .ok_or_else(|| CallError::Parse("reply contained no text".to_string()))?;
    parse_analysis(&text)
}

pub(crate) async fn remove_background(
    http: &reqwest::Client,
    config: &VisionConfig,
    api_key: &str,
    image: &str,
    mime_type: &str,
) -> Result<EditedImage, CallError> {
    let body = json!({
        "contents": [{
            "parts": [
                { "inlineData": { "data": image, "mimeType": mime_type } },
                { "text": REMOVE_BACKGROUND_INSTRUCTION }
            ]
        }],
        "generationConfig": {
            "responseModalities": ["TEXT", "IMAGE"]
        }
    });

    let request = http
        .post(config.gemini_url(&config.gemini_image_model))
        .header(API_KEY_HEADER, api_key)
        .json(&body);
    let response: GenerateResponse = send_json(request).await?;

    response
        .first_image()
        .ok_or_else(|| CallError::Parse("reply contained no image".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_joins_parts_of_first_candidate() {
        let response: GenerateResponse = serde_json::from_value(json!({
            "candidates": [
                { "content": { "parts": [{ "text": "{\"a\":" }, { "text": "1}" }] } },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ]
        }))
        .unwrap();
        assert_eq!(response.text().as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn empty_reply_has_no_text_or_image() {
        let response: GenerateResponse = serde_json::from_value(json!({})).unwrap();
        assert!(response.text().is_none());
        assert!(response.first_image().is_none());
    }

    #[test]
    fn first_image_skips_text_parts() {
        let response: GenerateResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "parts": [
                    { "text": "Here is the edited image." },
                    { "inlineData": { "data": "aGVsbG8=", "mimeType": "image/png" } }
                ] }
            }]
        }))
        .unwrap();
        let image = response.first_image().unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.base64, "aGVsbG8=");
    }
}
