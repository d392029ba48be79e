//! OpenAI chat-completions backend.
//!
//! The image travels as a data URL inside an `image_url` content part, and
//! the expected JSON shape is described in the text instruction.

use serde::Deserialize;
use serde_json::json;

use closet_core::AnalysisResult;

use crate::client::send_json;
use crate::config::VisionConfig;
use crate::error::CallError;
use crate::prompt::{parse_analysis, ANALYZE_INSTRUCTION_WITH_SHAPE};

const MAX_TOKENS: u32 = 300;

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: Option<String>,
}

pub(crate) async fn analyze(
    http: &reqwest::Client,
    config: &VisionConfig,
    api_key: &str,
    image: &str,
    mime_type: &str,
) -> Result<AnalysisResult, CallError> {
    let body = json!({
        "model": config.openai_model,
        "response_format": { "type": "json_object" },
        "messages": [{
            "role": "user",
            "content": [
                { "type": "text", "text": ANALYZE_INSTRUCTION_WITH_SHAPE },
                {
                    "type": "image_url",
                    "image_url": { "url": format!("data:{mime_type};base64,{image}") }
                }
            ]
        }],
        "max_tokens": MAX_TOKENS
    });

    let request = http
        .post(config.openai_url())
        .bearer_auth(api_key)
        .json(&body);
    let response: ChatResponse = send_json(request).await?;

    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| CallError::Parse("reply contained no message content".to_string()))?;
    parse_analysis(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_content_deserializes_as_none() {
        let response: ChatResponse = serde_json::from_value(json!({
            "choices": [{ "message": { "role": "assistant", "content": null } }]
        }))
        .unwrap();
        assert!(response.choices[0].message.content.is_none());
    }
}
