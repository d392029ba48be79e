//! Fixed instructions sent to the providers, and parsing of the JSON
//! description they reply with.

use serde::Deserialize;
use serde_json::{json, Value};

use closet_core::{AnalysisResult, Season};

use crate::error::CallError;

pub(crate) const ANALYZE_INSTRUCTION: &str =
    "Analyze this image of a clothing item. Describe it in JSON format.";

/// The OpenAI endpoint gets no schema object, so the shape is spelled out.
pub(crate) const ANALYZE_INSTRUCTION_WITH_SHAPE: &str = "Analyze this image of a clothing item. \
Describe it in JSON format. The JSON object must conform to this schema: \
{ \"title\": \"A short, descriptive title\", \"color\": \"The primary color\", \
\"style\": \"The style category (e.g., Casual, Formal)\", \
\"season\": \"The most appropriate season (Spring, Summer, Autumn, Winter, or All)\", \
\"tags\": [\"array\", \"of\", \"relevant\", \"keywords\"] }.";

pub(crate) const REMOVE_BACKGROUND_INSTRUCTION: &str = "Remove the background from this image. \
Isolate the clothing item and place it on a solid white background. \
Return only the edited image.";

/// Gemini `responseSchema` for the five-field description.
pub(crate) fn analysis_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": {
                "type": "STRING",
                "description": "A short, descriptive title for the clothing item. e.g., \"Blue Denim Jacket\"."
            },
            "color": {
                "type": "STRING",
                "description": "The primary color of the item."
            },
            "style": {
                "type": "STRING",
                "description": "The style category of the item. e.g., \"Casual\", \"Formal\", \"Streetwear\"."
            },
            "season": {
                "type": "STRING",
                "description": "The most appropriate season for this item: \"Spring\", \"Summer\", \"Autumn\", \"Winter\", or \"All\"."
            },
            "tags": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "An array of relevant keywords or tags for the item. e.g., [\"denim\", \"jacket\", \"outerwear\"]"
            }
        },
        "required": ["title", "color", "style", "season", "tags"]
    })
}

#[derive(Debug, Deserialize)]
struct RawAnalysis {
    title: String,
    color: String,
    style: String,
    season: String,
    tags: Vec<String>,
}

/// Parse a provider's JSON text into an [`AnalysisResult`].
///
/// Tolerates a surrounding Markdown code fence. The season must name one of
/// the five seasons (any case; `Fall` means Autumn).
pub(crate) fn parse_analysis(text: &str) -> Result<AnalysisResult, CallError> {
    let raw: RawAnalysis = serde_json::from_str(strip_code_fence(text))
        .map_err(|e| CallError::Parse(format!("unexpected analysis shape: {e}")))?;
    let season: Season = raw
        .season
        .parse()
        .map_err(|e| CallError::Parse(format!("{e}")))?;

    Ok(AnalysisResult {
        title: raw.title,
        color: raw.color,
        style: raw.style,
        season,
        tags: raw.tags,
    })
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_json_reply() {
        let text = r#"{"title":"Blue Denim Jacket","color":"Blue","style":"Casual","season":"All","tags":["denim","jacket"]}"#;
        let result = parse_analysis(text).unwrap();
        assert_eq!(result.title, "Blue Denim Jacket");
        assert_eq!(result.season, Season::All);
        assert_eq!(result.tags, ["denim", "jacket"]);
    }

    #[test]
    fn parses_fenced_reply_with_lowercase_season() {
        let text = "```json\n{\"title\":\"Wool Coat\",\"color\":\"Grey\",\"style\":\"Formal\",\"season\":\"fall\",\"tags\":[]}\n```";
        let result = parse_analysis(text).unwrap();
        assert_eq!(result.season, Season::Autumn);
    }

    #[test]
    fn rejects_missing_fields() {
        let err = parse_analysis(r#"{"title":"Hat"}"#).unwrap_err();
        assert!(matches!(err, CallError::Parse(_)));
    }

    #[test]
    fn rejects_unknown_season() {
        let text = r#"{"title":"Hat","color":"Red","style":"Casual","season":"Monsoon","tags":[]}"#;
        let err = parse_analysis(text).unwrap_err();
        assert!(err.to_string().contains("Monsoon"));
    }

    #[test]
    fn schema_requires_all_five_fields() {
        let schema = analysis_schema();
        assert_eq!(schema["required"].as_array().unwrap().len(), 5);
        assert_eq!(schema["properties"]["tags"]["type"], "ARRAY");
    }
}
