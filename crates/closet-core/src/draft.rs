//! Editable drafts of pieces and outfits, and the checks they must pass
//! before the store is asked to create a record.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::item::{Outfit, Piece};
use crate::season::Season;

/// Structured description of a clothing photo, as returned by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub title: String,
    pub color: String,
    pub style: String,
    pub season: Season,
    pub tags: Vec<String>,
}

/// User-editable piece fields. Identity, images and history are owned by
/// the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceDraft {
    pub title: String,
    pub brand: String,
    pub color: String,
    pub size: String,
    pub season: Season,
    pub style: String,
    pub tags: Vec<String>,
}

/// User-editable outfit fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutfitDraft {
    pub title: String,
    pub piece_ids: Vec<String>,
    pub tags: Vec<String>,
    pub notes: Option<String>,
}

impl PieceDraft {
    /// Check the draft can be persisted with `images`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingTitle`] for a blank title and
    /// [`ValidationError::MissingImage`] when `images` is empty.
    pub fn validate(&self, images: &[String]) -> Result<(), ValidationError> {
        validate_common(&self.title, images)
    }

    /// Fill the auto-detectable fields from a photo analysis. Brand and
    /// size are left alone.
    pub fn apply_analysis(&mut self, analysis: &AnalysisResult) {
        self.title.clone_from(&analysis.title);
        self.color.clone_from(&analysis.color);
        self.style.clone_from(&analysis.style);
        self.season = analysis.season;
        self.tags.clone_from(&analysis.tags);
    }
}

impl OutfitDraft {
    /// # Errors
    ///
    /// Same rules as [`PieceDraft::validate`].
    pub fn validate(&self, images: &[String]) -> Result<(), ValidationError> {
        validate_common(&self.title, images)
    }
}

impl From<&Piece> for PieceDraft {
    fn from(piece: &Piece) -> Self {
        Self {
            title: piece.title.clone(),
            brand: piece.brand.clone(),
            color: piece.color.clone(),
            size: piece.size.clone(),
            season: piece.season,
            style: piece.style.clone(),
            tags: piece.tags.clone(),
        }
    }
}

impl From<&Outfit> for OutfitDraft {
    fn from(outfit: &Outfit) -> Self {
        Self {
            title: outfit.title.clone(),
            piece_ids: outfit.piece_ids.clone(),
            tags: outfit.tags.clone(),
            notes: outfit.notes.clone(),
        }
    }
}

fn validate_common(title: &str, images: &[String]) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::MissingTitle);
    }
    if images.is_empty() {
        return Err(ValidationError::MissingImage);
    }
    Ok(())
}

/// Split a comma-separated tag field into trimmed, non-empty tags.
#[must_use]
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
