//! Piece and outfit records: the two collections Closet tracks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::season::Season;
use crate::wear::WearLog;

/// A single catalogued clothing item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Piece {
    // === Identity ===
    pub id: String,
    pub title: String,

    // === Descriptive fields ===
    pub brand: String,
    pub color: String,
    pub size: String,
    pub season: Season,
    pub style: String,
    #[serde(default)]
    pub tags: Vec<String>,

    /// Remote URLs or inline data URLs. The first one is the primary image.
    pub images: Vec<String>,

    // === Lifecycle ===
    #[serde(default)]
    pub wear_history: Vec<WearLog>,
    pub created_at: DateTime<Utc>,
}

/// A named grouping of piece references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outfit {
    pub id: String,
    pub title: String,

    /// Soft references: ids that no longer resolve are skipped on read.
    #[serde(default)]
    pub piece_ids: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub images: Vec<String>,

    #[serde(default)]
    pub wear_history: Vec<WearLog>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Piece {
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    #[must_use]
    pub fn wear_count(&self) -> usize {
        self.wear_history.len()
    }

    /// Last time this piece was worn, if ever.
    #[must_use]
    pub fn last_worn(&self) -> Option<DateTime<Utc>> {
        self.wear_history.iter().map(|w| w.date).max()
    }
}

impl Outfit {
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    #[must_use]
    pub fn wear_count(&self) -> usize {
        self.wear_history.len()
    }

    #[must_use]
    pub fn contains_piece(&self, piece_id: &str) -> bool {
        self.piece_ids.iter().any(|id| id == piece_id)
    }
}
