//! Wear log: an immutable record that an item was worn.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A timestamped wear event. Appended to a piece's or outfit's history
/// and never edited afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WearLog {
    pub id: String,

    /// When the item was worn.
    pub date: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Which collection a wear event targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Piece,
    Outfit,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ItemKind::Piece => "piece",
            ItemKind::Outfit => "outfit",
        })
    }
}

/// Wear history ordered newest first, for display.
#[must_use]
pub fn newest_first(history: &[WearLog]) -> Vec<&WearLog> {
    let mut logs: Vec<&WearLog> = history.iter().collect();
    logs.sort_by(|a, b| b.date.cmp(&a.date));
    logs
}
