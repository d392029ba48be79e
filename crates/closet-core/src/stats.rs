//! Aggregate wear statistics and dashboard read models.
//!
//! Everything here is a pure function over the two collections; nothing
//! is cached or persisted.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::item::{Outfit, Piece};
use crate::season::Season;
use crate::wear::ItemKind;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Default number of cards shown in each dashboard section.
pub const DASHBOARD_LIMIT: usize = 4;

/// Headline numbers for the whole wardrobe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WardrobeStats {
    pub total_pieces: usize,
    pub total_outfits: usize,
    /// Sum of piece wear counts. Outfit wears are already fanned out to
    /// their pieces, so they are not added again.
    pub total_wears: usize,
    pub most_worn_piece: Option<WornSummary>,
    pub most_worn_outfit: Option<WornSummary>,
    pub wears_by_month: Vec<MonthCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WornSummary {
    pub id: String,
    pub title: String,
    pub wears: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthCount {
    pub month: String,
    pub wears: usize,
}

/// One (item, wear) pair on the dashboard's recently-worn strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentWear {
    pub kind: ItemKind,
    pub id: String,
    pub title: String,
    pub date: DateTime<Utc>,
}

/// Compute [`WardrobeStats`] over both collections.
#[must_use]
pub fn wardrobe_stats(pieces: &[Piece], outfits: &[Outfit]) -> WardrobeStats {
    WardrobeStats {
        total_pieces: pieces.len(),
        total_outfits: outfits.len(),
        total_wears: pieces.iter().map(Piece::wear_count).sum(),
        most_worn_piece: most_worn(pieces, |p| {
            (p.wear_count(), &p.id, &p.title, p.primary_image())
        }),
        most_worn_outfit: most_worn(outfits, |o| {
            (o.wear_count(), &o.id, &o.title, o.primary_image())
        }),
        wears_by_month: wears_by_month(pieces, outfits),
    }
}

// Ties go to the earlier record.
fn most_worn<'a, T, F>(items: &'a [T], key: F) -> Option<WornSummary>
where
    F: Fn(&'a T) -> (usize, &'a String, &'a String, Option<&'a str>),
{
    let mut best: Option<(usize, &String, &String, Option<&str>)> = None;
    for item in items {
        let candidate = key(item);
        if best.is_none_or(|b| candidate.0 > b.0) {
            best = Some(candidate);
        }
    }
    best.map(|(wears, id, title, image)| WornSummary {
        id: id.clone(),
        title: title.clone(),
        wears,
        image: image.map(str::to_string),
    })
}

/// Twelve buckets, January first, counting every piece and outfit wear log
/// by calendar month regardless of year.
#[must_use]
pub fn wears_by_month(pieces: &[Piece], outfits: &[Outfit]) -> Vec<MonthCount> {
    let mut counts = [0usize; 12];
    let dates = pieces
        .iter()
        .flat_map(|p| p.wear_history.iter())
        .chain(outfits.iter().flat_map(|o| o.wear_history.iter()))
        .map(|w| w.date);
    for date in dates {
        counts[date.month0() as usize] += 1;
    }

    MONTH_NAMES
        .iter()
        .zip(counts)
        .map(|(name, wears)| MonthCount {
            month: (*name).to_string(),
            wears,
        })
        .collect()
}

/// Most recent wear events across pieces and outfits, newest first.
#[must_use]
pub fn recently_worn(pieces: &[Piece], outfits: &[Outfit], limit: usize) -> Vec<RecentWear> {
    let piece_wears = pieces.iter().flat_map(|p| {
        p.wear_history.iter().map(|w| RecentWear {
            kind: ItemKind::Piece,
            id: p.id.clone(),
            title: p.title.clone(),
            date: w.date,
        })
    });
    let outfit_wears = outfits.iter().flat_map(|o| {
        o.wear_history.iter().map(|w| RecentWear {
            kind: ItemKind::Outfit,
            id: o.id.clone(),
            title: o.title.clone(),
            date: w.date,
        })
    });

    let mut all: Vec<RecentWear> = piece_wears.chain(outfit_wears).collect();
    all.sort_by(|a, b| b.date.cmp(&a.date));
    all.truncate(limit);
    all
}

/// Pieces suited to `season`, least worn first.
#[must_use]
pub fn seasonal_suggestions(pieces: &[Piece], season: Season, limit: usize) -> Vec<&Piece> {
    let mut suited: Vec<&Piece> = pieces.iter().filter(|p| p.season.suits(season)).collect();
    suited.sort_by_key(|p| p.wear_count());
    suited.truncate(limit);
    suited
}
