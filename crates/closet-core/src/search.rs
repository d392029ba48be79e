//! Case-insensitive substring search over the collections.

use crate::item::{Outfit, Piece};

/// Pieces whose title, brand or any tag contains `term`, newest first.
/// An empty term matches every piece.
#[must_use]
pub fn search_pieces<'a>(pieces: &'a [Piece], term: &str) -> Vec<&'a Piece> {
    let needle = term.to_lowercase();
    let mut hits: Vec<&Piece> = pieces
        .iter()
        .filter(|p| {
            contains(&p.title, &needle)
                || contains(&p.brand, &needle)
                || p.tags.iter().any(|t| contains(t, &needle))
        })
        .collect();
    hits.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    hits
}

/// Outfits whose title or any tag contains `term`, newest first.
#[must_use]
pub fn search_outfits<'a>(outfits: &'a [Outfit], term: &str) -> Vec<&'a Outfit> {
    let needle = term.to_lowercase();
    let mut hits: Vec<&Outfit> = outfits
        .iter()
        .filter(|o| contains(&o.title, &needle) || o.tags.iter().any(|t| contains(t, &needle)))
        .collect();
    hits.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    hits
}

fn contains(haystack: &str, lowered_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowered_needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::{initial_outfits, initial_pieces};

    #[test]
    fn search_matches_title_brand_and_tags() {
        let pieces = initial_pieces();

        let by_title = search_pieces(&pieces, "jeans");
        assert_eq!(by_title.len(), 1);
        assert_eq!(by_title[0].id, "p3");

        let by_brand = search_pieces(&pieces, "UNIQLO");
        assert_eq!(by_brand[0].id, "p2");

        let by_tag: Vec<&str> = search_pieces(&pieces, "denim")
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        // p3 (2023-02-10) is newer than p1 (2023-01-15)
        assert_eq!(by_tag, ["p3", "p1"]);
    }

    #[test]
    fn empty_term_returns_everything_newest_first() {
        let pieces = initial_pieces();
        let all = search_pieces(&pieces, "");
        assert_eq!(all.len(), 4);
        assert_eq!(all[0].id, "p4");
        assert_eq!(all[3].id, "p1");
    }

    #[test]
    fn outfit_search_ignores_unrelated_terms() {
        let outfits = initial_outfits();
        assert_eq!(search_outfits(&outfits, "classic").len(), 1);
        assert_eq!(search_outfits(&outfits, "everyday").len(), 1);
        assert!(search_outfits(&outfits, "gala").is_empty());
    }
}
