//! Starter wardrobe used when nothing has been stored yet.

use chrono::{DateTime, TimeZone, Utc};

use crate::item::{Outfit, Piece};
use crate::season::Season;

fn noon(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| (*s).to_string()).collect()
}

#[allow(clippy::too_many_arguments)]
fn piece(
    id: &str,
    title: &str,
    brand: &str,
    color: &str,
    size: &str,
    season: Season,
    style: &str,
    tags: &[&str],
    created_at: DateTime<Utc>,
) -> Piece {
    Piece {
        id: id.to_string(),
        title: title.to_string(),
        brand: brand.to_string(),
        color: color.to_string(),
        size: size.to_string(),
        season,
        style: style.to_string(),
        tags: strings(tags),
        images: vec![format!("https://picsum.photos/seed/{id}/400/600")],
        wear_history: Vec::new(),
        created_at,
    }
}

/// The four starter pieces.
#[must_use]
pub fn initial_pieces() -> Vec<Piece> {
    vec![
        piece(
            "p1",
            "Blue Denim Jacket",
            "Levi's",
            "Blue",
            "M",
            Season::All,
            "Casual",
            &["denim", "jacket", "outerwear"],
            noon(2023, 1, 15),
        ),
        piece(
            "p2",
            "White Crewneck T-Shirt",
            "Uniqlo",
            "White",
            "M",
            Season::All,
            "Basics",
            &["t-shirt", "basic", "top"],
            noon(2023, 3, 20),
        ),
        piece(
            "p3",
            "Black Skinny Jeans",
            "Topshop",
            "Black",
            "W28/L32",
            Season::All,
            "Casual",
            &["jeans", "denim", "bottoms"],
            noon(2023, 2, 10),
        ),
        piece(
            "p4",
            "Floral Summer Dress",
            "Zara",
            "Multicolor",
            "S",
            Season::Summer,
            "Boho",
            &["dress", "summer", "floral"],
            noon(2023, 6, 1),
        ),
    ]
}

/// The single starter outfit, built from the first three starter pieces.
#[must_use]
pub fn initial_outfits() -> Vec<Outfit> {
    vec![Outfit {
        id: "o1".to_string(),
        title: "Classic Casual".to_string(),
        piece_ids: strings(&["p1", "p2", "p3"]),
        tags: strings(&["everyday", "casual", "classic"]),
        images: vec!["https://picsum.photos/seed/o1/600/400".to_string()],
        wear_history: Vec::new(),
        notes: Some("My go-to outfit for errands.".to_string()),
        created_at: noon(2023, 4, 1),
    }]
}
