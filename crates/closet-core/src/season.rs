//! Seasons a piece can be worn in, and the calendar mapping to them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// The season a piece is suited to. `All` means year-round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
    #[default]
    All,
}

impl Season {
    /// Every value, in display order.
    pub const ALL_VALUES: [Season; 5] = [
        Season::Spring,
        Season::Summer,
        Season::Autumn,
        Season::Winter,
        Season::All,
    ];

    /// The meteorological season a date falls in.
    ///
    /// March to May is Spring, June to August Summer, September to November
    /// Autumn, and everything else Winter. Never returns [`Season::All`].
    #[must_use]
    pub fn for_date(date: DateTime<Utc>) -> Self {
        match date.month() {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Autumn,
            _ => Season::Winter,
        }
    }

    /// Whether a piece tagged with this season suits `current`.
    #[must_use]
    pub fn suits(self, current: Season) -> bool {
        self == Season::All || self == current
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
            Season::Winter => "Winter",
            Season::All => "All",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive parse; `fall` is accepted for Autumn.
impl FromStr for Season {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spring" => Ok(Season::Spring),
            "summer" => Ok(Season::Summer),
            "autumn" | "fall" => Ok(Season::Autumn),
            "winter" => Ok(Season::Winter),
            "all" => Ok(Season::All),
            _ => Err(ValidationError::UnknownSeason(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn season_for_date_follows_calendar_quarters() {
        assert_eq!(Season::for_date(utc(2025, 1, 15)), Season::Winter);
        assert_eq!(Season::for_date(utc(2025, 3, 1)), Season::Spring);
        assert_eq!(Season::for_date(utc(2025, 5, 31)), Season::Spring);
        assert_eq!(Season::for_date(utc(2025, 6, 1)), Season::Summer);
        assert_eq!(Season::for_date(utc(2025, 10, 18)), Season::Autumn);
        assert_eq!(Season::for_date(utc(2025, 12, 24)), Season::Winter);
    }

    #[test]
    fn all_season_suits_every_season() {
        assert!(Season::All.suits(Season::Winter));
        assert!(Season::Summer.suits(Season::Summer));
        assert!(!Season::Summer.suits(Season::Winter));
    }

    #[test]
    fn parse_is_case_insensitive_and_accepts_fall() {
        assert_eq!("summer".parse::<Season>().unwrap(), Season::Summer);
        assert_eq!(" WINTER ".parse::<Season>().unwrap(), Season::Winter);
        assert_eq!("Fall".parse::<Season>().unwrap(), Season::Autumn);
        assert!(matches!(
            "monsoon".parse::<Season>(),
            Err(ValidationError::UnknownSeason(_))
        ));
    }

    #[test]
    fn serializes_with_capitalized_names() {
        let json = serde_json::to_string(&Season::Autumn).unwrap();
        assert_eq!(json, "\"Autumn\"");
        let back: Season = serde_json::from_str("\"All\"").unwrap();
        assert_eq!(back, Season::All);
    }
}
