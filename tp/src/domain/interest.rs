//! Interest categories offered to the user

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// A category of places the user wants to visit
///
/// The wire tag (used in POI requests) is the SCREAMING_SNAKE_CASE name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterestCategory {
    StreetArt,
    History,
    Coffee,
    Panoramas,
    Architecture,
    Parks,
    Shopping,
    Food,
}

impl InterestCategory {
    pub const ALL: [InterestCategory; 8] = [
        Self::StreetArt,
        Self::History,
        Self::Coffee,
        Self::Panoramas,
        Self::Architecture,
        Self::Parks,
        Self::Shopping,
        Self::Food,
    ];

    /// Tag sent to the POI service
    pub fn tag(&self) -> &'static str {
        match self {
            Self::StreetArt => "STREET_ART",
            Self::History => "HISTORY",
            Self::Coffee => "COFFEE",
            Self::Panoramas => "PANORAMAS",
            Self::Architecture => "ARCHITECTURE",
            Self::Parks => "PARKS",
            Self::Shopping => "SHOPPING",
            Self::Food => "FOOD",
        }
    }

    /// Human readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::StreetArt => "Street art",
            Self::History => "History",
            Self::Coffee => "Coffee shops",
            Self::Panoramas => "Panoramas",
            Self::Architecture => "Architecture",
            Self::Parks => "Parks",
            Self::Shopping => "Shopping",
            Self::Food => "Food",
        }
    }
}

impl fmt::Display for InterestCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for InterestCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "InterestCategory::from_str: called");
        let normalized = s.trim().to_uppercase().replace(['-', ' '], "_");
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.tag() == normalized)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|c| c.tag()).collect();
                format!("Unknown interest '{}'. Known: {}", s, known.join(", "))
            })
    }
}
