use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;
use std::str::FromStr;

use super::{PlaceId, Tag, UserId};

/// Kind of place. Closed set, stored as its snake_case name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceCategory {
    Restaurant,
    Cafe,
    Bar,
    Nightlife,
    Museum,
    Attraction,
    Park,
    Beach,
    Shopping,
    Market,
    Hotel,
    Viewpoint,
    Activity,
}

impl PlaceCategory {
    pub const ALL: [PlaceCategory; 13] = [
        PlaceCategory::Restaurant,
        PlaceCategory::Cafe,
        PlaceCategory::Bar,
        PlaceCategory::Nightlife,
        PlaceCategory::Museum,
        PlaceCategory::Attraction,
        PlaceCategory::Park,
        PlaceCategory::Beach,
        PlaceCategory::Shopping,
        PlaceCategory::Market,
        PlaceCategory::Hotel,
        PlaceCategory::Viewpoint,
        PlaceCategory::Activity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlaceCategory::Restaurant => "restaurant",
            PlaceCategory::Cafe => "cafe",
            PlaceCategory::Bar => "bar",
            PlaceCategory::Nightlife => "nightlife",
            PlaceCategory::Museum => "museum",
            PlaceCategory::Attraction => "attraction",
            PlaceCategory::Park => "park",
            PlaceCategory::Beach => "beach",
            PlaceCategory::Shopping => "shopping",
            PlaceCategory::Market => "market",
            PlaceCategory::Hotel => "hotel",
            PlaceCategory::Viewpoint => "viewpoint",
            PlaceCategory::Activity => "activity",
        }
    }
}

impl Display for PlaceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PlaceCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        PlaceCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == normalized)
            .ok_or_else(|| format!("unknown place category '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// A place from the catalogue. Read-only to the recommender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: PlaceId,
    pub name: String,
    pub category: PlaceCategory,
    pub city: String,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub verified: bool,
    /// When the place was added; `None` for legacy rows
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A single review of a place
///
/// Rating values are kept as raw JSON: the review form stores whatever the
/// client sent, and non-numeric values have to be tolerated downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub place_id: PlaceId,
    pub reviewer_id: UserId,
    #[serde(default)]
    pub ratings: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub experience_tags: BTreeSet<Tag>,
    #[serde(default)]
    pub comment: Option<String>,
}

impl Review {
    pub const MIN_RATING: f64 = 1.0;
    pub const MAX_RATING: f64 = 5.0;

    /// Mean of this review's rating dimensions
    ///
    /// Returns `None` when the review has no ratings or any value is not a
    /// number within 1..=5; such a review contributes nothing to a place's
    /// average rating.
    pub fn mean_rating(&self) -> Option<f64> {
        if self.ratings.is_empty() {
            return None;
        }

        let mut sum = 0.0;
        for value in self.ratings.values() {
            let score = value.as_f64()?;
            if !(Self::MIN_RATING..=Self::MAX_RATING).contains(&score) {
                return None;
            }
            sum += score;
        }

        Some(sum / self.ratings.len() as f64)
    }
}

/// A place joined with all of its reviews, as returned by the place store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceWithReviews {
    pub place: Place,
    pub reviews: Vec<Review>,
}
