use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{PlaceCategory, Tag};

/// Who the traveler is travelling with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelType {
    Solo,
    Couple,
    Family,
    Friends,
    Business,
}

impl TravelType {
    /// Tags implied by the travel type, merged into the traveler's own tags
    pub fn contextual_tags(&self) -> &'static [&'static str] {
        match self {
            TravelType::Solo => &["solo_friendly", "social"],
            TravelType::Couple => &["romantic", "quiet"],
            TravelType::Family => &["family_friendly", "kid_friendly"],
            TravelType::Friends => &["group_friendly", "lively"],
            TravelType::Business => &["wifi", "quiet"],
        }
    }
}

/// Destinations with a curated category mix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DestinationArea {
    Lisbon,
    Barcelona,
    Rome,
    Paris,
    Amsterdam,
    Tokyo,
}

impl DestinationArea {
    /// Categories used when the destination is not one we know
    pub const DEFAULT_CATEGORIES: [PlaceCategory; 5] = [
        PlaceCategory::Restaurant,
        PlaceCategory::Cafe,
        PlaceCategory::Attraction,
        PlaceCategory::Park,
        PlaceCategory::Museum,
    ];

    /// Case-insensitive lookup by destination name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "lisbon" => Some(DestinationArea::Lisbon),
            "barcelona" => Some(DestinationArea::Barcelona),
            "rome" => Some(DestinationArea::Rome),
            "paris" => Some(DestinationArea::Paris),
            "amsterdam" => Some(DestinationArea::Amsterdam),
            "tokyo" => Some(DestinationArea::Tokyo),
            _ => None,
        }
    }

    pub fn categories(&self) -> &'static [PlaceCategory] {
        use PlaceCategory::*;
        match self {
            DestinationArea::Lisbon => &[Restaurant, Cafe, Viewpoint, Museum, Bar, Market],
            DestinationArea::Barcelona => &[Beach, Restaurant, Bar, Nightlife, Museum, Attraction],
            DestinationArea::Rome => &[Attraction, Museum, Restaurant, Cafe],
            DestinationArea::Paris => &[Museum, Cafe, Restaurant, Shopping, Attraction, Viewpoint],
            DestinationArea::Amsterdam => &[Museum, Cafe, Bar, Park, Activity],
            DestinationArea::Tokyo => &[Restaurant, Shopping, Attraction, Nightlife, Market, Park],
        }
    }
}

/// Travel plan submitted by the planning wizard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelPlanQuery {
    /// Categories picked explicitly by the traveler, if any
    #[serde(default)]
    pub categories: Option<BTreeSet<PlaceCategory>>,
    /// Destination city; also the city filter for candidate places
    pub destination_area: String,
    #[serde(default)]
    pub experience_tags: BTreeSet<Tag>,
    pub travel_type: TravelType,
}

impl TravelPlanQuery {
    /// True when the traveler picked at least one category explicitly
    pub fn has_explicit_categories(&self) -> bool {
        self.explicit_categories().is_some()
    }

    /// The explicit category set, `None` when absent or empty
    pub fn explicit_categories(&self) -> Option<&BTreeSet<PlaceCategory>> {
        self.categories.as_ref().filter(|c| !c.is_empty())
    }

    /// Own tags plus the travel type's contextual tags
    pub fn preferred_tags(&self) -> BTreeSet<Tag> {
        let mut tags = self.experience_tags.clone();
        tags.extend(
            self.travel_type
                .contextual_tags()
                .iter()
                .map(|tag| tag.to_string()),
        );
        tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(tags: &[&str], travel_type: TravelType) -> TravelPlanQuery {
        TravelPlanQuery {
            categories: None,
            destination_area: "Lisbon".to_string(),
            experience_tags: tags.iter().map(|t| t.to_string()).collect(),
            travel_type,
        }
    }

    #[test]
    fn test_from_name_is_case_insensitive() {
        assert_eq!(DestinationArea::from_name(" LISBON "), Some(DestinationArea::Lisbon));
        assert_eq!(DestinationArea::from_name("tokyo"), Some(DestinationArea::Tokyo));
        assert_eq!(DestinationArea::from_name("Atlantis"), None);
    }

    #[test]
    fn test_preferred_tags_include_contextual_tags() {
        let tags = plan(&["rooftop", "quiet"], TravelType::Couple).preferred_tags();
        let expected: BTreeSet<Tag> = ["rooftop", "quiet", "romantic"]
            .iter()
            .map(|t| t.to_string())
            .collect();
        assert_eq!(tags, expected);
    }

    #[test]
    fn test_empty_category_set_is_not_explicit() {
        let mut query = plan(&[], TravelType::Solo);
        assert!(!query.has_explicit_categories());
        query.categories = Some(BTreeSet::new());
        assert!(!query.has_explicit_categories());
        assert_eq!(query.explicit_categories(), None);
        query.categories = Some([PlaceCategory::Bar].into_iter().collect());
        assert!(query.has_explicit_categories());
    }

    #[test]
    fn test_deserializes_wizard_payload() {
        let query: TravelPlanQuery = serde_json::from_str(
            r#"{"destination_area":"Rome","experience_tags":["history"],"travel_type":"family"}"#,
        )
        .unwrap();
        assert_eq!(query.categories, None);
        assert_eq!(query.travel_type, TravelType::Family);
        assert!(query.experience_tags.contains("history"));
    }
}
