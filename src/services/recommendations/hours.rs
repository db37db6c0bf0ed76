use std::ops::Range;

use crate::models::PlaceCategory;

const LUNCH: Range<u32> = 11..15;
const DINNER: Range<u32> = 18..23;

/// Rough opening hours per category, by local hour of day (0-23)
///
/// A heuristic, not real opening times: it is only used to trim an already
/// ranked list down to places that are plausibly open right now.
pub fn is_open_at(category: PlaceCategory, hour: u32) -> bool {
    let hour = hour % 24;
    match category {
        PlaceCategory::Restaurant => LUNCH.contains(&hour) || DINNER.contains(&hour),
        PlaceCategory::Cafe => (7..19).contains(&hour),
        PlaceCategory::Bar => hour >= 18 || hour < 2,
        PlaceCategory::Nightlife => hour >= 21 || hour < 4,
        PlaceCategory::Museum => (9..18).contains(&hour),
        PlaceCategory::Attraction | PlaceCategory::Activity => (9..19).contains(&hour),
        PlaceCategory::Park | PlaceCategory::Viewpoint => (6..22).contains(&hour),
        PlaceCategory::Beach => (7..20).contains(&hour),
        PlaceCategory::Shopping => (10..21).contains(&hour),
        PlaceCategory::Market => (7..15).contains(&hour),
        PlaceCategory::Hotel => true,
    }
}
