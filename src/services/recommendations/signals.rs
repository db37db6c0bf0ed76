use std::collections::BTreeSet;

use crate::models::{PlaceSignal, PlaceWithReviews, UserId};

/// Aggregates a place's reviews into ranking signals
///
/// Reviews with missing or malformed ratings still count toward the
/// reviewer set, the tag set and `review_count`; they are only left out of
/// the average. `trusted` is empty for anonymous requests.
pub fn extract_signal(place: &PlaceWithReviews, trusted: &BTreeSet<UserId>) -> PlaceSignal {
    let mut rating_sum = 0.0;
    let mut rated_reviews = 0usize;
    let mut reviewer_ids = BTreeSet::new();
    let mut tag_set = BTreeSet::new();

    for review in &place.reviews {
        match review.mean_rating() {
            Some(rating) => {
                rating_sum += rating;
                rated_reviews += 1;
            }
            None if !review.ratings.is_empty() => {
                tracing::debug!(
                    place_id = %place.place.id,
                    reviewer_id = %review.reviewer_id,
                    "Skipping malformed review ratings"
                );
            }
            None => {}
        }

        reviewer_ids.insert(review.reviewer_id);
        tag_set.extend(review.experience_tags.iter().cloned());
    }

    let average_rating = if rated_reviews > 0 {
        rating_sum / rated_reviews as f64
    } else {
        0.0
    };

    let trusted_reviewer_count = reviewer_ids.intersection(trusted).count();

    PlaceSignal {
        average_rating,
        review_count: place.reviews.len(),
        reviewer_ids,
        tag_set,
        trusted_reviewer_count,
    }
}
