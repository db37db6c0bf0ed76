use uuid::Uuid;

mod place;
mod recommendation;
mod travel_plan;
mod trust;

pub use place::{Coordinates, Place, PlaceCategory, PlaceWithReviews, Review};
pub use recommendation::{PlaceSignal, RecommendationCandidate, RecommendedPlace};
pub use travel_plan::{DestinationArea, TravelPlanQuery, TravelType};
pub use trust::{MutualStatus, TrustEdge, DEFAULT_TRUST_LEVEL};

/// Opaque user identifier, owned by the account system
pub type UserId = Uuid;

/// Identifier of a place in the place catalogue
pub type PlaceId = Uuid;

/// Free-form experience tag attached to reviews and travel plans (e.g. "romantic")
pub type Tag = String;
