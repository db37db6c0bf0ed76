//! Contracts for the stores the recommender reads from
//!
//! Places, reviews and trust edges live outside this service. The services
//! only see these traits, so the backing store can be PostgreSQL, the
//! in-memory store, or a mock in tests.

use crate::{
    error::StoreResult,
    models::{PlaceCategory, PlaceWithReviews, TrustEdge, UserId},
};

/// Durable storage for directed trust edges
///
/// Implementations must enforce at most one edge per ordered
/// `(source, target)` pair and report a second insert as
/// [`StoreError::Duplicate`](crate::error::StoreError::Duplicate).
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TrustEdgeStore: Send + Sync {
    /// Edges where `source` is the truster
    async fn edges_from(&self, source: UserId) -> StoreResult<Vec<TrustEdge>>;

    /// Edges where `target` is the trusted user
    async fn edges_to(&self, target: UserId) -> StoreResult<Vec<TrustEdge>>;

    async fn edge_exists(&self, source: UserId, target: UserId) -> StoreResult<bool>;

    /// Inserts the edge, failing with `Duplicate` if the pair already exists
    async fn insert_edge(&self, edge: &TrustEdge) -> StoreResult<()>;

    /// Deletes the edge; deleting a missing edge is not an error
    async fn delete_edge(&self, source: UserId, target: UserId) -> StoreResult<()>;
}

/// Read access to places joined with their reviews
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PlaceReviewStore: Send + Sync {
    /// Places in `city` whose category is one of `categories`, each with all
    /// of its reviews, at most `limit` places
    ///
    /// Places without reviews are excluded before `limit` is applied.
    async fn places_with_reviews(
        &self,
        city: &str,
        categories: &[PlaceCategory],
        limit: usize,
    ) -> StoreResult<Vec<PlaceWithReviews>>;
}
