use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    db::store::{PlaceReviewStore, TrustEdgeStore},
    error::{StoreError, StoreResult},
    models::{Place, PlaceCategory, PlaceId, PlaceWithReviews, Review, TrustEdge, UserId},
};

/// In-process store backing both collaborator traits
///
/// Used by tests and for running the API without a database. Cloning shares
/// the underlying data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<MemoryStoreInner>>,
}

#[derive(Default)]
struct MemoryStoreInner {
    edges: HashMap<(UserId, UserId), TrustEdge>,
    places: HashMap<PlaceId, Place>,
    reviews: Vec<Review>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_place(&self, place: Place) {
        self.inner.write().await.places.insert(place.id, place);
    }

    pub async fn add_review(&self, review: Review) {
        self.inner.write().await.reviews.push(review);
    }

    pub async fn edge_count(&self) -> usize {
        self.inner.read().await.edges.len()
    }
}

#[async_trait::async_trait]
impl TrustEdgeStore for MemoryStore {
    async fn edges_from(&self, source: UserId) -> StoreResult<Vec<TrustEdge>> {
        let inner = self.inner.read().await;
        Ok(inner
            .edges
            .values()
            .filter(|edge| edge.source == source)
            .cloned()
            .collect())
    }

    async fn edges_to(&self, target: UserId) -> StoreResult<Vec<TrustEdge>> {
        let inner = self.inner.read().await;
        Ok(inner
            .edges
            .values()
            .filter(|edge| edge.target == target)
            .cloned()
            .collect())
    }

    async fn edge_exists(&self, source: UserId, target: UserId) -> StoreResult<bool> {
        Ok(self.inner.read().await.edges.contains_key(&(source, target)))
    }

    async fn insert_edge(&self, edge: &TrustEdge) -> StoreResult<()> {
        // Check and insert happen under one write lock, same as a unique index
        let mut inner = self.inner.write().await;
        let key = (edge.source, edge.target);
        if inner.edges.contains_key(&key) {
            return Err(StoreError::Duplicate);
        }
        inner.edges.insert(key, edge.clone());
        Ok(())
    }

    async fn delete_edge(&self, source: UserId, target: UserId) -> StoreResult<()> {
        self.inner.write().await.edges.remove(&(source, target));
        Ok(())
    }
}

#[async_trait::async_trait]
impl PlaceReviewStore for MemoryStore {
    async fn places_with_reviews(
        &self,
        city: &str,
        categories: &[PlaceCategory],
        limit: usize,
    ) -> StoreResult<Vec<PlaceWithReviews>> {
        let inner = self.inner.read().await;

        let mut places: Vec<&Place> = inner
            .places
            .values()
            .filter(|place| place.city.eq_ignore_ascii_case(city.trim()))
            .filter(|place| categories.contains(&place.category))
            .filter(|place| inner.reviews.iter().any(|r| r.place_id == place.id))
            .collect();

        // Newest first, matching the SQL store's ordering
        places.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.id.cmp(&b.id))
        });
        places.truncate(limit);

        Ok(places
            .into_iter()
            .map(|place| PlaceWithReviews {
                place: place.clone(),
                reviews: inner
                    .reviews
                    .iter()
                    .filter(|review| review.place_id == place.id)
                    .cloned()
                    .collect(),
            })
            .collect())
    }
}
