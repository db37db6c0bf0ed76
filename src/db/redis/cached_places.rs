use crate::{
    cached,
    db::{store::PlaceReviewStore, Cache, CacheKey},
    error::StoreResult,
    models::{PlaceCategory, PlaceWithReviews},
};

/// Read-through Redis cache in front of a place store
///
/// Candidate fetches for a popular city are identical across requests for a
/// few minutes at a time; this keeps them off the database. A Redis outage
/// degrades to uncached reads.
pub struct CachedPlaceStore<S> {
    inner: S,
    cache: Cache,
    ttl_secs: u64,
}

impl<S: PlaceReviewStore> CachedPlaceStore<S> {
    pub fn new(inner: S, cache: Cache, ttl_secs: u64) -> Self {
        Self {
            inner,
            cache,
            ttl_secs,
        }
    }
}

#[async_trait::async_trait]
impl<S: PlaceReviewStore> PlaceReviewStore for CachedPlaceStore<S> {
    async fn places_with_reviews(
        &self,
        city: &str,
        categories: &[PlaceCategory],
        limit: usize,
    ) -> StoreResult<Vec<PlaceWithReviews>> {
        let key = CacheKey::candidates(city, categories, limit);

        cached!(self.cache, key, self.ttl_secs, async {
            self.inner.places_with_reviews(city, categories, limit).await
        })
    }
}
