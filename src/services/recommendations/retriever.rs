use std::sync::Arc;

use crate::{
    db::PlaceReviewStore,
    error::StoreResult,
    models::{DestinationArea, PlaceCategory, PlaceWithReviews, TravelPlanQuery},
};

/// Where a query's category set came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategorySource {
    /// Picked by the traveler
    Explicit,
    /// Curated set for a known destination
    Area(DestinationArea),
    /// Destination not recognized
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCategories {
    pub categories: Vec<PlaceCategory>,
    pub source: CategorySource,
}

/// Fetches the places a travel plan could be recommended
pub struct CandidateRetriever {
    store: Arc<dyn PlaceReviewStore>,
    fetch_limit: usize,
}

impl CandidateRetriever {
    pub fn new(store: Arc<dyn PlaceReviewStore>, fetch_limit: usize) -> Self {
        Self { store, fetch_limit }
    }

    /// Explicit categories, else the destination's curated set, else defaults
    pub fn resolve_categories(query: &TravelPlanQuery) -> ResolvedCategories {
        if let Some(categories) = query.explicit_categories() {
            return ResolvedCategories {
                categories: categories.iter().copied().collect(),
                source: CategorySource::Explicit,
            };
        }

        match DestinationArea::from_name(&query.destination_area) {
            Some(area) => ResolvedCategories {
                categories: area.categories().to_vec(),
                source: CategorySource::Area(area),
            },
            None => {
                tracing::debug!(
                    destination = %query.destination_area,
                    "Unknown destination, using default categories"
                );
                ResolvedCategories {
                    categories: DestinationArea::DEFAULT_CATEGORIES.to_vec(),
                    source: CategorySource::Default,
                }
            }
        }
    }

    /// Places in the destination with at least one review
    pub async fn retrieve(
        &self,
        query: &TravelPlanQuery,
        resolved: &ResolvedCategories,
    ) -> StoreResult<Vec<PlaceWithReviews>> {
        let places = self
            .store
            .places_with_reviews(&query.destination_area, &resolved.categories, self.fetch_limit)
            .await?;

        let fetched = places.len();
        let reviewed: Vec<PlaceWithReviews> = places
            .into_iter()
            .filter(|p| !p.reviews.is_empty())
            .collect();

        tracing::debug!(
            destination = %query.destination_area,
            fetched,
            reviewed = reviewed.len(),
            "Retrieved candidate places"
        );

        Ok(reviewed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{store::MockPlaceReviewStore, MemoryStore};
    use crate::error::StoreError;
    use crate::models::{Place, Review, TravelType};
    use std::collections::{BTreeMap, BTreeSet};
    use uuid::Uuid;

    fn query(destination: &str, categories: Option<Vec<PlaceCategory>>) -> TravelPlanQuery {
        TravelPlanQuery {
            categories: categories.map(|c| c.into_iter().collect()),
            destination_area: destination.to_string(),
            experience_tags: BTreeSet::new(),
            travel_type: TravelType::Solo,
        }
    }

    #[test]
    fn test_explicit_categories_win() {
        let resolved = CandidateRetriever::resolve_categories(&query(
            "Lisbon",
            Some(vec![PlaceCategory::Beach]),
        ));
        assert_eq!(resolved.source, CategorySource::Explicit);
        assert_eq!(resolved.categories, vec![PlaceCategory::Beach]);
    }

    #[test]
    fn test_known_area_uses_curated_categories() {
        let resolved = CandidateRetriever::resolve_categories(&query("rome", None));
        assert_eq!(resolved.source, CategorySource::Area(DestinationArea::Rome));
        assert_eq!(resolved.categories, DestinationArea::Rome.categories().to_vec());
    }

    #[test]
    fn test_empty_explicit_set_falls_through_to_area() {
        let resolved = CandidateRetriever::resolve_categories(&query("Tokyo", Some(vec![])));
        assert_eq!(resolved.source, CategorySource::Area(DestinationArea::Tokyo));
    }

    #[test]
    fn test_unknown_area_uses_defaults() {
        let resolved = CandidateRetriever::resolve_categories(&query("Atlantis", None));
        assert_eq!(resolved.source, CategorySource::Default);
        assert_eq!(
            resolved.categories,
            DestinationArea::DEFAULT_CATEGORIES.to_vec()
        );
    }

    #[tokio::test]
    async fn test_retrieve_drops_places_without_reviews() {
        let store = MemoryStore::new();
        let reviewed = Place {
            id: Uuid::new_v4(),
            name: "Reviewed".to_string(),
            category: PlaceCategory::Cafe,
            city: "Lisbon".to_string(),
            coordinates: None,
            description: None,
            verified: false,
            created_at: None,
        };
        let unreviewed = Place {
            id: Uuid::new_v4(),
            name: "Unreviewed".to_string(),
            ..reviewed.clone()
        };
        store
            .add_review(Review {
                place_id: reviewed.id,
                reviewer_id: Uuid::new_v4(),
                ratings: BTreeMap::new(),
                experience_tags: BTreeSet::new(),
                comment: None,
            })
            .await;
        store.add_place(reviewed.clone()).await;
        store.add_place(unreviewed).await;

        let retriever = CandidateRetriever::new(Arc::new(store), 100);
        let q = query("Lisbon", Some(vec![PlaceCategory::Cafe]));
        let resolved = CandidateRetriever::resolve_categories(&q);
        let places = retriever.retrieve(&q, &resolved).await.unwrap();

        assert_eq!(places.len(), 1);
        assert_eq!(places[0].place.id, reviewed.id);
    }

    #[tokio::test]
    async fn test_retrieve_passes_fetch_limit_and_city() {
        let mut store = MockPlaceReviewStore::new();
        store
            .expect_places_with_reviews()
            .withf(|city, categories, limit| {
                city.to_string() == "Paris"
                    && categories.to_vec() == vec![PlaceCategory::Museum]
                    && *limit == 42
            })
            .times(1)
            .returning(|_, _, _| Ok(Vec::new()));

        let retriever = CandidateRetriever::new(Arc::new(store), 42);
        let q = query("Paris", Some(vec![PlaceCategory::Museum]));
        let resolved = CandidateRetriever::resolve_categories(&q);

        assert!(retriever.retrieve(&q, &resolved).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_retrieve_propagates_store_errors() {
        let mut store = MockPlaceReviewStore::new();
        store
            .expect_places_with_reviews()
            .returning(|_, _, _| Err(StoreError::Unavailable("down".to_string())));

        let retriever = CandidateRetriever::new(Arc::new(store), 100);
        let q = query("Paris", None);
        let resolved = CandidateRetriever::resolve_categories(&q);

        assert!(retriever.retrieve(&q, &resolved).await.is_err());
    }
}
