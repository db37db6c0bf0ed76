//! Place recommendations for a travel plan
//!
//! A request runs retrieve -> extract signals -> score -> classify/filter
//! -> diversify -> rank. Each request builds its own candidates; nothing is
//! shared between requests except the stores.
//!
//! Store failures never reach the caller. A failed or slow trust lookup
//! means no social boost; a failed place lookup means no recommendations.

use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use crate::{
    db::PlaceReviewStore,
    error::{StoreError, StoreResult},
    models::{PlaceWithReviews, RecommendedPlace, TravelPlanQuery, UserId},
    services::trust_graph::TrustGraphService,
};

pub mod classifier;
pub mod hours;
pub mod ranking_config;
pub mod retriever;
pub mod scoring;
pub mod signals;

use classifier::QueryClass;
pub use ranking_config::{RankingConfig, RankingConfigError, ScoringWeights};
use retriever::{CandidateRetriever, ResolvedCategories};
pub use scoring::ScoringEngine;

pub struct RecommendationPipeline {
    trust_graph: TrustGraphService,
    retriever: CandidateRetriever,
    engine: ScoringEngine,
    store_timeout: Duration,
}

impl RecommendationPipeline {
    pub fn new(
        trust_graph: TrustGraphService,
        place_store: Arc<dyn PlaceReviewStore>,
        config: RankingConfig,
        store_timeout: Duration,
    ) -> Result<Self, RankingConfigError> {
        let retriever = CandidateRetriever::new(place_store, config.fetch_limit);
        let engine = ScoringEngine::new(config)?;

        Ok(Self {
            trust_graph,
            retriever,
            engine,
            store_timeout,
        })
    }

    /// Ranked places for a travel plan, at most `result_limit` of them
    ///
    /// `requester` is optional; anonymous requests get no social boost.
    pub async fn recommend(
        &self,
        query: &TravelPlanQuery,
        requester: Option<UserId>,
    ) -> Vec<RecommendedPlace> {
        self.recommend_at(query, requester, Utc::now()).await
    }

    /// Same as [`recommend`](Self::recommend) with an explicit clock for novelty
    pub async fn recommend_at(
        &self,
        query: &TravelPlanQuery,
        requester: Option<UserId>,
        now: DateTime<Utc>,
    ) -> Vec<RecommendedPlace> {
        let start = Instant::now();
        let config = self.engine.config();

        let preferred_tags = query.preferred_tags();
        let resolved = CandidateRetriever::resolve_categories(query);

        // Independent lookups; only scoring needs both
        let (trusted, places) = tokio::join!(
            self.load_trusted_neighbors(requester),
            self.load_places(query, &resolved),
        );

        let retrieved = places.len();
        let candidates: Vec<_> = places
            .into_iter()
            .map(|p| {
                let signal = signals::extract_signal(&p, &trusted);
                self.engine.score(p.place, signal, &preferred_tags, now)
            })
            .collect();

        let class = classifier::classify(query, &resolved.categories, &preferred_tags, config);
        let outcome =
            classifier::filter_candidates(class, candidates, query.categories.as_ref(), config);
        let admitted = outcome.candidates.len();

        let diversified = class == QueryClass::General
            && outcome.candidates.len() > config.diversity_min_candidates;
        let mut ranked = if diversified {
            classifier::diversify(outcome.candidates, config)
        } else {
            outcome.candidates
        };

        classifier::rank(&mut ranked);
        ranked.truncate(config.result_limit);

        tracing::info!(
            destination = %query.destination_area,
            query_class = class.as_str(),
            category_source = ?resolved.source,
            trusted_neighbors = trusted.len(),
            retrieved,
            admitted,
            used_fallback = outcome.used_fallback,
            diversified,
            returned = ranked.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Recommendations computed"
        );

        ranked.into_iter().map(RecommendedPlace::from).collect()
    }

    /// Ranked places that are plausibly open at `hour` (0-23)
    ///
    /// The opening-hours filter runs on the final ranking, so it can only
    /// shorten the list, never pull in places that did not rank.
    pub async fn immediate_recommendations(
        &self,
        query: &TravelPlanQuery,
        requester: Option<UserId>,
        hour: u32,
    ) -> Vec<RecommendedPlace> {
        self.immediate_recommendations_at(query, requester, hour, Utc::now())
            .await
    }

    pub async fn immediate_recommendations_at(
        &self,
        query: &TravelPlanQuery,
        requester: Option<UserId>,
        hour: u32,
        now: DateTime<Utc>,
    ) -> Vec<RecommendedPlace> {
        let ranked = self.recommend_at(query, requester, now).await;
        let ranked_count = ranked.len();

        let open: Vec<RecommendedPlace> = ranked
            .into_iter()
            .filter(|place| hours::is_open_at(place.category, hour))
            .collect();

        tracing::debug!(hour, ranked = ranked_count, open = open.len(), "Applied open-hours filter");

        open
    }

    async fn load_trusted_neighbors(&self, requester: Option<UserId>) -> BTreeSet<UserId> {
        let Some(user) = requester else {
            return BTreeSet::new();
        };

        match self
            .with_timeout(self.trust_graph.trusted_neighbors(user))
            .await
        {
            Ok(neighbors) => neighbors,
            Err(e) => {
                tracing::warn!(
                    requester = %user,
                    error = %e,
                    "Trust graph unavailable, continuing without social boost"
                );
                BTreeSet::new()
            }
        }
    }

    async fn load_places(
        &self,
        query: &TravelPlanQuery,
        resolved: &ResolvedCategories,
    ) -> Vec<PlaceWithReviews> {
        match self
            .with_timeout(self.retriever.retrieve(query, resolved))
            .await
        {
            Ok(places) => places,
            Err(e) => {
                tracing::warn!(
                    destination = %query.destination_area,
                    error = %e,
                    "Place store unavailable, returning no candidates"
                );
                Vec::new()
            }
        }
    }

    async fn with_timeout<T>(&self, fut: impl Future<Output = StoreResult<T>>) -> StoreResult<T> {
        tokio::time::timeout(self.store_timeout, fut)
            .await
            .map_err(|_| StoreError::Timeout(self.store_timeout))?
    }
}
