use std::sync::Arc;
use std::time::Duration;

use crate::{
    db::{PlaceReviewStore, TrustEdgeStore},
    services::{
        recommendations::{RankingConfig, RankingConfigError, RecommendationPipeline},
        TrustGraphService,
    },
};

/// Shared handler state
///
/// Both services are stateless over their stores, so cloning per request is
/// just a couple of `Arc` bumps.
#[derive(Clone)]
pub struct AppState {
    pub trust_graph: TrustGraphService,
    pub pipeline: Arc<RecommendationPipeline>,
}

impl AppState {
    pub fn new(
        edge_store: Arc<dyn TrustEdgeStore>,
        place_store: Arc<dyn PlaceReviewStore>,
        ranking: RankingConfig,
        store_timeout: Duration,
    ) -> Result<Self, RankingConfigError> {
        let trust_graph = TrustGraphService::new(edge_store);
        let pipeline =
            RecommendationPipeline::new(trust_graph.clone(), place_store, ranking, store_timeout)?;

        Ok(Self {
            trust_graph,
            pipeline: Arc::new(pipeline),
        })
    }
}
