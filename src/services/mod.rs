pub mod recommendations;
pub mod trust_graph;

pub use recommendations::{RankingConfig, RecommendationPipeline};
pub use trust_graph::TrustGraphService;
