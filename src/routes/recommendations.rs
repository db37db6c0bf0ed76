use axum::{extract::State, Json};
use chrono::{Timelike, Utc};
use serde::Deserialize;

use super::AppState;
use crate::{
    error::{AppError, AppResult},
    models::{RecommendedPlace, TravelPlanQuery, UserId},
};

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub plan: TravelPlanQuery,
    pub requester_id: Option<UserId>,
}

#[derive(Debug, Deserialize)]
pub struct ImmediateRecommendationRequest {
    pub plan: TravelPlanQuery,
    pub requester_id: Option<UserId>,
    /// Local hour of day at the destination, 0-23
    ///
    /// When absent the server's current UTC hour is used, which is only the
    /// local hour for destinations on UTC. Clients should send it.
    pub hour: Option<u32>,
}

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<Vec<RecommendedPlace>>> {
    let places = state
        .pipeline
        .recommend(&request.plan, request.requester_id)
        .await;
    Ok(Json(places))
}

/// Handler for the open-now variant
pub async fn recommend_immediate(
    State(state): State<AppState>,
    Json(request): Json<ImmediateRecommendationRequest>,
) -> AppResult<Json<Vec<RecommendedPlace>>> {
    let hour = match request.hour {
        Some(hour) if hour > 23 => {
            return Err(AppError::InvalidInput(format!(
                "hour must be between 0 and 23, got {}",
                hour
            )))
        }
        Some(hour) => hour,
        None => Utc::now().hour(),
    };

    let places = state
        .pipeline
        .immediate_recommendations(&request.plan, request.requester_id, hour)
        .await;
    Ok(Json(places))
}
