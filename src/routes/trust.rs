use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use super::AppState;
use crate::{
    error::AppResult,
    models::{MutualStatus, TrustEdge, UserId},
};

#[derive(Debug, Deserialize)]
pub struct ConnectRequest {
    pub source: UserId,
    pub target: UserId,
}

pub async fn connect(
    State(state): State<AppState>,
    Json(request): Json<ConnectRequest>,
) -> AppResult<(StatusCode, Json<TrustEdge>)> {
    let edge = state
        .trust_graph
        .connect(request.source, request.target)
        .await?;
    Ok((StatusCode::CREATED, Json(edge)))
}

/// Removing a missing edge is not an error
pub async fn disconnect(
    State(state): State<AppState>,
    Path((source, target)): Path<(UserId, UserId)>,
) -> AppResult<StatusCode> {
    state.trust_graph.disconnect(source, target).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn mutual_status(
    State(state): State<AppState>,
    Path((source, target)): Path<(UserId, UserId)>,
) -> AppResult<Json<MutualStatus>> {
    let status = state.trust_graph.mutual_status(source, target).await?;
    Ok(Json(status))
}

/// Users trusted by or trusting `user`, sorted by id
pub async fn neighbors(
    State(state): State<AppState>,
    Path(user): Path<UserId>,
) -> AppResult<Json<Vec<UserId>>> {
    let neighbors = state.trust_graph.trusted_neighbors(user).await?;
    Ok(Json(neighbors.into_iter().collect()))
}
