use axum::{
    http::{StatusCode, Uri},
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    error::AppError,
    middleware::{make_span_with_request_id, request_id_middleware},
};

pub mod recommendations;
pub mod state;
pub mod trust;

pub use state::AppState;

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .fallback(not_found)
        .with_state(state)
        // Outermost first: the request id must exist before the trace span
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/recommendations", post(recommendations::recommend))
        .route(
            "/recommendations/immediate",
            post(recommendations::recommend_immediate),
        )
        .route("/trust/connections", post(trust::connect))
        .route(
            "/trust/connections/:source/:target",
            get(trust::mutual_status).delete(trust::disconnect),
        )
        .route("/trust/users/:user/neighbors", get(trust::neighbors))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}
