//! HTTP router construction.

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use crate::api;
use crate::state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.server.cors_origin);
    Router::new()
        .route("/health", get(api::health))
        .route("/query", get(api::query_get).post(api::query_post))
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    if origin == "*" {
        return CorsLayer::permissive();
    }
    match origin.parse::<HeaderValue>() {
        Ok(value) => CorsLayer::permissive().allow_origin(AllowOrigin::exact(value)),
        Err(_) => {
            warn!("Invalid CORS origin '{}', allowing any origin", origin);
            CorsLayer::permissive()
        }
    }
}
