//! `/query`: build a network from the request parameters.
//!
//! GET takes a flat query string, POST a JSON body; both accept the same
//! option names.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use netbuilder_core::QueryParams;
use tracing::{info, warn};

use super::ApiError;
use crate::state::AppState;

pub async fn query_get(
    State(state): State<Arc<AppState>>,
    params: Result<Query<QueryParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::bad_request(e.body_text()))?;
    run(&state, params).await
}

pub async fn query_post(
    State(state): State<Arc<AppState>>,
    params: Result<Json<QueryParams>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(params) = params.map_err(|e| ApiError::bad_request(e.body_text()))?;
    run(&state, params).await
}

async fn run(state: &AppState, params: QueryParams) -> Result<Response, ApiError> {
    info!(
        "Network query against {} (limit {}, format {:?})",
        params.endpoint, params.limit, params.format
    );
    match state.builder.query(&params).await {
        Ok(out) => {
            let content_type = out.content_type();
            Ok(([(header::CONTENT_TYPE, content_type)], out.into_body()).into_response())
        }
        Err(e) => {
            warn!("Network query failed: {}", e);
            Err(e.into())
        }
    }
}
