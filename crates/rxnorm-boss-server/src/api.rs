//! Read-only HTTP API over one immutable snapshot.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use rxnorm_boss_core::query::QueryError;
use rxnorm_boss_core::{BossStats, GroupPage, GroupQuery, Snapshot};
use serde::Serialize;
use thiserror::Error;

/// The snapshot every handler reads; never mutated after startup.
pub type SharedSnapshot = Arc<Snapshot>;

/// Build the API router.
pub fn router(snapshot: SharedSnapshot) -> Router {
    Router::new()
        .route("/groups", get(groups))
        .route("/stats", get(stats))
        .route("/health", get(health))
        .with_state(snapshot)
}

/// Request errors. All of them map to `400 Bad Request`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("{0}")]
    Malformed(String),
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::Query(QueryError::InvalidPage(_)) => "invalid_page",
            ApiError::Query(QueryError::InvalidPageSize(_)) => "invalid_page_size",
            ApiError::Malformed(_) => "invalid_request",
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Malformed(rejection.body_text())
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: ErrorEnvelope,
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    code: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorEnvelope {
                code: self.code(),
                message: self.to_string(),
            },
        };
        log::warn!("Rejected request: {}", body.error.message);
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

/// Health and provenance of the loaded snapshot.
#[derive(Debug, Serialize)]
pub struct Health<'a> {
    pub status: &'static str,
    pub groups: usize,
    pub fingerprint: &'a str,
    pub generated_at: &'a str,
}

async fn groups(
    State(snapshot): State<SharedSnapshot>,
    query: Result<Query<GroupQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    let page: GroupPage<'_> = query.apply(&snapshot.groups)?;
    log::debug!(
        "GET /groups page={} page_size={} q={:?} -> {} of {}",
        page.page,
        page.page_size,
        query.q,
        page.results.len(),
        page.total
    );
    Ok(Json(page).into_response())
}

async fn stats(State(snapshot): State<SharedSnapshot>) -> Json<BossStats> {
    Json(snapshot.stats.clone())
}

async fn health(State(snapshot): State<SharedSnapshot>) -> Response {
    Json(Health {
        status: "ok",
        groups: snapshot.len(),
        fingerprint: &snapshot.fingerprint,
        generated_at: &snapshot.generated_at,
    })
    .into_response()
}
