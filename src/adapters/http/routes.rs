//! Route configuration for the personalization API.
//!
//! Routes:
//! - `POST /api/profile/initialize` - Create (or idempotently confirm) a profile
//! - `GET  /api/profile` - Load the profile, `?force_refresh=true` to bypass the cache
//! - `POST /api/biometrics` - REST fallback for biometric ingestion
//! - `POST /api/biomarkers` - Lab panel ingestion
//! - `POST /api/personalize` - Run the two-layer adaptation
//! - `POST /api/learning-feedback` - Submit feedback (always accepted)
//! - `GET  /api/insights` - Derived insight surfaces
//! - `GET  /api/archetype-analysis` - Archetype assignment card

use axum::routing::{get, post};
use axum::Router;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

use super::handlers::{
    get_archetype_analysis, get_insights, get_profile, ingest_biomarkers, ingest_biometrics,
    initialize_profile, personalize, record_feedback, ApiState,
};

/// Creates the API router with all endpoints.
pub fn api_router() -> Router<ApiState> {
    Router::new()
        .route("/api/profile/initialize", post(initialize_profile))
        .route("/api/profile", get(get_profile))
        .route("/api/biometrics", post(ingest_biometrics))
        .route("/api/biomarkers", post(ingest_biomarkers))
        .route("/api/personalize", post(personalize))
        .route("/api/learning-feedback", post(record_feedback))
        .route("/api/insights", get(get_insights))
        .route("/api/archetype-analysis", get(get_archetype_analysis))
}

/// Tags every request with an `x-request-id`.
///
/// A UUID is generated when the caller did not send one, and the id is
/// echoed on the response so log lines can be correlated with replies.
pub fn with_request_ids(router: Router) -> Router {
    router
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
