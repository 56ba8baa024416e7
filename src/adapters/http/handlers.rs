//! HTTP handlers for the personalization API.
//!
//! These handlers connect Axum routes to application layer command/query
//! handlers.

use std::sync::Arc;

use axum::extract::{Json, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;
use tracing::warn;

use crate::application::handlers::{
    GetInsightsHandler, GetInsightsQuery, GetProfileHandler, GetProfileQuery,
    IngestUpdateHandler, InitializeProfileCommand, InitializeProfileHandler, PersonalizeCommand,
    PersonalizeHandler, RecordFeedbackCommand, RecordFeedbackHandler,
};
use crate::domain::foundation::{
    DeviceId, DomainError, ErrorCode, InteractionId, Timestamp, UnitInterval, UserId,
};
use crate::domain::personalization::PersonalizationContext;
use crate::domain::profile::{
    default_reliability, FeedbackBreakdown, LearningFeedback, UpdateKind,
};
use crate::ports::NormalizedUpdate;

use super::dto::{
    BiomarkerIngestRequest, BiometricIngestRequest, ErrorResponse, FeedbackAcknowledged,
    FeedbackRequest, InitializeProfileRequest, InitializeProfileResponse, ProfileResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all request handlers.
#[derive(Clone)]
pub struct ApiState {
    pub initialize_profile: Arc<InitializeProfileHandler>,
    pub get_profile: Arc<GetProfileHandler>,
    pub ingest_update: Arc<IngestUpdateHandler>,
    pub personalize: Arc<PersonalizeHandler>,
    pub record_feedback: Arc<RecordFeedbackHandler>,
    pub get_insights: Arc<GetInsightsHandler>,
}

// ════════════════════════════════════════════════════════════════════════════════
// User Context
// ════════════════════════════════════════════════════════════════════════════════

/// Authenticated user context extracted from the `X-User-Id` header.
///
/// Authentication proper happens upstream at the gateway; this service
/// trusts the header it forwards.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

/// Rejection type for AuthenticatedUser extraction.
pub struct AuthenticationRequired;

impl IntoResponse for AuthenticationRequired {
    fn into_response(self) -> axum::response::Response {
        let error = ErrorResponse::from(&DomainError::new(
            ErrorCode::Unauthenticated,
            "Missing or invalid X-User-Id header",
        ));
        (StatusCode::UNAUTHORIZED, Json(error)).into_response()
    }
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthenticationRequired;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get("X-User-Id")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<UserId>().ok())
            .ok_or(AuthenticationRequired)?;

        Ok(AuthenticatedUser { user_id })
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/profile/initialize
pub async fn initialize_profile(
    State(state): State<ApiState>,
    user: AuthenticatedUser,
    Json(request): Json<InitializeProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let confidence = UnitInterval::try_new(request.archetype_confidence)
        .map_err(DomainError::from)
        .map_err(ApiError)?;

    let result = state
        .initialize_profile
        .handle(InitializeProfileCommand {
            user_id: user.user_id,
            archetype: request.archetype,
            archetype_confidence: confidence,
            fitness_level: request.fitness_level,
            demographics: request.demographics,
            constraints: request.constraints,
            preferences: request.preferences,
        })
        .await?;

    let status = if result.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(InitializeProfileResponse {
            created: result.created,
            profile: ProfileResponse::from(&result.profile),
        }),
    ))
}

#[derive(Debug, Default, Deserialize)]
pub struct GetProfileParams {
    /// Bypass the cache and read the store directly.
    #[serde(default, alias = "refresh")]
    pub force_refresh: bool,
}

/// GET /api/profile
pub async fn get_profile(
    State(state): State<ApiState>,
    user: AuthenticatedUser,
    Query(params): Query<GetProfileParams>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = state
        .get_profile
        .handle(GetProfileQuery {
            user_id: user.user_id,
            force_refresh: params.force_refresh,
        })
        .await?;
    Ok(Json(ProfileResponse::from(&profile)))
}

/// POST /api/biometrics
pub async fn ingest_biometrics(
    State(state): State<ApiState>,
    user: AuthenticatedUser,
    Json(request): Json<BiometricIngestRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let device_id = match request.device_id {
        Some(raw) => Some(DeviceId::new(raw).map_err(DomainError::from).map_err(ApiError)?),
        None => None,
    };
    state
        .ingest_update
        .handle(NormalizedUpdate {
            user_id: user.user_id,
            kind: UpdateKind::Biometrics,
            source: request.source,
            reliability: request
                .reliability
                .map(UnitInterval::new)
                .unwrap_or_else(|| default_reliability(UpdateKind::Biometrics, request.source)),
            biometrics: Some(request.sample),
            biomarkers: None,
            device_id,
            received_at: Timestamp::now(),
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/biomarkers
pub async fn ingest_biomarkers(
    State(state): State<ApiState>,
    user: AuthenticatedUser,
    Json(request): Json<BiomarkerIngestRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .ingest_update
        .handle(NormalizedUpdate {
            user_id: user.user_id,
            kind: UpdateKind::Biomarkers,
            source: request.source,
            reliability: request
                .reliability
                .map(UnitInterval::new)
                .unwrap_or_else(|| default_reliability(UpdateKind::Biomarkers, request.source)),
            biometrics: None,
            biomarkers: Some(request.sample),
            device_id: None,
            received_at: Timestamp::now(),
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/personalize
pub async fn personalize(
    State(state): State<ApiState>,
    user: AuthenticatedUser,
    Json(context): Json<PersonalizationContext>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .personalize
        .handle(PersonalizeCommand {
            user_id: user.user_id,
            context,
        })
        .await?;
    Ok(Json(result))
}

/// POST /api/learning-feedback
///
/// Always 202 once the body parses as JSON. Values that fail domain
/// validation are logged and dropped rather than rejected, matching how
/// the learning loop absorbs store outages and unmatched interactions.
pub async fn record_feedback(
    State(state): State<ApiState>,
    user: AuthenticatedUser,
    Json(request): Json<FeedbackRequest>,
) -> impl IntoResponse {
    match validate_feedback(request) {
        Ok(feedback) => {
            state
                .record_feedback
                .handle(RecordFeedbackCommand {
                    user_id: user.user_id,
                    feedback,
                })
                .await;
        }
        Err(err) => {
            warn!(
                user_id = %user.user_id,
                error = %err.message(),
                "feedback failed validation; dropped"
            );
        }
    }
    (StatusCode::ACCEPTED, Json(FeedbackAcknowledged::accepted()))
}

fn validate_feedback(request: FeedbackRequest) -> Result<LearningFeedback, DomainError> {
    let interaction_id = request
        .interaction_id
        .parse::<InteractionId>()
        .map_err(|_| {
            DomainError::validation("interaction_id", "Invalid interaction id format")
        })?;
    let satisfaction = UnitInterval::try_new(request.user_satisfaction)?;
    let feedback = LearningFeedback::new(
        interaction_id,
        satisfaction,
        request.effectiveness_rating,
        FeedbackBreakdown {
            relevance: request.relevance,
            tone: request.tone,
            timing: request.timing,
            actionability: request.actionability,
        },
        request.behavioral_outcomes,
    )?;
    Ok(feedback)
}

/// GET /api/insights
pub async fn get_insights(
    State(state): State<ApiState>,
    user: AuthenticatedUser,
    Query(params): Query<GetProfileParams>,
) -> Result<impl IntoResponse, ApiError> {
    let insights = state
        .get_insights
        .handle(GetInsightsQuery {
            user_id: user.user_id,
            force_refresh: params.force_refresh,
        })
        .await?;
    Ok(Json(insights))
}

/// GET /api/archetype-analysis
pub async fn get_archetype_analysis(
    State(state): State<ApiState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let analysis = state.get_insights.archetype(user.user_id).await?;
    Ok(Json(analysis))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// Wrapper mapping DomainError codes onto HTTP statuses.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.0.code() {
            ErrorCode::ValidationFailed => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthenticated => StatusCode::UNAUTHORIZED,
            ErrorCode::ProfileNotFound => StatusCode::NOT_FOUND,
            ErrorCode::ArchetypeConflict => StatusCode::CONFLICT,
            ErrorCode::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(ErrorResponse::from(&self.0))).into_response()
    }
}
