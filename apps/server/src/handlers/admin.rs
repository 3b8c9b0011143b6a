use crate::error::ApiError;
use crate::state::AppState;
use axum::Json;
use axum::extract::{FromRequestParts, Path, State};
use axum::http::request::Parts;
use axum::http::{StatusCode, header};
use chrono::{DateTime, Utc};
use dropcatch_domain::{Competitor, CompetitorId, DomainName, Drop, DropId};
use dropcatch_registration::authorize;
use serde::{Deserialize, Serialize};

/// Rejects requests without the configured `Authorization: Token` header.
#[derive(Debug, Clone, Copy)]
pub(crate) struct AdminAuth;

impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts.headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok());
        authorize(state.config.registration.api_token.as_deref(), header)?;
        Ok(Self)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScheduleRequest {
    domain: String,
    drop_time: Option<DateTime<Utc>>,
    grace_minutes: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateRequest {
    count: u32,
    grace_minutes: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RescheduleRequest {
    drop_time: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DelayRequest {
    delay_ms: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct PurgeResponse {
    removed: usize,
}

pub(crate) async fn schedule_drop(
    _: AdminAuth,
    State(state): State<AppState>,
    Json(req): Json<ScheduleRequest>,
) -> Result<(StatusCode, Json<Drop>), ApiError> {
    let domain = DomainName::parse(&req.domain).map_err(|e| ApiError::invalid(e.to_string()))?;
    let drop = state.admin.schedule(domain, req.drop_time, req.grace_minutes)?;
    Ok((StatusCode::CREATED, Json(drop)))
}

pub(crate) async fn generate_drops(
    _: AdminAuth,
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<(StatusCode, Json<Vec<Drop>>), ApiError> {
    let grace = req.grace_minutes.unwrap_or(state.config.drops.grace_minutes);
    let drops = state.admin.generate(req.count, grace)?;
    Ok((StatusCode::CREATED, Json(drops)))
}

pub(crate) async fn reschedule_drop(
    _: AdminAuth,
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(req): Json<RescheduleRequest>,
) -> Result<Json<Drop>, ApiError> {
    Ok(Json(state.admin.reschedule(DropId(id), req.drop_time).await?))
}

pub(crate) async fn set_delay(
    _: AdminAuth,
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(req): Json<DelayRequest>,
) -> Result<Json<Competitor>, ApiError> {
    Ok(Json(state.admin.set_delay(CompetitorId(id), req.delay_ms).await?))
}

pub(crate) async fn purge_missed(
    _: AdminAuth,
    State(state): State<AppState>,
) -> Json<PurgeResponse> {
    Json(PurgeResponse { removed: state.admin.purge_missed() })
}
