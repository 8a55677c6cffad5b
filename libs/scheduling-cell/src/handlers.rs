use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use serde::Deserialize;
use serde_json::{json, Value};
use chrono::NaiveDate;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{CreateScheduleWindowRequest, UpdateScheduleWindowRequest};
use crate::services::{
    availability::AvailabilityService,
    schedule::ScheduleService,
};

// Query parameters for the availability endpoints
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub duration_minutes: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityOverviewQuery {
    pub provider_ids: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

// ==============================================================================
// PUBLIC AVAILABILITY HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn get_provider_availability(
    State(state): State<Arc<AppConfig>>,
    Path(provider_id): Path<String>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Value>, AppError> {
    let availability_service = AvailabilityService::new(&state);

    let availability = availability_service
        .get_provider_availability(&provider_id, query.from, query.to, query.duration_minutes)
        .await?;

    Ok(Json(json!(availability)))
}

#[axum::debug_handler]
pub async fn get_availability_overview(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<AvailabilityOverviewQuery>,
) -> Result<Json<Value>, AppError> {
    let provider_ids: Vec<String> = query
        .provider_ids
        .split(',')
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .collect();

    if provider_ids.is_empty() {
        return Err(AppError::BadRequest(
            "provider_ids must contain at least one provider".to_string(),
        ));
    }

    let availability_service = AvailabilityService::new(&state);

    let overview = availability_service
        .get_availability_overview(provider_ids, query.from, query.to)
        .await?;

    Ok(Json(json!({
        "providers": overview,
        "total": overview.len()
    })))
}

#[axum::debug_handler]
pub async fn get_provider_schedule(
    State(state): State<Arc<AppConfig>>,
    Path(provider_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let schedule_service = ScheduleService::new(&state);

    let windows = schedule_service.get_provider_schedule(&provider_id).await?;

    Ok(Json(json!({
        "provider_id": provider_id,
        "schedule_windows": windows
    })))
}

// ==============================================================================
// SCHEDULE MANAGEMENT HANDLERS
// ==============================================================================
// The bearer token is forwarded verbatim to the storage layer, which enforces
// row-level access for schedule mutations.

#[axum::debug_handler]
pub async fn create_schedule_window(
    State(state): State<Arc<AppConfig>>,
    Path(provider_id): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<CreateScheduleWindowRequest>,
) -> Result<Json<Value>, AppError> {
    let schedule_service = ScheduleService::new(&state);

    let window = schedule_service
        .create_schedule_window(&provider_id, request, auth.token())
        .await?;

    Ok(Json(json!(window)))
}

#[axum::debug_handler]
pub async fn update_schedule_window(
    State(state): State<Arc<AppConfig>>,
    Path((_provider_id, window_id)): Path<(String, String)>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<UpdateScheduleWindowRequest>,
) -> Result<Json<Value>, AppError> {
    let schedule_service = ScheduleService::new(&state);

    let window = schedule_service
        .update_schedule_window(&window_id, request, auth.token())
        .await?;

    Ok(Json(json!(window)))
}

#[axum::debug_handler]
pub async fn delete_schedule_window(
    State(state): State<Arc<AppConfig>>,
    Path((_provider_id, window_id)): Path<(String, String)>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let schedule_service = ScheduleService::new(&state);

    schedule_service
        .delete_schedule_window(&window_id, auth.token())
        .await?;

    Ok(Json(json!({
        "deleted": true,
        "window_id": window_id
    })))
}
