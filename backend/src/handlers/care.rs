//! HTTP handlers for care task endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::care::{
    CareService, CareTaskFilter, CareTaskRecord, GenerateScheduleInput, ScheduleSummary,
    UpdateTaskStatusInput,
};
use crate::AppState;
use shared::{detect_climate, ClimateZone};

/// Generate and store a care schedule for a plant
pub async fn create_care_schedule(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<GenerateScheduleInput>,
) -> AppResult<(StatusCode, Json<ScheduleSummary>)> {
    tracing::debug!(
        user_id = %current_user.0.user_id,
        email = current_user.0.email.as_deref().unwrap_or("-"),
        "Care schedule requested"
    );
    let service = CareService::new(state.db);
    let summary = service
        .generate_schedule(current_user.0.user_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(summary)))
}

/// List care tasks, optionally filtered by status, due window and report
pub async fn list_care_tasks(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(filter): Query<CareTaskFilter>,
) -> AppResult<Json<Vec<CareTaskRecord>>> {
    let service = CareService::new(state.db);
    let tasks = service.list_tasks(current_user.0.user_id, filter).await?;
    Ok(Json(tasks))
}

/// Open tasks due today (overdue included)
pub async fn get_todays_tasks(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<CareTaskRecord>>> {
    let service = CareService::new(state.db);
    let tasks = service.todays_tasks(current_user.0.user_id).await?;
    Ok(Json(tasks))
}

/// Mark a task done or not done
pub async fn update_care_task(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(task_id): Path<Uuid>,
    Json(input): Json<UpdateTaskStatusInput>,
) -> AppResult<Json<CareTaskRecord>> {
    let service = CareService::new(state.db);
    let task = service
        .update_status(current_user.0.user_id, task_id, input.status)
        .await?;
    Ok(Json(task))
}

/// Query parameters for climate lookup; longitude is ignored by the bands
#[derive(Debug, Deserialize)]
pub struct ClimateQuery {
    pub latitude: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ClimateResponse {
    pub climate: ClimateZone,
}

/// Climate band for a location
pub async fn get_climate(
    _current_user: CurrentUser,
    Query(query): Query<ClimateQuery>,
) -> Json<ClimateResponse> {
    Json(ClimateResponse {
        climate: detect_climate(query.latitude),
    })
}
