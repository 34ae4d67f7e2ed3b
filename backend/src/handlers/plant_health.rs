//! HTTP handlers for plant health check endpoints

use axum::{
    extract::{multipart::MultipartError, Multipart, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::plant_health::{HealthCheckRecord, HealthCheckUpload, PlantHealthService};
use crate::AppState;

/// Run a health check on an uploaded plant photo (multipart form)
///
/// Fields: `plantName`, `photo` (file), optional `reportId`.
pub async fn create_health_check(
    State(state): State<AppState>,
    current_user: CurrentUser,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<HealthCheckRecord>)> {
    let upload = read_upload(multipart).await?;
    let service = PlantHealthService::new(state.db, state.analyzer);
    let record = service
        .run_check(
            current_user.0.user_id,
            upload,
            state.config.uploads.max_photo_bytes,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn read_upload(mut multipart: Multipart) -> AppResult<HealthCheckUpload> {
    let mut upload = HealthCheckUpload::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("form", e))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "plantName" => {
                upload.plant_name = field
                    .text()
                    .await
                    .map_err(|e| multipart_error("plantName", e))?;
            }
            "reportId" => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| multipart_error("reportId", e))?;
                let raw = raw.trim();
                if !raw.is_empty() {
                    upload.report_id = Some(
                        Uuid::parse_str(raw)
                            .map_err(|_| AppError::validation("reportId", "Invalid report ID"))?,
                    );
                }
            }
            "photo" => {
                upload.file_name = field.file_name().unwrap_or_default().to_string();
                upload.content_type = field.content_type().map(str::to_string);
                upload.bytes = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error("photo", e))?
                    .to_vec();
            }
            other => {
                tracing::debug!("Ignoring unexpected multipart field '{}'", other);
            }
        }
    }

    Ok(upload)
}

fn multipart_error(field: &str, e: MultipartError) -> AppError {
    upload_error(field, e.status(), e.body_text())
}

/// Only a body over the size limit is a 413; a truncated or malformed stream is a bad request
fn upload_error(field: &str, status: StatusCode, message: String) -> AppError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(message)
    } else {
        AppError::validation(field, format!("Invalid multipart body: {}", message))
    }
}

/// Query parameters for listing health checks
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckQuery {
    pub report_id: Option<Uuid>,
}

/// List the user's health checks
pub async fn list_health_checks(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<HealthCheckQuery>,
) -> AppResult<Json<Vec<HealthCheckRecord>>> {
    let service = PlantHealthService::new(state.db, state.analyzer);
    let checks = service
        .list_checks(current_user.0.user_id, query.report_id)
        .await?;
    Ok(Json(checks))
}
