//! Plant health check service

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::care::insert_task;
use shared::{
    follow_up_task, validate_photo_content_type, validate_photo_size, validate_plant_name,
    HealthAnalyzer, HealthResult, HealthStatus,
};

/// Plant health service: analyse a photo, record the result, schedule a follow-up
#[derive(Clone)]
pub struct PlantHealthService {
    db: PgPool,
    analyzer: Arc<dyn HealthAnalyzer>,
}

/// Database row for a health check
#[derive(Debug, sqlx::FromRow)]
struct HealthCheckRow {
    id: Uuid,
    user_id: Uuid,
    report_id: Option<Uuid>,
    plant_name: String,
    file_name: String,
    content_type: String,
    file_size_bytes: i64,
    status: String,
    issues: serde_json::Value,
    actions: serde_json::Value,
    follow_up_task_id: Option<Uuid>,
    checked_at: DateTime<Utc>,
}

impl TryFrom<HealthCheckRow> for HealthCheckRecord {
    type Error = AppError;

    fn try_from(row: HealthCheckRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let status: HealthStatus = row.status.parse().map_err(|e| corrupt_row(id, e))?;
        let issues: Vec<String> =
            serde_json::from_value(row.issues).map_err(|e| corrupt_row(id, e))?;
        let actions: Vec<String> =
            serde_json::from_value(row.actions).map_err(|e| corrupt_row(id, e))?;

        Ok(HealthCheckRecord {
            id: row.id,
            user_id: row.user_id,
            report_id: row.report_id,
            plant_name: row.plant_name,
            file_name: row.file_name,
            content_type: row.content_type,
            file_size_bytes: row.file_size_bytes,
            result: HealthResult {
                status,
                issues,
                actions,
            },
            follow_up_task_id: row.follow_up_task_id,
            checked_at: row.checked_at,
        })
    }
}

fn corrupt_row(id: Uuid, e: impl std::fmt::Display) -> AppError {
    AppError::Internal(format!("Corrupt health check row {}: {}", id, e))
}

const CHECK_COLUMNS: &str = "id, user_id, report_id, plant_name, file_name, content_type, \
     file_size_bytes, status, issues, actions, follow_up_task_id, checked_at";

/// Persisted health check
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub report_id: Option<Uuid>,
    pub plant_name: String,
    pub file_name: String,
    pub content_type: String,
    pub file_size_bytes: i64,
    #[serde(flatten)]
    pub result: HealthResult,
    pub follow_up_task_id: Option<Uuid>,
    pub checked_at: DateTime<Utc>,
}

/// An uploaded photo with its form metadata
#[derive(Debug, Default)]
pub struct HealthCheckUpload {
    pub plant_name: String,
    pub report_id: Option<Uuid>,
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl HealthCheckUpload {
    /// Validate the upload before analysis
    pub fn validate(&self, max_photo_bytes: usize) -> AppResult<()> {
        validate_plant_name(&self.plant_name).map_err(|m| AppError::validation("plantName", m))?;
        if self.bytes.is_empty() && self.file_name.is_empty() {
            return Err(AppError::validation("photo", "Photo is required"));
        }
        validate_photo_content_type(self.content_type.as_deref())
            .map_err(|m| AppError::UnsupportedMediaType(m.to_string()))?;
        validate_photo_size(self.bytes.len(), max_photo_bytes).map_err(|m| {
            if self.bytes.is_empty() {
                AppError::validation("photo", m)
            } else {
                AppError::PayloadTooLarge(m.to_string())
            }
        })?;
        Ok(())
    }
}

impl PlantHealthService {
    pub fn new(db: PgPool, analyzer: Arc<dyn HealthAnalyzer>) -> Self {
        Self { db, analyzer }
    }

    /// Analyse an uploaded photo and record the outcome
    pub async fn run_check(
        &self,
        user_id: Uuid,
        upload: HealthCheckUpload,
        max_photo_bytes: usize,
    ) -> AppResult<HealthCheckRecord> {
        upload.validate(max_photo_bytes)?;

        let result = self.analyzer.analyze(&upload.file_name, &upload.bytes);
        let now = Utc::now();
        let plant_name = upload.plant_name.trim();

        // The follow-up and the check commit together so a failed insert leaves no orphan task.
        let mut tx = self.db.begin().await?;

        let follow_up_task_id = match follow_up_task(&result, plant_name, now) {
            Some(task) => {
                let record =
                    insert_task(&mut tx, user_id, upload.report_id, plant_name, &task).await?;
                Some(record.id)
            }
            None => None,
        };

        let sql = format!(
            r#"
            INSERT INTO plant_health_checks (
                user_id, report_id, plant_name, file_name, content_type, file_size_bytes,
                status, issues, actions, follow_up_task_id, checked_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {CHECK_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, HealthCheckRow>(&sql)
            .bind(user_id)
            .bind(upload.report_id)
            .bind(plant_name)
            .bind(&upload.file_name)
            .bind(upload.content_type.as_deref().unwrap_or_default())
            .bind(upload.bytes.len() as i64)
            .bind(result.status.as_str())
            .bind(serde_json::json!(result.issues))
            .bind(serde_json::json!(result.actions))
            .bind(follow_up_task_id)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;
        let record = HealthCheckRecord::try_from(row)?;

        tx.commit().await?;

        tracing::info!(
            %user_id,
            plant = plant_name,
            status = result.status.as_str(),
            follow_up = follow_up_task_id.is_some(),
            "Plant health check recorded"
        );

        Ok(record)
    }

    /// List a user's health checks, newest first
    pub async fn list_checks(
        &self,
        user_id: Uuid,
        report_id: Option<Uuid>,
    ) -> AppResult<Vec<HealthCheckRecord>> {
        let sql = format!(
            r#"
            SELECT {CHECK_COLUMNS}
            FROM plant_health_checks
            WHERE user_id = $1 AND ($2::uuid IS NULL OR report_id = $2)
            ORDER BY checked_at DESC
            "#
        );

        let rows = sqlx::query_as::<_, HealthCheckRow>(&sql)
            .bind(user_id)
            .bind(report_id)
            .fetch_all(&self.db)
            .await?;

        rows.into_iter().map(HealthCheckRecord::try_from).collect()
    }
}
