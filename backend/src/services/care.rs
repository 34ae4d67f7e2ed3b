//! Care task service: schedule generation and task tracking

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::{
    build_care_schedule_with, validate_latitude, validate_longitude, validate_plant_name,
    CareScheduleInput, CareTask, CareTaskStatus, CareTaskType, ClimateZone, DateRange, PlantType,
    ScheduleContext, Season,
};

/// Care service for generating and tracking care tasks
#[derive(Clone)]
pub struct CareService {
    db: PgPool,
}

/// Database row for a care task
#[derive(Debug, sqlx::FromRow)]
struct CareTaskRow {
    id: Uuid,
    user_id: Uuid,
    report_id: Option<Uuid>,
    plant_name: String,
    task_type: String,
    due_at: DateTime<Utc>,
    description: String,
    tips: String,
    status: String,
    completed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CareTaskRow> for CareTaskRecord {
    type Error = AppError;

    fn try_from(row: CareTaskRow) -> Result<Self, Self::Error> {
        Ok(CareTaskRecord {
            id: row.id,
            user_id: row.user_id,
            report_id: row.report_id,
            plant_name: row.plant_name,
            task_type: row
                .task_type
                .parse()
                .map_err(|e| AppError::Internal(format!("Corrupt care task row: {}", e)))?,
            due_at: row.due_at,
            description: row.description,
            tips: row.tips,
            status: row
                .status
                .parse()
                .map_err(|e| AppError::Internal(format!("Corrupt care task row: {}", e)))?,
            completed_at: row.completed_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const TASK_COLUMNS: &str = "id, user_id, report_id, plant_name, task_type, due_at, description, \
     tips, status, completed_at, created_at, updated_at";

/// Persisted care task
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CareTaskRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub report_id: Option<Uuid>,
    pub plant_name: String,
    pub task_type: CareTaskType,
    pub due_at: DateTime<Utc>,
    pub description: String,
    pub tips: String,
    pub status: CareTaskStatus,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for generating a care schedule
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateScheduleInput {
    pub plant_name: String,
    pub plant_type: PlantType,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub report_id: Option<Uuid>,
}

/// Summary of a generated schedule
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSummary {
    pub created: usize,
    pub climate: ClimateZone,
    pub season: Season,
    pub watering_interval_days: i64,
}

/// Filters for listing care tasks
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareTaskFilter {
    pub status: Option<CareTaskStatus>,
    pub due_from: Option<DateTime<Utc>>,
    pub due_to: Option<DateTime<Utc>>,
    pub report_id: Option<Uuid>,
}

/// Input for updating a task's completion state
#[derive(Debug, Deserialize)]
pub struct UpdateTaskStatusInput {
    pub status: CareTaskStatus,
}

/// Completion timestamp implied by a status change
pub fn completed_at_for(status: CareTaskStatus, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match status {
        CareTaskStatus::Done => Some(now),
        CareTaskStatus::NotDone => None,
    }
}

impl GenerateScheduleInput {
    fn validate(&self) -> AppResult<()> {
        validate_plant_name(&self.plant_name).map_err(|m| AppError::validation("plantName", m))?;
        if let Some(lat) = self.latitude {
            validate_latitude(lat).map_err(|m| AppError::validation("latitude", m))?;
        }
        if let Some(lon) = self.longitude {
            validate_longitude(lon).map_err(|m| AppError::validation("longitude", m))?;
        }
        Ok(())
    }

    fn to_schedule_input(&self, start_date: DateTime<Utc>) -> CareScheduleInput {
        CareScheduleInput {
            plant_name: self.plant_name.trim().to_string(),
            plant_type: self.plant_type,
            latitude: self.latitude,
            longitude: self.longitude,
            start_date: Some(start_date),
        }
    }
}

impl CareService {
    /// Create a new CareService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Generate the nine-task schedule for a plant and persist it
    pub async fn generate_schedule(
        &self,
        user_id: Uuid,
        input: GenerateScheduleInput,
    ) -> AppResult<ScheduleSummary> {
        input.validate()?;

        let schedule_input = input.to_schedule_input(Utc::now());
        let ctx = ScheduleContext::resolve(&schedule_input);
        let tasks = build_care_schedule_with(&schedule_input, &ctx);

        let mut tx = self.db.begin().await?;
        for task in &tasks {
            insert_task(
                &mut tx,
                user_id,
                input.report_id,
                &schedule_input.plant_name,
                task,
            )
            .await?;
        }
        tx.commit().await?;

        tracing::info!(
            %user_id,
            plant = %schedule_input.plant_name,
            climate = %ctx.climate,
            season = %ctx.season,
            interval_days = ctx.watering_interval_days,
            "Care schedule created"
        );

        Ok(ScheduleSummary {
            created: tasks.len(),
            climate: ctx.climate,
            season: ctx.season,
            watering_interval_days: ctx.watering_interval_days,
        })
    }

    /// List a user's tasks ordered by due date
    pub async fn list_tasks(
        &self,
        user_id: Uuid,
        filter: CareTaskFilter,
    ) -> AppResult<Vec<CareTaskRecord>> {
        if let (Some(from), Some(to)) = (filter.due_from, filter.due_to) {
            if from > to {
                return Err(AppError::validation("dueFrom", "dueFrom must not be after dueTo"));
            }
        }

        let sql = format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM care_tasks
            WHERE user_id = $1
              AND ($2::text IS NULL OR status = $2)
              AND ($3::timestamptz IS NULL OR due_at >= $3)
              AND ($4::timestamptz IS NULL OR due_at < $4)
              AND ($5::uuid IS NULL OR report_id = $5)
            ORDER BY due_at ASC
            "#
        );

        let rows = sqlx::query_as::<_, CareTaskRow>(&sql)
            .bind(user_id)
            .bind(filter.status.map(|s| s.as_str()))
            .bind(filter.due_from)
            .bind(filter.due_to)
            .bind(filter.report_id)
            .fetch_all(&self.db)
            .await?;

        rows.into_iter().map(CareTaskRecord::try_from).collect()
    }

    /// Open tasks due before the end of the current UTC day, overdue ones included
    pub async fn todays_tasks(&self, user_id: Uuid) -> AppResult<Vec<CareTaskRecord>> {
        let today = DateRange::day_of(Utc::now());
        self.list_tasks(
            user_id,
            CareTaskFilter {
                status: Some(CareTaskStatus::NotDone),
                due_to: Some(today.end),
                ..Default::default()
            },
        )
        .await
    }

    /// Mark a task done or not done
    pub async fn update_status(
        &self,
        user_id: Uuid,
        task_id: Uuid,
        status: CareTaskStatus,
    ) -> AppResult<CareTaskRecord> {
        let now = Utc::now();
        let sql = format!(
            r#"
            UPDATE care_tasks
            SET status = $3, completed_at = $4, updated_at = $5
            WHERE id = $1 AND user_id = $2
            RETURNING {TASK_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, CareTaskRow>(&sql)
            .bind(task_id)
            .bind(user_id)
            .bind(status.as_str())
            .bind(completed_at_for(status, now))
            .bind(now)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Care task".to_string()))?;

        tracing::debug!(%task_id, status = status.as_str(), "Care task updated");

        row.try_into()
    }
}

/// Insert one task inside the caller's transaction
pub(crate) async fn insert_task(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    report_id: Option<Uuid>,
    plant_name: &str,
    task: &CareTask,
) -> AppResult<CareTaskRecord> {
    let sql = format!(
        r#"
        INSERT INTO care_tasks (
            user_id, report_id, plant_name, task_type, due_at, description, tips, status
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {TASK_COLUMNS}
        "#
    );

    let row = sqlx::query_as::<_, CareTaskRow>(&sql)
        .bind(user_id)
        .bind(report_id)
        .bind(plant_name)
        .bind(task.task_type.as_str())
        .bind(task.due_at)
        .bind(&task.description)
        .bind(&task.tips)
        .bind(task.status.as_str())
        .fetch_one(&mut **tx)
        .await?;

    row.try_into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completed_at_for() {
        let now = Utc::now();
        assert_eq!(completed_at_for(CareTaskStatus::Done, now), Some(now));
        assert_eq!(completed_at_for(CareTaskStatus::NotDone, now), None);
    }

    #[test]
    fn test_generate_input_uses_wire_names() {
        let input: GenerateScheduleInput = serde_json::from_str(
            r#"{"plantName":"Carob","plantType":"Tree","latitude":36.8,"longitude":10.1}"#,
        )
        .unwrap();
        assert_eq!(input.plant_type, PlantType::Tree);
        assert!(input.validate().is_ok());
        assert!(input.report_id.is_none());
    }

    #[test]
    fn test_generate_input_rejects_blank_name_and_bad_latitude() {
        let blank = GenerateScheduleInput {
            plant_name: "  ".to_string(),
            plant_type: PlantType::Plant,
            latitude: None,
            longitude: None,
            report_id: None,
        };
        assert!(matches!(
            blank.validate(),
            Err(AppError::Validation { ref field, .. }) if field == "plantName"
        ));

        let bad_lat = GenerateScheduleInput {
            plant_name: "Mint".to_string(),
            plant_type: PlantType::Plant,
            latitude: Some(120.0),
            longitude: None,
            report_id: None,
        };
        assert!(matches!(
            bad_lat.validate(),
            Err(AppError::Validation { ref field, .. }) if field == "latitude"
        ));
    }

    #[test]
    fn test_filter_parses_status() {
        let filter: CareTaskFilter = serde_json::from_str(r#"{"status":"done"}"#).unwrap();
        assert_eq!(filter.status, Some(CareTaskStatus::Done));
    }
}
