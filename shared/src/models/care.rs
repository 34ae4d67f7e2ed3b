//! Plant care schedule models and generator

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::climate::{detect_climate, ClimateZone, Season};
use crate::types::ParseEnumError;

/// Number of watering tasks emitted per schedule
pub const WATERING_TASK_COUNT: i64 = 6;
/// Tasks emitted per schedule: watering + fertilizing + pruning + seasonal care
pub const SCHEDULE_TASK_COUNT: usize = WATERING_TASK_COUNT as usize + 3;

/// Minimum number of days between two waterings
pub const MIN_WATERING_INTERVAL_DAYS: i64 = 2;

const FERTILIZING_OFFSET_DAYS: i64 = 21;
const WINTER_PRUNING_OFFSET_DAYS: i64 = 14;
const PRUNING_OFFSET_DAYS: i64 = 60;
const SEASONAL_CARE_OFFSET_DAYS: i64 = 45;

/// Latest day offset any task of a schedule can land on
pub const SCHEDULE_HORIZON_DAYS: i64 = PRUNING_OFFSET_DAYS;

/// Kind of plant being scheduled
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlantType {
    Tree,
    Plant,
}

impl PlantType {
    /// Base watering interval before climate and season adjustments
    pub fn base_watering_interval_days(&self) -> i64 {
        match self {
            PlantType::Tree => 7,
            PlantType::Plant => 3,
        }
    }
}

impl std::fmt::Display for PlantType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlantType::Tree => write!(f, "Tree"),
            PlantType::Plant => write!(f, "Plant"),
        }
    }
}

/// Care task category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CareTaskType {
    Watering,
    Fertilizing,
    Pruning,
    SeasonalCare,
}

impl CareTaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CareTaskType::Watering => "watering",
            CareTaskType::Fertilizing => "fertilizing",
            CareTaskType::Pruning => "pruning",
            CareTaskType::SeasonalCare => "seasonal_care",
        }
    }
}

impl std::str::FromStr for CareTaskType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "watering" => Ok(CareTaskType::Watering),
            "fertilizing" => Ok(CareTaskType::Fertilizing),
            "pruning" => Ok(CareTaskType::Pruning),
            "seasonal_care" => Ok(CareTaskType::SeasonalCare),
            other => Err(ParseEnumError::new("care task type", other)),
        }
    }
}

/// Completion state of a care task
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CareTaskStatus {
    #[default]
    NotDone,
    Done,
}

impl CareTaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CareTaskStatus::NotDone => "not_done",
            CareTaskStatus::Done => "done",
        }
    }
}

impl std::str::FromStr for CareTaskStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_done" => Ok(CareTaskStatus::NotDone),
            "done" => Ok(CareTaskStatus::Done),
            other => Err(ParseEnumError::new("care task status", other)),
        }
    }
}

/// A generated care task, not yet persisted
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CareTask {
    pub task_type: CareTaskType,
    pub due_at: DateTime<Utc>,
    pub description: String,
    pub tips: String,
    pub status: CareTaskStatus,
}

/// Input for generating a care schedule
#[derive(Debug, Clone)]
pub struct CareScheduleInput {
    pub plant_name: String,
    pub plant_type: PlantType,
    pub latitude: Option<f64>,
    /// Accepted for future regional rules; not used by the current ones
    pub longitude: Option<f64>,
    pub start_date: Option<DateTime<Utc>>,
}

/// The derived conditions a schedule was built from
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ScheduleContext {
    pub now: DateTime<Utc>,
    pub climate: ClimateZone,
    pub season: Season,
    pub watering_interval_days: i64,
}

impl ScheduleContext {
    pub fn resolve(input: &CareScheduleInput) -> Self {
        let now = input.start_date.unwrap_or_else(Utc::now);
        let climate = detect_climate(input.latitude);
        let season = Season::of(&now);
        let watering_interval_days =
            watering_interval_days(input.plant_type, climate, season);

        Self {
            now,
            climate,
            season,
            watering_interval_days,
        }
    }

    /// Pruning is brought forward only in winter
    fn pruning_offset_days(&self) -> i64 {
        // Only winter qualifies; an "early spring" season is never produced.
        if self.season == Season::Winter {
            WINTER_PRUNING_OFFSET_DAYS
        } else {
            PRUNING_OFFSET_DAYS
        }
    }
}

/// Days between waterings, floored at [`MIN_WATERING_INTERVAL_DAYS`]
pub fn watering_interval_days(plant_type: PlantType, climate: ClimateZone, season: Season) -> i64 {
    let interval = plant_type.base_watering_interval_days()
        + climate.watering_adjustment_days()
        + season.watering_adjustment_days();
    interval.max(MIN_WATERING_INTERVAL_DAYS)
}

/// Build the fixed nine-task care schedule for a plant.
///
/// Emission order is six waterings, then fertilizing, pruning and seasonal care.
pub fn build_care_schedule(input: &CareScheduleInput) -> Vec<CareTask> {
    let ctx = ScheduleContext::resolve(input);
    build_care_schedule_with(input, &ctx)
}

/// Build a schedule from an already resolved context
pub fn build_care_schedule_with(input: &CareScheduleInput, ctx: &ScheduleContext) -> Vec<CareTask> {
    let plant = input.plant_name.trim();
    // Saturate instead of overflowing for start dates at the edge of the calendar.
    let due = |days: i64| {
        ctx.now
            .checked_add_signed(Duration::days(days))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    };
    let mut tasks = Vec::with_capacity(SCHEDULE_TASK_COUNT);

    for i in 0..WATERING_TASK_COUNT {
        tasks.push(CareTask {
            task_type: CareTaskType::Watering,
            due_at: due(ctx.watering_interval_days * i + 1),
            description: format!("Water {} thoroughly at the root zone", plant),
            tips: format!(
                "Climate: {}, season: {}. Water early morning or late evening; repeat every {} days.",
                ctx.climate, ctx.season, ctx.watering_interval_days
            ),
            status: CareTaskStatus::NotDone,
        });
    }

    tasks.push(CareTask {
        task_type: CareTaskType::Fertilizing,
        due_at: due(FERTILIZING_OFFSET_DAYS),
        description: format!("Feed {} with a balanced fertilizer", plant),
        tips: "Use a slow-release or organic compost; avoid feeding during heat waves."
            .to_string(),
        status: CareTaskStatus::NotDone,
    });

    tasks.push(CareTask {
        task_type: CareTaskType::Pruning,
        due_at: due(ctx.pruning_offset_days()),
        description: format!("Prune dead or crossing branches on {}", plant),
        tips: "Use clean, sharp tools and never remove more than a quarter of the canopy."
            .to_string(),
        status: CareTaskStatus::NotDone,
    });

    tasks.push(CareTask {
        task_type: CareTaskType::SeasonalCare,
        due_at: due(SEASONAL_CARE_OFFSET_DAYS),
        description: format!("Seasonal check-up for {}", plant),
        tips: format!(
            "Refresh mulch, inspect for pests and adjust watering for the coming {} conditions.",
            ctx.climate
        ),
        status: CareTaskStatus::NotDone,
    });

    tasks
}
