//! Plant health check models

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::care::{CareTask, CareTaskStatus, CareTaskType};
use crate::types::ParseEnumError;

/// Overall health verdict for a plant photo
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum HealthStatus {
    Healthy,
    #[serde(rename = "Water stress")]
    WaterStress,
    Overwatering,
    #[serde(rename = "Nutrient deficiency")]
    NutrientDeficiency,
    #[serde(rename = "Pest damage")]
    PestDamage,
    #[serde(rename = "Disease indicators")]
    DiseaseIndicators,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "Healthy",
            HealthStatus::WaterStress => "Water stress",
            HealthStatus::Overwatering => "Overwatering",
            HealthStatus::NutrientDeficiency => "Nutrient deficiency",
            HealthStatus::PestDamage => "Pest damage",
            HealthStatus::DiseaseIndicators => "Disease indicators",
        }
    }

    pub fn is_healthy(&self) -> bool {
        *self == HealthStatus::Healthy
    }

    /// Task type to enqueue after an unhealthy check, if any
    pub fn follow_up_task_type(&self) -> Option<CareTaskType> {
        match self {
            HealthStatus::Healthy => None,
            HealthStatus::Overwatering => Some(CareTaskType::SeasonalCare),
            _ => Some(CareTaskType::Watering),
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for HealthStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Healthy" => Ok(HealthStatus::Healthy),
            "Water stress" => Ok(HealthStatus::WaterStress),
            "Overwatering" => Ok(HealthStatus::Overwatering),
            "Nutrient deficiency" => Ok(HealthStatus::NutrientDeficiency),
            "Pest damage" => Ok(HealthStatus::PestDamage),
            "Disease indicators" => Ok(HealthStatus::DiseaseIndicators),
            other => Err(ParseEnumError::new("health status", other)),
        }
    }
}

/// Result of a plant health analysis
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResult {
    pub status: HealthStatus,
    pub issues: Vec<String>,
    pub actions: Vec<String>,
}

impl HealthResult {
    fn new(status: HealthStatus, issues: &[&str], actions: &[&str]) -> Self {
        Self {
            status,
            issues: issues.iter().map(|s| s.to_string()).collect(),
            actions: actions.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Anything that can turn an uploaded photo into a health verdict
pub trait HealthAnalyzer: Send + Sync {
    fn analyze(&self, file_name: &str, bytes: &[u8]) -> HealthResult;
}

/// Keyword rules on the uploaded file name; photo bytes are ignored
#[derive(Debug, Clone, Copy, Default)]
pub struct FileNameHeuristic;

impl HealthAnalyzer for FileNameHeuristic {
    fn analyze(&self, file_name: &str, _bytes: &[u8]) -> HealthResult {
        analyze_health_stub(file_name)
    }
}

/// Keyword groups in priority order; the first group with a hit wins
const RULES: &[(&[&str], HealthStatus)] = &[
    (&["dry", "wilt"], HealthStatus::WaterStress),
    (&["yellow", "pale"], HealthStatus::NutrientDeficiency),
    (&["spot", "fungus"], HealthStatus::DiseaseIndicators),
    (&["bug", "pest"], HealthStatus::PestDamage),
    (&["soggy", "over"], HealthStatus::Overwatering),
];

/// Classify a plant photo by keywords in its file name
pub fn analyze_health_stub(file_name: &str) -> HealthResult {
    let name = file_name.to_lowercase();
    let status = RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| name.contains(k)))
        .map(|(_, status)| *status)
        .unwrap_or(HealthStatus::Healthy);

    result_for(status)
}

/// Canonical issues and actions for a status
pub fn result_for(status: HealthStatus) -> HealthResult {
    match status {
        HealthStatus::WaterStress => HealthResult::new(
            status,
            &["Wilting leaves", "Dry soil surface"],
            &["Deep water early morning", "Add mulch to retain moisture"],
        ),
        HealthStatus::NutrientDeficiency => HealthResult::new(
            status,
            &["Yellowing leaves", "Slow growth"],
            &["Apply balanced fertilizer", "Check soil pH"],
        ),
        HealthStatus::DiseaseIndicators => HealthResult::new(
            status,
            &["Leaf spots", "Discoloration"],
            &["Remove infected leaves", "Improve airflow around the plant"],
        ),
        HealthStatus::PestDamage => HealthResult::new(
            status,
            &["Chewed leaf edges", "Visible insects"],
            &["Inspect leaf undersides", "Use mild insecticidal soap"],
        ),
        HealthStatus::Overwatering => HealthResult::new(
            status,
            &["Soft stems", "Mushy soil"],
            &["Reduce watering frequency", "Improve drainage"],
        ),
        HealthStatus::Healthy => HealthResult::new(
            status,
            &["No visible stress signals detected"],
            &["Maintain the current schedule", "Monitor weekly"],
        ),
    }
}

/// Hours after an unhealthy check before the follow-up task is due
pub const FOLLOW_UP_DELAY_HOURS: i64 = 24;

/// Follow-up care task for an unhealthy result; `None` when the plant is healthy
pub fn follow_up_task(
    result: &HealthResult,
    plant_name: &str,
    now: DateTime<Utc>,
) -> Option<CareTask> {
    let task_type = result.status.follow_up_task_type()?;
    Some(CareTask {
        task_type,
        due_at: now + Duration::hours(FOLLOW_UP_DELAY_HOURS),
        description: format!(
            "Follow up on {} for {}",
            result.status.as_str().to_lowercase(),
            plant_name.trim()
        ),
        tips: result.actions.join(". "),
        status: CareTaskStatus::NotDone,
    })
}
