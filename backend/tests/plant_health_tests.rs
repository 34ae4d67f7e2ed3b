//! Plant health check integration tests
//!
//! Tests for the file name heuristic including:
//! - Keyword groups and their priority order
//! - Canonical issues and actions per status
//! - Follow-up task selection for unhealthy results

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use shared::{
    analyze_health_stub, follow_up_task, CareTaskType, FileNameHeuristic, HealthAnalyzer,
    HealthStatus, FOLLOW_UP_DELAY_HOURS,
};

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_listed_file_names() {
        let cases = [
            ("leaf_dry.jpg", HealthStatus::WaterStress),
            ("wilting_rose.png", HealthStatus::WaterStress),
            ("yellow_leaves.jpg", HealthStatus::NutrientDeficiency),
            ("pale.jpeg", HealthStatus::NutrientDeficiency),
            ("black_spot.jpg", HealthStatus::DiseaseIndicators),
            ("fungus_01.png", HealthStatus::DiseaseIndicators),
            ("bug.jpg", HealthStatus::PestDamage),
            ("pest-closeup.webp", HealthStatus::PestDamage),
            ("soggy.jpg", HealthStatus::Overwatering),
            ("overwatered_fern.jpg", HealthStatus::Overwatering),
            ("IMG_2041.JPG", HealthStatus::Healthy),
        ];

        for (name, expected) in cases {
            assert_eq!(analyze_health_stub(name).status, expected, "{}", name);
        }
    }

    /// Earlier keyword groups win over later ones
    #[test]
    fn test_priority_order() {
        assert_eq!(analyze_health_stub("soggy_dry.jpg").status, HealthStatus::WaterStress);
        assert_eq!(analyze_health_stub("bug_yellow.jpg").status, HealthStatus::NutrientDeficiency);
        assert_eq!(analyze_health_stub("pest_spot.jpg").status, HealthStatus::DiseaseIndicators);
        assert_eq!(analyze_health_stub("over_bug.jpg").status, HealthStatus::PestDamage);
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        assert_eq!(analyze_health_stub("DRY_LEAF.JPG").status, HealthStatus::WaterStress);
        assert_eq!(analyze_health_stub("Fungus.PNG").status, HealthStatus::DiseaseIndicators);
    }

    #[test]
    fn test_result_details() {
        let result = analyze_health_stub("soggy_roots.jpg");
        assert_eq!(result.issues, vec!["Soft stems", "Mushy soil"]);
        assert_eq!(result.actions, vec!["Reduce watering frequency", "Improve drainage"]);
    }

    #[test]
    fn test_follow_up_for_unhealthy_result() {
        let now = Utc.with_ymd_and_hms(2024, 5, 2, 10, 0, 0).unwrap();

        let task = follow_up_task(&analyze_health_stub("dry.jpg"), "Fig", now).unwrap();
        assert_eq!(task.task_type, CareTaskType::Watering);
        assert_eq!(task.due_at, now + Duration::hours(24));

        let task = follow_up_task(&analyze_health_stub("soggy.jpg"), "Fig", now).unwrap();
        assert_eq!(task.task_type, CareTaskType::SeasonalCare);

        assert!(follow_up_task(&analyze_health_stub("fine.jpg"), "Fig", now).is_none());
    }

    #[test]
    fn test_analyzer_trait_object() {
        let analyzer: Box<dyn HealthAnalyzer> = Box::new(FileNameHeuristic);
        assert_eq!(
            analyzer.analyze("pest.jpg", &[]).status,
            HealthStatus::PestDamage
        );
    }
}

// ============================================================================
// Property Tests
// ============================================================================

/// Reference priority table mirrored from the heuristic's documented order
fn expected_status(name: &str) -> HealthStatus {
    let name = name.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| name.contains(w));
    if has(&["dry", "wilt"]) {
        HealthStatus::WaterStress
    } else if has(&["yellow", "pale"]) {
        HealthStatus::NutrientDeficiency
    } else if has(&["spot", "fungus"]) {
        HealthStatus::DiseaseIndicators
    } else if has(&["bug", "pest"]) {
        HealthStatus::PestDamage
    } else if has(&["soggy", "over"]) {
        HealthStatus::Overwatering
    } else {
        HealthStatus::Healthy
    }
}

proptest! {
    /// Any file name yields exactly the first matching status with issues and actions
    #[test]
    fn prop_status_follows_priority(name in "[a-zA-Z_.-]{0,24}") {
        let result = analyze_health_stub(&name);
        prop_assert_eq!(result.status, expected_status(&name));
        prop_assert!(!result.issues.is_empty());
        prop_assert!(!result.actions.is_empty());
    }

    /// A water stress keyword anywhere in the name overrides every other group
    #[test]
    fn prop_dry_always_wins(prefix in "[a-z_]{0,10}", suffix in "[a-z_]{0,10}") {
        let name = format!("{}dry{}.jpg", prefix, suffix);
        prop_assert_eq!(analyze_health_stub(&name).status, HealthStatus::WaterStress);
    }

    /// Exactly the unhealthy results produce a follow-up, due a day later
    #[test]
    fn prop_follow_up_only_when_unhealthy(name in "[a-z_]{0,24}", hours in 0i64..10_000) {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::hours(hours);
        let result = analyze_health_stub(&name);
        match follow_up_task(&result, "Olive", now) {
            Some(task) => {
                prop_assert!(!result.status.is_healthy());
                prop_assert_eq!(task.due_at, now + Duration::hours(FOLLOW_UP_DELAY_HOURS));
            }
            None => prop_assert!(result.status.is_healthy()),
        }
    }
}
