//! Care schedule generator integration tests
//!
//! Tests for schedule generation including:
//! - Fixed nine-task shape and emission order
//! - Watering interval arithmetic per plant type, climate and season
//! - Every due date falls after the start instant

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use shared::{
    build_care_schedule, validate_start_date, watering_interval_days, CareScheduleInput,
    CareTaskStatus, CareTaskType, ClimateZone, PlantType, Season, MIN_WATERING_INTERVAL_DAYS,
    SCHEDULE_TASK_COUNT,
};

fn input(plant_type: PlantType, latitude: Option<f64>, start: DateTime<Utc>) -> CareScheduleInput {
    CareScheduleInput {
        plant_name: "Pomegranate".to_string(),
        plant_type,
        latitude,
        longitude: None,
        start_date: Some(start),
    }
}

fn watering_offsets(tasks: &[shared::CareTask], start: DateTime<Utc>) -> Vec<i64> {
    tasks
        .iter()
        .filter(|t| t.task_type == CareTaskType::Watering)
        .map(|t| (t.due_at - start).num_days())
        .collect()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Tree in the steppe in summer: max(2, 7 + 0 - 2) = 5
    #[test]
    fn test_tree_steppe_summer() {
        let start = Utc.with_ymd_and_hms(2024, 7, 1, 9, 0, 0).unwrap();
        let tasks = build_care_schedule(&input(PlantType::Tree, Some(30.0), start));

        assert_eq!(watering_offsets(&tasks, start), vec![1, 6, 11, 16, 21, 26]);
    }

    /// Plant in the desert in winter: max(2, 3 - 1 + 3) = 5
    #[test]
    fn test_plant_desert_winter() {
        let start = Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap();
        let tasks = build_care_schedule(&input(PlantType::Plant, Some(20.0), start));

        assert_eq!(
            watering_interval_days(PlantType::Plant, ClimateZone::Desert, Season::Winter),
            5
        );
        assert_eq!(watering_offsets(&tasks, start), vec![1, 6, 11, 16, 21, 26]);
    }

    #[test]
    fn test_fixed_offsets() {
        let start = Utc.with_ymd_and_hms(2024, 10, 1, 0, 0, 0).unwrap();
        let tasks = build_care_schedule(&input(PlantType::Tree, None, start));

        assert_eq!(tasks[6].due_at, start + Duration::days(21));
        assert_eq!(tasks[7].due_at, start + Duration::days(60));
        assert_eq!(tasks[8].due_at, start + Duration::days(45));
    }

    #[test]
    fn test_winter_pruning_is_earlier() {
        let start = Utc.with_ymd_and_hms(2024, 12, 5, 0, 0, 0).unwrap();
        let tasks = build_care_schedule(&input(PlantType::Tree, None, start));
        assert_eq!(tasks[7].task_type, CareTaskType::Pruning);
        assert_eq!(tasks[7].due_at, start + Duration::days(14));
    }

    #[test]
    fn test_interval_floor_applies() {
        // 3 - 1 - 2 = 0
        let start = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();
        let tasks = build_care_schedule(&input(PlantType::Plant, Some(10.0), start));
        assert_eq!(watering_offsets(&tasks, start), vec![1, 3, 5, 7, 9, 11]);
    }

    #[test]
    fn test_plant_name_is_trimmed_in_descriptions() {
        let start = Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap();
        let mut request = input(PlantType::Plant, Some(34.0), start);
        request.plant_name = "  Basil  ".to_string();
        let tasks = build_care_schedule(&request);
        assert!(tasks.iter().all(|t| !t.description.contains("  Basil")));
        assert!(tasks[0].description.contains("Basil"));
    }
}

// ============================================================================
// Property Tests
// ============================================================================

fn arb_plant_type() -> impl Strategy<Value = PlantType> {
    prop_oneof![Just(PlantType::Tree), Just(PlantType::Plant)]
}

fn arb_start() -> impl Strategy<Value = DateTime<Utc>> {
    (2020i32..2030, 1u32..=12, 1u32..=28, 0u32..24)
        .prop_map(|(y, m, d, h)| Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap())
}

proptest! {
    /// Nine tasks, in emission order, all pending and all in the future
    #[test]
    fn prop_schedule_shape(
        plant_type in arb_plant_type(),
        latitude in proptest::option::of(-90.0f64..90.0),
        start in arb_start(),
    ) {
        let tasks = build_care_schedule(&input(plant_type, latitude, start));

        prop_assert_eq!(tasks.len(), SCHEDULE_TASK_COUNT);
        let types: Vec<CareTaskType> = tasks.iter().map(|t| t.task_type).collect();
        prop_assert_eq!(&types[..6], &[CareTaskType::Watering; 6][..]);
        prop_assert_eq!(types[6], CareTaskType::Fertilizing);
        prop_assert_eq!(types[7], CareTaskType::Pruning);
        prop_assert_eq!(types[8], CareTaskType::SeasonalCare);
        prop_assert!(tasks.iter().all(|t| t.due_at > start));
        prop_assert!(tasks.iter().all(|t| t.status == CareTaskStatus::NotDone));
    }

    /// Waterings are evenly spaced and strictly increasing
    #[test]
    fn prop_watering_spacing(
        plant_type in arb_plant_type(),
        latitude in proptest::option::of(-90.0f64..90.0),
        start in arb_start(),
    ) {
        let tasks = build_care_schedule(&input(plant_type, latitude, start));
        let offsets = watering_offsets(&tasks, start);
        let interval = watering_interval_days(
            plant_type,
            shared::detect_climate(latitude),
            Season::of(&start),
        );

        prop_assert!(interval >= MIN_WATERING_INTERVAL_DAYS);
        for (i, offset) in offsets.iter().enumerate() {
            prop_assert_eq!(*offset, interval * i as i64 + 1);
        }
    }

    /// Start dates near the end of the calendar never panic and never move a task backwards
    #[test]
    fn prop_late_start_dates_saturate(
        plant_type in arb_plant_type(),
        year in 262000i32..=262142,
        month in 1u32..=12,
        day in 1u32..=28,
    ) {
        let start = Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap();
        let tasks = build_care_schedule(&input(plant_type, Some(30.0), start));

        prop_assert_eq!(tasks.len(), SCHEDULE_TASK_COUNT);
        prop_assert!(tasks.iter().all(|t| t.due_at >= start));
        if validate_start_date(start).is_ok() {
            prop_assert!(tasks.iter().all(|t| t.due_at > start));
        }
    }
}
