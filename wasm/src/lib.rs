//! WebAssembly module for the GreenSpot plant care platform
//!
//! Provides client-side computation for:
//! - Climate zone lookup
//! - Care schedule previews before saving
//! - Photo name pre-checks
//! - Assistant prompt scoping

use chrono::{DateTime, Utc};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages in browser console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Climate zone for a latitude; pass `NaN` when the location is unknown
#[wasm_bindgen]
pub fn detect_climate_zone(latitude: f64) -> String {
    let latitude = if latitude.is_nan() { None } else { Some(latitude) };
    detect_climate(latitude).as_str().to_string()
}

/// Days between waterings for a plant type ("Tree" or "Plant"), latitude and month
#[wasm_bindgen]
pub fn watering_interval(plant_type: &str, latitude: f64, month: u32) -> Result<i32, JsValue> {
    let plant_type = parse_plant_type(plant_type)?;
    if !(1..=12).contains(&month) {
        return Err(JsValue::from_str("Month must be between 1 and 12"));
    }
    let latitude = if latitude.is_nan() { None } else { Some(latitude) };
    let interval =
        watering_interval_days(plant_type, detect_climate(latitude), Season::from_month(month));
    Ok(interval as i32)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SchedulePreviewRequest {
    plant_name: String,
    plant_type: PlantType,
    latitude: Option<f64>,
    longitude: Option<f64>,
    start_date: Option<DateTime<Utc>>,
}

/// Preview the nine care tasks the server would create, as a JSON array
#[wasm_bindgen]
pub fn preview_care_schedule(request_json: &str) -> Result<String, JsValue> {
    let request: SchedulePreviewRequest = serde_json::from_str(request_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid schedule JSON: {}", e)))?;

    validate_plant_name(&request.plant_name).map_err(JsValue::from_str)?;
    if let Some(lat) = request.latitude {
        validate_latitude(lat).map_err(JsValue::from_str)?;
    }
    if let Some(lon) = request.longitude {
        validate_longitude(lon).map_err(JsValue::from_str)?;
    }
    if let Some(start) = request.start_date {
        validate_start_date(start).map_err(JsValue::from_str)?;
    }

    let tasks = build_care_schedule(&CareScheduleInput {
        plant_name: request.plant_name,
        plant_type: request.plant_type,
        latitude: request.latitude,
        longitude: request.longitude,
        start_date: request.start_date,
    });

    serde_json::to_string(&tasks).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Run the file name health heuristic locally, returning the result as JSON
#[wasm_bindgen]
pub fn analyze_plant_photo_name(file_name: &str) -> Result<String, JsValue> {
    serde_json::to_string(&analyze_health_stub(file_name))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Whether the assistant will accept a prompt as garden related
#[wasm_bindgen]
pub fn is_garden_prompt(prompt: &str) -> bool {
    is_in_scope_prompt(prompt)
}

/// Check a plant name before submitting a form
#[wasm_bindgen]
pub fn is_valid_plant_name(name: &str) -> bool {
    validate_plant_name(name).is_ok()
}

fn parse_plant_type(value: &str) -> Result<PlantType, JsValue> {
    match value {
        "Tree" => Ok(PlantType::Tree),
        "Plant" => Ok(PlantType::Plant),
        other => Err(JsValue::from_str(&format!("Unknown plant type: {}", other))),
    }
}
