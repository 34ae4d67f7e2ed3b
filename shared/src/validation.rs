//! Validation utilities for the GreenSpot platform
//!
//! Request-level checks run by handlers before any calculator is invoked.

use chrono::{DateTime, Duration, Utc};

use crate::models::SCHEDULE_HORIZON_DAYS;

// ============================================================================
// Care Scheduling Validations
// ============================================================================

/// Longest plant name accepted for scheduling and health checks
pub const MAX_PLANT_NAME_LEN: usize = 120;

/// Validate a plant name is present and reasonably short
pub fn validate_plant_name(name: &str) -> Result<(), &'static str> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Plant name is required");
    }
    if name.chars().count() > MAX_PLANT_NAME_LEN {
        return Err("Plant name must be at most 120 characters");
    }
    Ok(())
}

/// Validate latitude is a finite value in [-90, 90]
pub fn validate_latitude(latitude: f64) -> Result<(), &'static str> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err("Latitude must be between -90 and 90");
    }
    Ok(())
}

/// Validate longitude is a finite value in [-180, 180]
pub fn validate_longitude(longitude: f64) -> Result<(), &'static str> {
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err("Longitude must be between -180 and 180");
    }
    Ok(())
}

/// Validate a schedule start date leaves room for every task due date
pub fn validate_start_date(start: DateTime<Utc>) -> Result<(), &'static str> {
    match start.checked_add_signed(Duration::days(SCHEDULE_HORIZON_DAYS)) {
        Some(_) => Ok(()),
        None => Err("Start date is too far in the future"),
    }
}

// ============================================================================
// Upload Validations
// ============================================================================

/// Validate an uploaded photo declares an image content type
pub fn validate_photo_content_type(content_type: Option<&str>) -> Result<(), &'static str> {
    match content_type {
        Some(ct) if ct.trim().to_ascii_lowercase().starts_with("image/") => Ok(()),
        Some(_) => Err("Photo must be an image"),
        None => Err("Photo content type is missing"),
    }
}

/// Validate an uploaded photo is non-empty and within the size limit
pub fn validate_photo_size(size_bytes: usize, max_bytes: usize) -> Result<(), &'static str> {
    if size_bytes == 0 {
        return Err("Photo is empty");
    }
    if size_bytes > max_bytes {
        return Err("Photo exceeds the maximum upload size");
    }
    Ok(())
}

// ============================================================================
// Assistant Validations
// ============================================================================

/// Longest prompt forwarded to the assistant
pub const MAX_PROMPT_LEN: usize = 4000;

/// Number of previous chat turns forwarded to the model
pub const MAX_HISTORY_TURNS: usize = 10;

/// Validate prompt length
pub fn validate_prompt(prompt: &str) -> Result<(), &'static str> {
    if prompt.chars().count() > MAX_PROMPT_LEN {
        return Err("Prompt must be at most 4000 characters");
    }
    Ok(())
}

/// Validate a chat history role
pub fn validate_history_role(role: &str) -> Result<(), &'static str> {
    match role {
        "user" | "assistant" => Ok(()),
        _ => Err("History role must be 'user' or 'assistant'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_validate_start_date() {
        let today = Utc::now();
        assert!(validate_start_date(today).is_ok());

        let edge = Utc.with_ymd_and_hms(262142, 12, 20, 0, 0, 0).unwrap();
        assert!(validate_start_date(edge).is_err());
        assert!(validate_start_date(DateTime::<Utc>::MAX_UTC).is_err());
    }

    #[test]
    fn test_validate_plant_name() {
        assert!(validate_plant_name("Olive").is_ok());
        assert!(validate_plant_name("   ").is_err());
        assert!(validate_plant_name(&"a".repeat(121)).is_err());
        assert!(validate_plant_name(&"a".repeat(120)).is_ok());
    }

    #[test]
    fn test_validate_coordinates() {
        assert!(validate_latitude(36.8).is_ok());
        assert!(validate_latitude(-90.0).is_ok());
        assert!(validate_latitude(90.1).is_err());
        assert!(validate_latitude(f64::NAN).is_err());
        assert!(validate_longitude(10.18).is_ok());
        assert!(validate_longitude(-181.0).is_err());
    }

    #[test]
    fn test_validate_photo() {
        assert!(validate_photo_content_type(Some("image/jpeg")).is_ok());
        assert!(validate_photo_content_type(Some("IMAGE/PNG")).is_ok());
        assert!(validate_photo_content_type(Some("application/pdf")).is_err());
        assert!(validate_photo_content_type(None).is_err());
        assert!(validate_photo_size(0, 10).is_err());
        assert!(validate_photo_size(11, 10).is_err());
        assert!(validate_photo_size(10, 10).is_ok());
    }

    #[test]
    fn test_validate_assistant_inputs() {
        assert!(validate_prompt("Which shrubs tolerate salt spray?").is_ok());
        assert!(validate_prompt(&"x".repeat(4001)).is_err());
        assert!(validate_history_role("user").is_ok());
        assert!(validate_history_role("system").is_err());
    }
}
