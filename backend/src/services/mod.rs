//! Business logic services for the GreenSpot backend

pub mod assistant;
pub mod care;
pub mod plant_health;
