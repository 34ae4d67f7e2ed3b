//! HTTP request handlers

pub mod assistant;
pub mod care;
pub mod health;
pub mod plant_health;

pub use assistant::chat;
pub use care::{
    create_care_schedule, get_climate, get_todays_tasks, list_care_tasks, update_care_task,
};
pub use health::health_check;
pub use plant_health::{create_health_check, list_health_checks};
