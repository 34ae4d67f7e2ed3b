//! Domain models for the GreenSpot plant care platform

mod assistant;
mod care;
mod climate;
mod health;

pub use assistant::*;
pub use care::*;
pub use climate::*;
pub use health::*;
