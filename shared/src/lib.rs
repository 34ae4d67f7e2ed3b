//! Shared types and models for the GreenSpot plant care platform
//!
//! This crate contains the pure calculators shared between the backend,
//! the browser (via WASM) and tests: climate classification, care schedule
//! generation, the plant health heuristic and assistant reply scoping.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
