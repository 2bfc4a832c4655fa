//! HTTP handlers for the Food Production Planning Platform

pub mod health;
pub mod production;
pub mod reorder;

pub use health::health_check;
pub use production::{compute_production_plan, get_production_run, list_production_runs};
pub use reorder::analyze_raw_materials;
