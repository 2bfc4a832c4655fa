//! Business logic services for the Food Production Planning Platform

pub mod production;
pub mod reorder;

pub use production::ProductionPlanningService;
pub use reorder::ReorderAnalysisService;
