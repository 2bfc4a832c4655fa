//! Demand forecasting and planning engine
//!
//! Pure, deterministic functions over in-memory inputs: callers load history
//! and stock snapshots, pass the current date explicitly, and persist the
//! returned records. No component here touches a clock or a database.

pub mod production;
pub mod reorder;
pub mod seasonal;
pub mod stats;
pub mod trend;

pub use production::plan_production;
pub use reorder::analyze_reorder;
