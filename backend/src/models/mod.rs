//! Database models for the Food Production Planning Platform
//!
//! Re-exports models from the shared crate

pub use shared::models::*;
