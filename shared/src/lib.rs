//! Shared types and models for the Food Production Planning Platform
//!
//! This crate contains the domain models and the demand-forecasting engine
//! shared between the backend and other components of the system. The engine
//! is pure and deterministic: callers load history and stock snapshots, pass
//! the current date explicitly, and persist the returned records.

pub mod forecast;
pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
