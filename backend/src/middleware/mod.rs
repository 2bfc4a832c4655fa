//! Middleware for the Food Production Planning Platform

pub mod auth;

pub use auth::{auth_middleware, AuthUser, CurrentUser};
