//! Validation utilities for the Food Production Planning Platform

use crate::models::planning::ProductionConfig;

// ============================================================================
// Identifier Validations
// ============================================================================

/// Validate a SKU identifier after trimming
pub fn validate_sku(sku: &str) -> Result<(), &'static str> {
    if sku.is_empty() {
        return Err("SKU must not be empty");
    }
    if sku.len() > 64 {
        return Err("SKU must be at most 64 characters");
    }
    if sku.chars().any(char::is_control) {
        return Err("SKU must not contain control characters");
    }
    Ok(())
}

/// Validate a history target year
pub fn validate_target_year(year: i32) -> Result<(), &'static str> {
    if !(2000..=2100).contains(&year) {
        return Err("Year out of supported range");
    }
    Ok(())
}

// ============================================================================
// Planning Configuration Validations
// ============================================================================

/// Validate a resolved production planning configuration
pub fn validate_production_config(config: &ProductionConfig) -> Result<(), &'static str> {
    if !config.coverage_days.is_finite() || config.coverage_days <= 0.0 {
        return Err("Coverage days must be positive");
    }
    if !config.safety_buffer_days.is_finite() || config.safety_buffer_days < 0.0 {
        return Err("Safety buffer must not be negative");
    }
    if config.holiday_lead_time_days < 0 {
        return Err("Holiday lead time must not be negative");
    }
    Ok(())
}
