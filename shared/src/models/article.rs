//! Article and raw-material master data models

use serde::{Deserialize, Serialize};

/// Finished-goods article master record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub sku: String,
    pub name: String,
    /// Minimum stock to hold, in sales units
    pub min_stock: f64,
}

/// Raw-material master record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMaterial {
    pub sku: String,
    pub name: String,
    /// Supplier lead time in months; free text in the source system
    pub lead_time_months: Option<String>,
}

/// Normalized stock snapshot row as produced by upstream file ingestion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockSnapshotRow {
    pub sku: String,
    pub name: Option<String>,
    pub current_stock: Option<f64>,
}

impl StockSnapshotRow {
    /// On-hand quantity with the missing-means-zero default applied
    pub fn stock_or_default(&self) -> f64 {
        match self.current_stock {
            Some(v) if v.is_finite() => v,
            _ => 0.0,
        }
    }
}

/// Parse a stored lead-time field into months.
///
/// The source column is free text; empty, non-numeric, and non-finite
/// entries all count as absent. A decimal comma is accepted.
pub fn parse_lead_time_months(raw: Option<&str>) -> Option<f64> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    let parsed: f64 = raw.replace(',', ".").parse().ok()?;
    if parsed.is_finite() {
        Some(parsed)
    } else {
        None
    }
}
