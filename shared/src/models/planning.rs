//! Planning configuration, decision records, and run payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::article::StockSnapshotRow;
use crate::models::series::MonthlySeries;
use crate::types::{ProductionPriority, StockStatus, TrendDirection};

/// Engine configuration for a production planning run
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ProductionConfig {
    /// Target days of stock to hold after producing
    pub coverage_days: f64,
    /// Days-of-stock threshold below which production is urgent
    pub safety_buffer_days: f64,
    /// Days before Easter/Christmas that the seasonal factor activates
    pub holiday_lead_time_days: i64,
}

/// Request payload for the production compute endpoint
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ComputePlanRequest {
    /// Optional label stored with the persisted run
    #[validate(length(max = 120))]
    pub label: Option<String>,
    #[validate(range(min = 1.0, max = 365.0))]
    pub coverage_days: Option<f64>,
    #[validate(range(min = 0.0, max = 365.0))]
    pub safety_buffer_days: Option<f64>,
    #[validate(range(min = 0, max = 120))]
    pub holiday_lead_time_days: Option<i64>,
    /// Normalized stock snapshot produced by upstream file ingestion
    pub items: Vec<StockSnapshotRow>,
}

/// Request payload for the raw-material analyze endpoint
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AnalyzeRequest {
    /// Year whose consumption history is analyzed (default: current year)
    #[validate(range(min = 2000, max = 2100))]
    pub year: Option<i32>,
    /// Normalized stock snapshot produced by upstream file ingestion
    pub items: Vec<StockSnapshotRow>,
}

/// Per-SKU input to the production planner
#[derive(Debug, Clone)]
pub struct ProductionInput {
    pub sku: String,
    pub name: String,
    pub current_stock: f64,
    pub min_stock: f64,
    /// Previous-year monthly sales, when any were recorded
    pub history: Option<MonthlySeries>,
}

/// Per-SKU production decision
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionDecision {
    pub sku: String,
    pub name: String,
    pub current_stock: f64,
    pub min_stock: f64,
    /// Estimated daily usage after blending and flooring
    pub daily_usage: f64,
    pub days_until_stockout: f64,
    pub desired_stock: f64,
    pub amount_to_produce: f64,
    pub must_produce: bool,
    pub priority: ProductionPriority,
    /// True when no usable history existed and the minimal-demand fallback applied
    pub used_fallback: bool,
}

/// Complete result of one production planning computation
#[derive(Debug, Clone, Serialize)]
pub struct ProductionPlan {
    /// Seasonal demand factor applied to every desired stock in this run
    pub holiday_factor: f64,
    pub decisions: Vec<ProductionDecision>,
}

/// Persisted production run header
#[derive(Debug, Clone, Serialize)]
pub struct ProductionRun {
    pub id: Uuid,
    pub label: Option<String>,
    pub coverage_days: f64,
    pub safety_buffer_days: f64,
    pub holiday_lead_time_days: i64,
    pub holiday_factor: f64,
    pub item_count: i64,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Production run with its line items in stored order
#[derive(Debug, Clone, Serialize)]
pub struct ProductionRunDetail {
    pub run: ProductionRun,
    pub items: Vec<ProductionDecision>,
}

/// Per-SKU input to the reorder analyzer
#[derive(Debug, Clone)]
pub struct ReorderInput {
    pub sku: String,
    pub name: String,
    pub current_stock: f64,
    /// Supplier lead time in months, when the master record carries one
    pub lead_time_months: Option<f64>,
    /// Target-year monthly consumption, when any was recorded
    pub history: Option<MonthlySeries>,
}

/// Per-SKU reorder analysis decision
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderDecision {
    pub sku: String,
    pub name: String,
    pub current_stock: f64,
    /// Trend-adjusted monthly usage estimate (0 on the fallback path)
    pub monthly_usage: f64,
    /// Months of coverage; `None` means unlimited
    pub coverage_months: Option<f64>,
    pub status: StockStatus,
    /// German status message shown in the analysis view
    pub status_message: String,
    pub trend: TrendDirection,
    pub trend_coefficient: f64,
    pub lead_time_months: Option<f64>,
    /// True when the status was escalated because coverage fell below the
    /// supplier lead time
    pub lead_time_warning: bool,
    /// True when no usable history existed
    pub used_fallback: bool,
}

/// Result of one raw-material analysis
#[derive(Debug, Clone, Serialize)]
pub struct ReorderAnalysis {
    pub year: i32,
    pub item_count: usize,
    pub critical_count: usize,
    pub warning_count: usize,
    pub attention_count: usize,
    pub sufficient_count: usize,
    pub items: Vec<ReorderDecision>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> Vec<StockSnapshotRow> {
        vec![StockSnapshotRow {
            sku: "A-100".to_string(),
            name: None,
            current_stock: Some(10.0),
        }]
    }

    #[test]
    fn test_compute_request_accepts_defaults() {
        let request = ComputePlanRequest {
            label: None,
            coverage_days: None,
            safety_buffer_days: None,
            holiday_lead_time_days: None,
            items: snapshot(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_compute_request_rejects_nonpositive_coverage() {
        let request = ComputePlanRequest {
            label: None,
            coverage_days: Some(0.0),
            safety_buffer_days: None,
            holiday_lead_time_days: None,
            items: snapshot(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_analyze_request_rejects_out_of_range_year() {
        let request = AnalyzeRequest {
            year: Some(1990),
            items: snapshot(),
        };
        assert!(request.validate().is_err());

        let request = AnalyzeRequest {
            year: Some(2025),
            items: snapshot(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_coverage_serializes_unlimited_as_null() {
        let decision = ReorderDecision {
            sku: "m-1".to_string(),
            name: "Mehl".to_string(),
            current_stock: 5.0,
            monthly_usage: 0.0,
            coverage_months: None,
            status: StockStatus::Sufficient,
            status_message: "Kein Verbrauch / Unendlich".to_string(),
            trend: TrendDirection::Stable,
            trend_coefficient: 0.0,
            lead_time_months: None,
            lead_time_warning: false,
            used_fallback: true,
        };
        let json = serde_json::to_value(&decision).unwrap();
        assert!(json["coverage_months"].is_null());
        assert_eq!(json["status"], "sufficient");
    }
}
