//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Priority tier of a production decision
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProductionPriority {
    /// Stock runs out within the safety buffer
    High,
    /// Stock runs out within twice the safety buffer
    Medium,
    /// Coverage beyond twice the safety buffer
    Low,
}

impl ProductionPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductionPriority::High => "high",
            ProductionPriority::Medium => "medium",
            ProductionPriority::Low => "low",
        }
    }

    /// German label shown in planning views
    pub fn label_de(&self) -> &'static str {
        match self {
            ProductionPriority::High => "Hoch",
            ProductionPriority::Medium => "Mittel",
            ProductionPriority::Low => "Tief",
        }
    }

    /// Sort rank, most urgent first
    pub fn rank(&self) -> u8 {
        match self {
            ProductionPriority::High => 0,
            ProductionPriority::Medium => 1,
            ProductionPriority::Low => 2,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "high" => Some(ProductionPriority::High),
            "medium" => Some(ProductionPriority::Medium),
            "low" => Some(ProductionPriority::Low),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProductionPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label_de())
    }
}

/// Stock coverage status of a raw material
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    /// Less than one month of coverage, or coverage below the supplier lead time
    Critical,
    /// Less than two months of coverage
    Warning,
    /// Less than three months of coverage
    Attention,
    /// Three months or more, or no recorded consumption
    Sufficient,
}

impl StockStatus {
    /// Traffic-light color used by the analysis view
    pub fn color(&self) -> &'static str {
        match self {
            StockStatus::Critical => "red",
            StockStatus::Warning => "orange",
            StockStatus::Attention => "yellow",
            StockStatus::Sufficient => "green",
        }
    }

    /// German label shown in the analysis view
    pub fn label_de(&self) -> &'static str {
        match self {
            StockStatus::Critical => "Kritisch",
            StockStatus::Warning => "Warnung",
            StockStatus::Attention => "Aufmerksamkeit",
            StockStatus::Sufficient => "Ausreichend",
        }
    }

    /// Sort rank, most severe first
    pub fn severity(&self) -> u8 {
        match self {
            StockStatus::Critical => 0,
            StockStatus::Warning => 1,
            StockStatus::Attention => 2,
            StockStatus::Sufficient => 3,
        }
    }
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label_de())
    }
}

/// Direction of the consumption trend
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Up => "up",
            TrendDirection::Down => "down",
            TrendDirection::Stable => "stable",
        }
    }
}
