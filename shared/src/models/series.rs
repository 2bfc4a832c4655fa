//! Monthly history series for a single SKU

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One calendar year of monthly quantities for a SKU.
///
/// A month is either observed (`Some`) or absent (`None`). Absence means
/// "no observation" and is distinct from a recorded zero; zero and negative
/// observations are kept here and discarded during cleaning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlySeries {
    pub sku: String,
    pub year: i32,
    values: [Option<f64>; 12],
}

/// A single observed month within a series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthPoint {
    /// Calendar month index, 0 = January
    pub month: u32,
    pub value: f64,
}

impl MonthlySeries {
    pub fn new(sku: impl Into<String>, year: i32) -> Self {
        Self {
            sku: sku.into(),
            year,
            values: [None; 12],
        }
    }

    /// Record the observation for `month` (0 = January). Out-of-range
    /// months are ignored.
    pub fn set(&mut self, month: u32, value: f64) {
        if let Some(slot) = self.values.get_mut(month as usize) {
            *slot = Some(value);
        }
    }

    pub fn value(&self, month: u32) -> Option<f64> {
        self.values.get(month as usize).copied().flatten()
    }

    /// Months with a present, finite, strictly positive value, in calendar
    /// order. This is the cleaning step every statistic builds on: absent
    /// months and zero-or-negative observations never reach the engine.
    pub fn valid_months(&self) -> Vec<MonthPoint> {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(month, value)| {
                value
                    .filter(|v| v.is_finite() && *v > 0.0)
                    .map(|value| MonthPoint {
                        month: month as u32,
                        value,
                    })
            })
            .collect()
    }
}

/// Number of days in the given calendar month (`month` 0-based)
pub fn days_in_month(year: i32, month: u32) -> f64 {
    let first = NaiveDate::from_ymd_opt(year, month + 1, 1).unwrap();
    let next = if month == 11 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1).unwrap()
    } else {
        NaiveDate::from_ymd_opt(year, month + 2, 1).unwrap()
    };
    (next - first).num_days() as f64
}
