//! Series statistics: outlier clamping and recency-weighted averaging
//!
//! Shared leaf logic of both planning pipelines. The pipelines use different
//! clamp policies and different recency windows; both are explicit strategies
//! here so the two call sites cannot drift apart.

use crate::models::series::MonthPoint;

/// Weight of observations inside the recency window
const RECENT_WEIGHT: f64 = 2.0;
/// Weight of all other observations
const BASE_WEIGHT: f64 = 1.0;

/// Outlier clamping policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClampPolicy {
    /// Clamp into [P10, P90], percentiles linearly interpolated over the
    /// sorted values (rank = (n-1) * p). Used by the production pipeline.
    Percentile,
    /// Clamp into [Q1 - 1.5*IQR, Q3 + 1.5*IQR] with nearest-rank quartiles
    /// (Q1 at floor(n*0.25), Q3 at floor(n*0.75)); identity below four
    /// values. Used by the raw-material pipeline. The lower bound may go
    /// negative for skewed data; inputs are strictly positive, so clamping
    /// still never produces a negative value.
    Iqr,
}

impl ClampPolicy {
    /// Clamp `values` into the policy's bounds, preserving length and order.
    pub fn clamp(&self, values: &[f64]) -> Vec<f64> {
        match self {
            ClampPolicy::Percentile => percentile_clamp(values),
            ClampPolicy::Iqr => iqr_clamp(values),
        }
    }
}

fn percentile_clamp(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return values.to_vec();
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let lower = interpolated_percentile(&sorted, 0.10);
    let upper = interpolated_percentile(&sorted, 0.90);
    values.iter().map(|v| v.clamp(lower, upper)).collect()
}

/// Percentile with linear interpolation between the surrounding ranks
fn interpolated_percentile(sorted: &[f64], p: f64) -> f64 {
    let rank = (sorted.len() - 1) as f64 * p;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let fraction = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

fn iqr_clamp(values: &[f64]) -> Vec<f64> {
    if values.len() < 4 {
        // Too few points for quartile estimation
        return values.to_vec();
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len() as f64;
    let q1 = sorted[(n * 0.25).floor() as usize];
    let q3 = sorted[(n * 0.75).floor() as usize];
    let iqr = q3 - q1;
    let lower = q1 - 1.5 * iqr;
    let upper = q3 + 1.5 * iqr;
    values.iter().map(|v| v.clamp(lower, upper)).collect()
}

/// Which observations receive the elevated recency weight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecencyWindow {
    /// The last `n` entries of the cleaned series, by chronological
    /// position. Used by the production pipeline.
    LastEntries(usize),
    /// The `span` calendar months ending at `current_month` (0 = January),
    /// wrapping across the year boundary. Used by the raw-material pipeline.
    CalendarMonths { current_month: u32, span: u32 },
}

impl RecencyWindow {
    fn is_recent(&self, position: usize, total: usize, month: u32) -> bool {
        match *self {
            RecencyWindow::LastEntries(n) => position + n >= total,
            RecencyWindow::CalendarMonths {
                current_month,
                span,
            } => (0..span).any(|i| (current_month + 12 - i) % 12 == month),
        }
    }
}

/// Recency-weighted mean of the cleaned observations.
///
/// Observations inside the window weigh 2.0, all others 1.0, so the weight
/// total is positive whenever at least one observation exists. Must not be
/// called on an empty set; callers take the fallback branch instead.
pub fn weighted_recency_average(points: &[MonthPoint], window: RecencyWindow) -> f64 {
    debug_assert!(
        !points.is_empty(),
        "weighted average requires at least one observation"
    );
    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;
    for (position, point) in points.iter().enumerate() {
        let weight = if window.is_recent(position, points.len(), point.month) {
            RECENT_WEIGHT
        } else {
            BASE_WEIGHT
        };
        weighted_sum += weight * point.value;
        weight_total += weight;
    }
    weighted_sum / weight_total
}

/// Clamp a point set's values, keeping the calendar month indices attached
pub fn clamp_points(points: &[MonthPoint], policy: ClampPolicy) -> Vec<MonthPoint> {
    let values: Vec<f64> = points.iter().map(|p| p.value).collect();
    points
        .iter()
        .zip(policy.clamp(&values))
        .map(|(p, value)| MonthPoint {
            month: p.month,
            value,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(values: &[(u32, f64)]) -> Vec<MonthPoint> {
        values
            .iter()
            .map(|&(month, value)| MonthPoint { month, value })
            .collect()
    }

    // ========================================================================
    // Percentile clamp
    // ========================================================================

    #[test]
    fn test_percentile_clamp_empty_is_identity() {
        assert!(ClampPolicy::Percentile.clamp(&[]).is_empty());
    }

    #[test]
    fn test_percentile_clamp_single_value() {
        // P10 == P90 == the value itself
        assert_eq!(ClampPolicy::Percentile.clamp(&[7.0]), vec![7.0]);
    }

    #[test]
    fn test_percentile_interpolation() {
        // For [10, 20, 30]: P10 rank = 0.2 -> 10 + 0.2*(20-10) = 12,
        // P90 rank = 1.8 -> 20 + 0.8*(30-20) = 28.
        let clamped = ClampPolicy::Percentile.clamp(&[10.0, 20.0, 30.0]);
        assert_eq!(clamped, vec![12.0, 20.0, 28.0]);
    }

    #[test]
    fn test_percentile_clamp_pulls_in_outliers() {
        let input = vec![1.0, 100.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0];
        let clamped = ClampPolicy::Percentile.clamp(&input);
        assert_eq!(clamped.len(), input.len());
        // Extremes are pulled toward the bulk of the distribution
        assert!(clamped[0] > 1.0);
        assert!(clamped[1] < 100.0);
        // Interior values untouched
        assert_eq!(clamped[2], 5.0);
    }

    // ========================================================================
    // IQR clamp
    // ========================================================================

    #[test]
    fn test_iqr_clamp_identity_below_four() {
        let input = vec![1.0, 50.0, 999.0];
        assert_eq!(ClampPolicy::Iqr.clamp(&input), input);
    }

    #[test]
    fn test_iqr_clamp_nearest_rank() {
        // n=4: Q1 = sorted[1] = 2, Q3 = sorted[3] = 100, IQR = 98,
        // bounds = [-145, 247] -> all values kept.
        let input = vec![100.0, 2.0, 1.0, 3.0];
        assert_eq!(ClampPolicy::Iqr.clamp(&input), input);
    }

    #[test]
    fn test_iqr_clamp_bounds_outlier() {
        // n=8: sorted = [4,5,5,5,5,6,6,500], Q1 = sorted[2] = 5,
        // Q3 = sorted[6] = 6, IQR = 1, bounds = [3.5, 7.5].
        let input = vec![5.0, 6.0, 500.0, 5.0, 4.0, 5.0, 6.0, 5.0];
        let clamped = ClampPolicy::Iqr.clamp(&input);
        assert_eq!(clamped[2], 7.5);
        assert_eq!(clamped[4], 4.0);
    }

    #[test]
    fn test_iqr_lower_bound_may_go_negative() {
        // Skewed positive data: bounds can dip below zero but clamping a
        // positive input never produces a negative output.
        let input = vec![1.0, 1.0, 1.0, 80.0, 90.0, 100.0];
        let clamped = ClampPolicy::Iqr.clamp(&input);
        assert!(clamped.iter().all(|v| *v >= 0.0));
        assert_eq!(clamped.len(), input.len());
    }

    // ========================================================================
    // Recency weighting
    // ========================================================================

    #[test]
    fn test_uniform_values_average_to_themselves() {
        let p = points(&[(0, 2.0), (1, 2.0), (2, 2.0)]);
        let average = weighted_recency_average(&p, RecencyWindow::LastEntries(3));
        assert_eq!(average, 2.0);
    }

    #[test]
    fn test_last_entries_weighting() {
        // [1, 1, 1, 4] with the last 3 doubled:
        // (1*1 + 2*1 + 2*1 + 2*4) / (1+2+2+2) = 13/7
        let p = points(&[(0, 1.0), (1, 1.0), (2, 1.0), (3, 4.0)]);
        let average = weighted_recency_average(&p, RecencyWindow::LastEntries(3));
        assert!((average - 13.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_last_entries_window_larger_than_set() {
        // Every entry is recent; the average degenerates to the plain mean
        let p = points(&[(3, 2.0), (4, 4.0)]);
        let average = weighted_recency_average(&p, RecencyWindow::LastEntries(3));
        assert_eq!(average, 3.0);
    }

    #[test]
    fn test_calendar_window_weighting() {
        // Current month June (5): recent months are Jun, May, Apr.
        // Weights: Jan 1.0, Apr 2.0, Jun 2.0 -> (1*1 + 2*4 + 2*7)/5 = 23/5
        let p = points(&[(0, 1.0), (3, 4.0), (5, 7.0)]);
        let average = weighted_recency_average(
            &p,
            RecencyWindow::CalendarMonths {
                current_month: 5,
                span: 3,
            },
        );
        assert!((average - 23.0 / 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_calendar_window_wraps_year_boundary() {
        // Current month January (0): recent months are Jan, Dec, Nov
        let p = points(&[(0, 10.0), (6, 1.0), (10, 10.0), (11, 10.0)]);
        let average = weighted_recency_average(
            &p,
            RecencyWindow::CalendarMonths {
                current_month: 0,
                span: 3,
            },
        );
        // (2*10 + 1*1 + 2*10 + 2*10) / (2+1+2+2) = 61/7
        assert!((average - 61.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_clamp_points_keeps_months() {
        let p = points(&[(2, 5.0), (7, 6.0), (9, 500.0), (11, 5.0), (1, 4.0), (3, 5.0), (4, 6.0), (5, 5.0)]);
        let cleaned = clamp_points(&p, ClampPolicy::Iqr);
        let months: Vec<u32> = cleaned.iter().map(|c| c.month).collect();
        assert_eq!(months, vec![2, 7, 9, 11, 1, 3, 4, 5]);
        assert!(cleaned[2].value < 500.0);
    }
}
