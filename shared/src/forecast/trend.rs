//! Consumption trend estimation for the raw-material pipeline

use crate::models::series::MonthPoint;
use crate::types::TrendDirection;

/// Minimum observations for a meaningful regression
const MIN_TREND_POINTS: usize = 3;
/// Dead zone around zero within which the trend counts as stable
const TREND_THRESHOLD: f64 = 0.05;
/// Cap on the trend adjustment in either direction
const MAX_TREND_ADJUSTMENT: f64 = 0.15;

/// Relative consumption trend: ordinary-least-squares slope of value over
/// calendar month index, normalized by the mean value.
///
/// Month indices are the actual calendar positions, so gaps in the series
/// stretch the regression instead of being collapsed away. Returns 0 for
/// fewer than three observations or a degenerate regression.
pub fn linear_trend_coefficient(points: &[MonthPoint]) -> f64 {
    if points.len() < MIN_TREND_POINTS {
        return 0.0;
    }
    let n = points.len() as f64;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_x2 = 0.0;
    for point in points {
        let x = f64::from(point.month);
        sum_x += x;
        sum_y += point.value;
        sum_xy += x * point.value;
        sum_x2 += x * x;
    }
    let denominator = n * sum_x2 - sum_x * sum_x;
    if denominator == 0.0 {
        // All x identical; cannot occur with distinct month indices
        return 0.0;
    }
    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let mean = sum_y / n;
    if mean == 0.0 {
        return 0.0;
    }
    slope / mean
}

/// Classify a trend coefficient and derive the demand multiplier.
///
/// Rising consumption boosts the usage estimate by at most 15%, falling
/// consumption cuts it by at most 15%; inside the dead zone the estimate is
/// left untouched.
pub fn classify_trend(coefficient: f64) -> (TrendDirection, f64) {
    if coefficient > TREND_THRESHOLD {
        (TrendDirection::Up, 1.0 + coefficient.min(MAX_TREND_ADJUSTMENT))
    } else if coefficient < -TREND_THRESHOLD {
        (
            TrendDirection::Down,
            1.0 + coefficient.max(-MAX_TREND_ADJUSTMENT),
        )
    } else {
        (TrendDirection::Stable, 1.0)
    }
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

    #[test]
    fn test_too_few_points_is_flat() {
        assert_eq!(linear_trend_coefficient(&points(&[(0, 5.0)])), 0.0);
        assert_eq!(
            linear_trend_coefficient(&points(&[(0, 5.0), (1, 10.0)])),
            0.0
        );
    }

    #[test]
    fn test_flat_series_has_zero_trend() {
        let coefficient = linear_trend_coefficient(&points(&[(0, 4.0), (1, 4.0), (2, 4.0)]));
        assert_eq!(coefficient, 0.0);
    }

    #[test]
    fn test_rising_series_positive() {
        // Slope 1 over mean 2 -> coefficient 0.5
        let coefficient = linear_trend_coefficient(&points(&[(0, 1.0), (1, 2.0), (2, 3.0)]));
        assert!((coefficient - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_falling_series_negative() {
        let coefficient = linear_trend_coefficient(&points(&[(0, 3.0), (1, 2.0), (2, 1.0)]));
        assert!((coefficient + 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_month_gaps_stretch_regression() {
        // Same values, wider x spacing: flatter slope
        let dense = linear_trend_coefficient(&points(&[(0, 1.0), (1, 2.0), (2, 3.0)]));
        let sparse = linear_trend_coefficient(&points(&[(0, 1.0), (5, 2.0), (10, 3.0)]));
        assert!(sparse < dense);
        assert!(sparse > 0.0);
    }

    #[test]
    fn test_classification_dead_zone() {
        let (direction, multiplier) = classify_trend(0.05);
        assert_eq!(direction, TrendDirection::Stable);
        assert_eq!(multiplier, 1.0);

        let (direction, multiplier) = classify_trend(-0.05);
        assert_eq!(direction, TrendDirection::Stable);
        assert_eq!(multiplier, 1.0);
    }

    #[test]
    fn test_classification_up_and_capped() {
        let (direction, multiplier) = classify_trend(0.08);
        assert_eq!(direction, TrendDirection::Up);
        assert!((multiplier - 1.08).abs() < 1e-12);

        let (direction, multiplier) = classify_trend(0.9);
        assert_eq!(direction, TrendDirection::Up);
        assert_eq!(multiplier, 1.15);
    }

    #[test]
    fn test_classification_down_and_capped() {
        let (direction, multiplier) = classify_trend(-0.08);
        assert_eq!(direction, TrendDirection::Down);
        assert!((multiplier - 0.92).abs() < 1e-12);

        let (direction, multiplier) = classify_trend(-0.9);
        assert_eq!(direction, TrendDirection::Down);
        assert!((multiplier - 0.85).abs() < 1e-12);
    }
}
