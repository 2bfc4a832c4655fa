//! Raw-material reorder analysis

use chrono::{Datelike, NaiveDate};

use crate::forecast::stats::{clamp_points, weighted_recency_average, ClampPolicy, RecencyWindow};
use crate::forecast::trend::{classify_trend, linear_trend_coefficient};
use crate::models::planning::{ReorderDecision, ReorderInput};
use crate::types::{StockStatus, TrendDirection};

/// Months in the rolling recency window
const REORDER_RECENCY_MONTHS: u32 = 3;

/// Analyze the raw-material stock snapshot.
///
/// Pure in (inputs, today). Results are sorted for presentation: materials
/// with real history first, fallback entries last; within each bucket by
/// status severity, then ascending coverage with unlimited coverage last,
/// then SKU.
pub fn analyze_reorder(inputs: &[ReorderInput], today: NaiveDate) -> Vec<ReorderDecision> {
    let mut decisions: Vec<ReorderDecision> =
        inputs.iter().map(|input| analyze_single(input, today)).collect();

    decisions.sort_by(|a, b| {
        (a.used_fallback as u8)
            .cmp(&(b.used_fallback as u8))
            .then(a.status.severity().cmp(&b.status.severity()))
            .then(coverage_sort_key(a).total_cmp(&coverage_sort_key(b)))
            .then_with(|| a.sku.cmp(&b.sku))
    });

    decisions
}

fn coverage_sort_key(decision: &ReorderDecision) -> f64 {
    decision.coverage_months.unwrap_or(f64::INFINITY)
}

fn analyze_single(input: &ReorderInput, today: NaiveDate) -> ReorderDecision {
    let valid = input
        .history
        .as_ref()
        .map(|series| series.valid_months())
        .unwrap_or_default();

    if valid.is_empty() {
        // No usable history. Absence of data is not treated as risk.
        let coverage_months = if input.current_stock > 0.0 {
            None
        } else {
            Some(0.0)
        };
        return ReorderDecision {
            sku: input.sku.clone(),
            name: input.name.clone(),
            current_stock: input.current_stock,
            monthly_usage: 0.0,
            coverage_months,
            status: StockStatus::Sufficient,
            status_message: "Kein Verbrauch / Unendlich".to_string(),
            trend: TrendDirection::Stable,
            trend_coefficient: 0.0,
            lead_time_months: input.lead_time_months,
            lead_time_warning: false,
            used_fallback: true,
        };
    }

    let cleaned = clamp_points(&valid, ClampPolicy::Iqr);
    let average = weighted_recency_average(
        &cleaned,
        RecencyWindow::CalendarMonths {
            current_month: today.month0(),
            span: REORDER_RECENCY_MONTHS,
        },
    );
    let coefficient = linear_trend_coefficient(&cleaned);
    let (trend, multiplier) = classify_trend(coefficient);
    let adjusted_usage = average * multiplier;
    // adjusted_usage > 0: every contributing value is > 0 and the trend
    // multiplier is at least 0.85
    let coverage = input.current_stock / adjusted_usage;

    let (mut status, mut status_message) = classify_coverage(coverage);
    let mut lead_time_warning = false;
    if let Some(lead_time) = input.lead_time_months {
        // The override can only worsen the status, and always to red
        if lead_time > 0.0 && lead_time.is_finite() && coverage.is_finite() && coverage < lead_time
        {
            status = StockStatus::Critical;
            status_message = format!(
                "Kritisch: Reichweite unter Lieferzeit ({} Monate)",
                lead_time
            );
            lead_time_warning = true;
        }
    }

    ReorderDecision {
        sku: input.sku.clone(),
        name: input.name.clone(),
        current_stock: input.current_stock,
        monthly_usage: adjusted_usage,
        coverage_months: coverage.is_finite().then_some(coverage),
        status,
        status_message,
        trend,
        trend_coefficient: coefficient,
        lead_time_months: input.lead_time_months,
        lead_time_warning,
        used_fallback: false,
    }
}

/// Coverage tiers, most severe first. Boundaries are strict, so a coverage
/// of exactly 1, 2 or 3 months lands in the less severe tier.
pub fn classify_coverage(coverage_months: f64) -> (StockStatus, String) {
    if coverage_months.is_infinite() {
        (StockStatus::Sufficient, "Ausreichend (∞)".to_string())
    } else if coverage_months < 1.0 {
        (StockStatus::Critical, "Kritisch".to_string())
    } else if coverage_months < 2.0 {
        (StockStatus::Warning, "Warnung".to_string())
    } else if coverage_months < 3.0 {
        (StockStatus::Attention, "Aufmerksamkeit".to_string())
    } else {
        (StockStatus::Sufficient, "Ausreichend".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::series::MonthlySeries;

    fn input(
        sku: &str,
        current_stock: f64,
        lead_time_months: Option<f64>,
        history: Option<MonthlySeries>,
    ) -> ReorderInput {
        ReorderInput {
            sku: sku.to_string(),
            name: sku.to_string(),
            current_stock,
            lead_time_months,
            history,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 6).unwrap()
    }

    #[test]
    fn test_fallback_with_stock_is_unlimited() {
        let decisions = analyze_reorder(&[input("mehl", 6.0, None, None)], today());
        let decision = &decisions[0];

        assert!(decision.used_fallback);
        assert_eq!(decision.monthly_usage, 0.0);
        assert_eq!(decision.coverage_months, None);
        assert_eq!(decision.status, StockStatus::Sufficient);
        assert_eq!(decision.status_message, "Kein Verbrauch / Unendlich");
    }

    #[test]
    fn test_fallback_without_stock_is_zero_coverage() {
        let decisions = analyze_reorder(&[input("mehl", 0.0, None, None)], today());
        let decision = &decisions[0];

        assert!(decision.used_fallback);
        assert_eq!(decision.coverage_months, Some(0.0));
        assert_eq!(decision.status, StockStatus::Sufficient);
    }

    #[test]
    fn test_flat_three_month_history() {
        // jan/feb/mar at 2 each: average 2 regardless of weights, no trend,
        // coverage 6/2 = 3 -> exactly at the boundary, so green
        let mut series = MonthlySeries::new("mehl", 2025);
        series.set(0, 2.0);
        series.set(1, 2.0);
        series.set(2, 2.0);

        let decisions = analyze_reorder(&[input("mehl", 6.0, None, Some(series))], today());
        let decision = &decisions[0];

        assert!(!decision.used_fallback);
        assert_eq!(decision.trend, TrendDirection::Stable);
        assert!((decision.monthly_usage - 2.0).abs() < 1e-12);
        assert_eq!(decision.coverage_months, Some(3.0));
        assert_eq!(decision.status, StockStatus::Sufficient);
        assert_eq!(decision.status_message, "Ausreichend");
    }

    #[test]
    fn test_status_boundaries_are_strict() {
        assert_eq!(classify_coverage(0.99).0, StockStatus::Critical);
        assert_eq!(classify_coverage(1.0).0, StockStatus::Warning);
        assert_eq!(classify_coverage(1.99).0, StockStatus::Warning);
        assert_eq!(classify_coverage(2.0).0, StockStatus::Attention);
        assert_eq!(classify_coverage(2.99).0, StockStatus::Attention);
        assert_eq!(classify_coverage(3.0).0, StockStatus::Sufficient);
        assert_eq!(classify_coverage(f64::INFINITY).0, StockStatus::Sufficient);
    }

    #[test]
    fn test_rising_trend_shortens_coverage() {
        let mut series = MonthlySeries::new("zucker", 2025);
        series.set(0, 1.0);
        series.set(1, 2.0);
        series.set(2, 3.0);

        let decisions = analyze_reorder(&[input("zucker", 6.0, None, Some(series))], today());
        let decision = &decisions[0];

        assert_eq!(decision.trend, TrendDirection::Up);
        // Coefficient 0.5 caps the boost at 15%
        assert!((decision.trend_coefficient - 0.5).abs() < 1e-12);
        let unadjusted = 2.0; // uniform weights in August over jan..mar
        assert!((decision.monthly_usage - unadjusted * 1.15).abs() < 1e-12);
    }

    #[test]
    fn test_lead_time_override_escalates_to_red() {
        // Coverage 3 months is green, but a 4-month lead time forces red
        let mut series = MonthlySeries::new("kakao", 2025);
        series.set(0, 2.0);
        series.set(1, 2.0);
        series.set(2, 2.0);

        let decisions =
            analyze_reorder(&[input("kakao", 6.0, Some(4.0), Some(series))], today());
        let decision = &decisions[0];

        assert_eq!(decision.status, StockStatus::Critical);
        assert!(decision.lead_time_warning);
        assert_eq!(
            decision.status_message,
            "Kritisch: Reichweite unter Lieferzeit (4 Monate)"
        );
    }

    #[test]
    fn test_lead_time_override_never_improves() {
        // Coverage already critical; a short lead time must not lift it
        let mut series = MonthlySeries::new("kakao", 2025);
        series.set(0, 10.0);
        series.set(1, 10.0);
        series.set(2, 10.0);

        let decisions =
            analyze_reorder(&[input("kakao", 5.0, Some(0.2), Some(series))], today());
        let decision = &decisions[0];

        assert_eq!(decision.status, StockStatus::Critical);
        // 0.5 months coverage is not below the 0.2 month lead time
        assert!(!decision.lead_time_warning);
        assert_eq!(decision.status_message, "Kritisch");
    }

    #[test]
    fn test_lead_time_ignored_on_fallback() {
        let decisions = analyze_reorder(&[input("kakao", 6.0, Some(4.0), None)], today());
        let decision = &decisions[0];

        assert_eq!(decision.status, StockStatus::Sufficient);
        assert!(!decision.lead_time_warning);
    }

    #[test]
    fn test_sort_contract() {
        let mut critical = MonthlySeries::new("krit", 2025);
        critical.set(0, 10.0);
        critical.set(1, 10.0);
        critical.set(2, 10.0);

        let mut yellow_late = MonthlySeries::new("gelb-b", 2025);
        yellow_late.set(0, 2.0);
        yellow_late.set(1, 2.0);
        yellow_late.set(2, 2.0);

        let mut yellow_early = MonthlySeries::new("gelb-a", 2025);
        yellow_early.set(0, 2.4);
        yellow_early.set(1, 2.4);
        yellow_early.set(2, 2.4);

        let inputs = vec![
            input("keine-daten", 5.0, None, None),
            input("gelb-b", 5.0, None, Some(yellow_late)),
            input("krit", 5.0, None, Some(critical)),
            input("gelb-a", 5.0, None, Some(yellow_early)),
        ];
        let decisions = analyze_reorder(&inputs, today());
        let order: Vec<&str> = decisions.iter().map(|d| d.sku.as_str()).collect();

        // krit: 0.5 months (red); gelb-a: ~2.08 months; gelb-b: 2.5 months
        // (both yellow, ascending coverage); fallback entry last
        assert_eq!(order, vec!["krit", "gelb-a", "gelb-b", "keine-daten"]);
    }
}
