//! Finished-goods production planning

use chrono::{Datelike, NaiveDate};

use crate::forecast::seasonal::holiday_demand_factor;
use crate::forecast::stats::{clamp_points, weighted_recency_average, ClampPolicy, RecencyWindow};
use crate::models::planning::{
    ProductionConfig, ProductionDecision, ProductionInput, ProductionPlan,
};
use crate::models::series::{days_in_month, MonthPoint, MonthlySeries};
use crate::types::ProductionPriority;

/// Daily-usage floor. Untracked items are assumed to trickle rather than
/// sit at zero, so true stock-outs still surface in the plan.
const MIN_DAILY_USAGE: f64 = 0.1;
/// Weight of the reference-month signal in the blended estimate
const MONTHLY_BLEND_WEIGHT: f64 = 0.7;
/// Weight of the annualized signal in the blended estimate
const ANNUAL_BLEND_WEIGHT: f64 = 0.3;
/// Recency window: the last three cleaned entries by position
const PRODUCTION_RECENCY_ENTRIES: usize = 3;

/// Compute the production plan for one stock snapshot.
///
/// Pure in (inputs, config, today). Results are sorted by priority
/// (Hoch, Mittel, Tief), then ascending days-until-stockout, then SKU, so
/// repeated runs over the same inputs are identical.
pub fn plan_production(
    inputs: &[ProductionInput],
    config: &ProductionConfig,
    today: NaiveDate,
) -> ProductionPlan {
    let holiday_factor = holiday_demand_factor(today, config.holiday_lead_time_days);

    let mut decisions: Vec<ProductionDecision> = inputs
        .iter()
        .map(|input| plan_single(input, config, today, holiday_factor))
        .collect();

    decisions.sort_by(|a, b| {
        a.priority
            .rank()
            .cmp(&b.priority.rank())
            .then(a.days_until_stockout.total_cmp(&b.days_until_stockout))
            .then_with(|| a.sku.cmp(&b.sku))
    });

    ProductionPlan {
        holiday_factor,
        decisions,
    }
}

fn plan_single(
    input: &ProductionInput,
    config: &ProductionConfig,
    today: NaiveDate,
    holiday_factor: f64,
) -> ProductionDecision {
    let (daily_usage, used_fallback) = match &input.history {
        Some(history) => {
            let valid = history.valid_months();
            if valid.is_empty() {
                (MIN_DAILY_USAGE, true)
            } else {
                (estimate_daily_usage(history, &valid, today), false)
            }
        }
        None => (MIN_DAILY_USAGE, true),
    };

    // daily_usage > 0 by construction, so this never divides by zero
    let days_until_stockout = input.current_stock / daily_usage;
    let must_produce =
        input.current_stock < input.min_stock || days_until_stockout < config.safety_buffer_days;
    let desired_stock =
        (daily_usage * config.coverage_days).max(input.min_stock) * holiday_factor;
    let amount_to_produce = if must_produce && desired_stock > input.current_stock {
        (desired_stock - input.current_stock).ceil()
    } else {
        0.0
    };
    let priority = classify_priority(days_until_stockout, config.safety_buffer_days);

    ProductionDecision {
        sku: input.sku.clone(),
        name: input.name.clone(),
        current_stock: input.current_stock,
        min_stock: input.min_stock,
        daily_usage,
        days_until_stockout,
        desired_stock,
        amount_to_produce,
        must_produce,
        priority,
        used_fallback,
    }
}

/// Blend the reference-month daily rate with the annualized weighted
/// average (70/30) and floor the result at the minimal trickle demand.
fn estimate_daily_usage(history: &MonthlySeries, valid: &[MonthPoint], today: NaiveDate) -> f64 {
    let reference_month = today.month0();
    // Daily rate of the same calendar month a year ago, normalized by that
    // month's actual day count in the history year
    let monthly_daily = history
        .value(reference_month)
        .filter(|v| v.is_finite() && *v > 0.0)
        .map(|v| v / days_in_month(history.year, reference_month))
        .unwrap_or(0.0);

    let cleaned = clamp_points(valid, ClampPolicy::Percentile);
    let monthly_average = weighted_recency_average(
        &cleaned,
        RecencyWindow::LastEntries(PRODUCTION_RECENCY_ENTRIES),
    );
    let annual_daily = monthly_average * 12.0 / 365.0;

    let blended = MONTHLY_BLEND_WEIGHT * monthly_daily + ANNUAL_BLEND_WEIGHT * annual_daily;
    if blended <= 0.0 {
        MIN_DAILY_USAGE
    } else {
        blended
    }
}

/// Priority tiers, most urgent checked first. Boundaries are strict, so a
/// stockout horizon exactly at a threshold lands in the less urgent tier.
pub fn classify_priority(days_until_stockout: f64, safety_buffer_days: f64) -> ProductionPriority {
    if days_until_stockout < safety_buffer_days {
        ProductionPriority::High
    } else if days_until_stockout < 2.0 * safety_buffer_days {
        ProductionPriority::Medium
    } else {
        ProductionPriority::Low
    }
}
