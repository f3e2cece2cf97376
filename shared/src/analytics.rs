//! Inventory analytics formulas
//!
//! Every function here is total: degenerate input yields a sentinel value
//! (`0`, [`NEVER_RUNS_OUT_DAYS`], [`Trend::Flat`], class `C`) instead of an
//! error or a NaN.

use crate::models::{
    AbcClass, AbcItem, AnalysisParams, ConsumptionPoint, ConsumptionTrend,
    InventoryRecommendation, Trend, ValuedItem,
};

/// Remaining days reported when there is no consumption
pub const NEVER_RUNS_OUT_DAYS: f64 = 999.0;

/// Cumulative value share up to which items are class A
pub const CLASS_A_THRESHOLD: f64 = 0.80;

/// Cumulative value share up to which items are class B
pub const CLASS_B_THRESHOLD: f64 = 0.95;

/// Relative change beyond which consumption is no longer flat
pub const TREND_THRESHOLD: f64 = 0.05;

const DAYS_PER_YEAR: f64 = 365.0;

/// Days until stock runs out at the given daily rate
pub fn remaining_days(stock: f64, daily_rate: f64) -> f64 {
    if daily_rate <= 0.0 {
        return NEVER_RUNS_OUT_DAYS;
    }
    stock / daily_rate
}

/// Confidence (0..=0.9) of an estimate built from `data_points` observations
pub fn confidence_level(data_points: usize, variability: f64) -> f64 {
    if data_points < 3 {
        return 0.3;
    }
    let base = (0.5 + data_points as f64 / 50.0).min(0.9);
    base * (1.0 - variability).max(0.1)
}

/// Pareto classification by cumulative value share.
///
/// Items come back sorted by descending value. Negative values carry no
/// weight, so shares stay within `0..=1`. When the total value is not
/// positive every item is class C.
pub fn classify_abc(items: &[ValuedItem]) -> Vec<AbcItem> {
    let mut sorted: Vec<&ValuedItem> = items.iter().collect();
    sorted.sort_by(|a, b| b.value.total_cmp(&a.value));

    let weight = |item: &ValuedItem| item.value.max(0.0);
    let total: f64 = sorted.iter().map(|i| weight(*i)).sum();
    let mut cumulative = 0.0;

    sorted
        .into_iter()
        .map(|item| {
            if total <= 0.0 || !total.is_finite() {
                return AbcItem {
                    id: item.id.clone(),
                    value: item.value,
                    share: 0.0,
                    cumulative_share: 0.0,
                    class: AbcClass::C,
                };
            }

            cumulative += weight(item);
            let cumulative_share = cumulative / total;
            let class = if cumulative_share <= CLASS_A_THRESHOLD {
                AbcClass::A
            } else if cumulative_share <= CLASS_B_THRESHOLD {
                AbcClass::B
            } else {
                AbcClass::C
            };

            AbcItem {
                id: item.id.clone(),
                value: item.value,
                share: weight(item) / total,
                cumulative_share,
                class,
            }
        })
        .collect()
}

/// Economic order quantity: `sqrt(2DS/H)`, zero for any non-positive input
pub fn economic_order_quantity(annual_demand: f64, order_cost: f64, holding_cost: f64) -> f64 {
    if annual_demand <= 0.0 || order_cost <= 0.0 || holding_cost <= 0.0 {
        return 0.0;
    }
    (2.0 * annual_demand * order_cost / holding_cost).sqrt()
}

/// Stock level at which a new order should be placed
pub fn reorder_point(daily_demand: f64, lead_time_days: f64, safety_stock: f64) -> f64 {
    daily_demand * lead_time_days + safety_stock
}

/// Target stock level: reorder point plus half an order cycle
pub fn optimal_inventory_level(eoq: f64, reorder_point: f64) -> f64 {
    reorder_point + eoq / 2.0
}

/// Compare the average of the earlier half of the history with the later half
pub fn analyze_consumption_trend(history: &[ConsumptionPoint]) -> ConsumptionTrend {
    if history.len() < 2 {
        return ConsumptionTrend::default();
    }

    let mut sorted: Vec<&ConsumptionPoint> = history.iter().collect();
    sorted.sort_by_key(|p| p.date);

    let mid = sorted.len() / 2;
    let average = |points: &[&ConsumptionPoint]| {
        points.iter().map(|p| p.quantity).sum::<f64>() / points.len() as f64
    };
    let earlier = average(&sorted[..mid]);
    let later = average(&sorted[mid..]);

    let change_rate = if earlier == 0.0 {
        0.0
    } else {
        (later - earlier) / earlier
    };

    let trend = if change_rate > TREND_THRESHOLD {
        Trend::Increasing
    } else if change_rate < -TREND_THRESHOLD {
        Trend::Decreasing
    } else {
        Trend::Flat
    };

    ConsumptionTrend { change_rate, trend }
}

/// Trailing simple moving average; one value per full window
pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    if window == 0 || window > values.len() {
        return Vec::new();
    }
    values
        .windows(window)
        .map(|w| w.iter().sum::<f64>() / window as f64)
        .collect()
}

/// Coefficient of variation (population standard deviation over the mean)
pub fn variability(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if mean <= 0.0 {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt() / mean
}

/// Replenishment recommendation from current stock and consumption history.
///
/// `window_days` is the number of days the history covers; daily demand is
/// the history total spread over it.
pub fn recommend(
    stock: f64,
    history: &[ConsumptionPoint],
    window_days: f64,
    params: &AnalysisParams,
) -> InventoryRecommendation {
    let quantities: Vec<f64> = history.iter().map(|p| p.quantity).collect();
    let total: f64 = quantities.iter().sum();
    let daily_demand = if window_days > 0.0 {
        total / window_days
    } else {
        0.0
    };
    let annual_demand = daily_demand * DAYS_PER_YEAR;

    let safety_stock = daily_demand * params.safety_days;
    let eoq = economic_order_quantity(annual_demand, params.order_cost, params.holding_cost);
    let rop = reorder_point(daily_demand, params.lead_time_days, safety_stock);
    let optimal_level = optimal_inventory_level(eoq, rop);

    let needs_reorder = daily_demand > 0.0 && stock <= rop;
    let suggested_order_quantity = if needs_reorder {
        (optimal_level - stock).max(eoq)
    } else {
        0.0
    };

    InventoryRecommendation {
        stock,
        daily_demand,
        annual_demand,
        remaining_days: remaining_days(stock, daily_demand),
        safety_stock,
        economic_order_quantity: eoq,
        reorder_point: rop,
        optimal_level,
        trend: analyze_consumption_trend(history),
        confidence: confidence_level(history.len(), variability(&quantities)),
        needs_reorder,
        suggested_order_quantity,
    }
}
