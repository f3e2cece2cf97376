//! WebAssembly module for Factory Insights
//!
//! Provides client-side computation for:
//! - Invoice profit while a sales invoice is being drafted
//! - Replenishment formulas (remaining days, EOQ, reorder point)
//! - ABC classification and consumption trend analysis
//!
//! Structured inputs and outputs cross the boundary as JSON strings.

use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Serialize};
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;

/// Log to the browser console and wrap as a JS `Error`
fn report(message: String) -> JsValue {
    web_sys::console::error_1(&JsValue::from_str(&message));
    js_sys::Error::new(&message).into()
}

fn decode<T: DeserializeOwned>(json: &str, what: &str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid {} JSON: {}", what, e))
}

fn parse<T: DeserializeOwned>(json: &str, what: &str) -> Result<T, JsValue> {
    decode(json, what).map_err(report)
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| report(format!("Serialization failed: {}", e)))
}

/// Calculate invoice profit.
///
/// `costs_json` is an array parallel to `items_json`; `null` marks a cost
/// that could not be resolved.
#[wasm_bindgen]
pub fn calculate_profit(items_json: &str, costs_json: &str) -> Result<String, JsValue> {
    let items: Vec<InvoiceLineItem> = parse(items_json, "items")?;
    let costs: Vec<Option<Decimal>> = parse(costs_json, "costs")?;

    let result = shared::calculate_profit(&items, &costs)
        .map_err(|e| report(e.to_string()))?;
    to_json(&result)
}

/// Days until stock runs out at the given daily usage
#[wasm_bindgen]
pub fn remaining_days(stock: f64, daily_rate: f64) -> f64 {
    shared::remaining_days(stock, daily_rate)
}

/// Confidence in a forecast, at most 0.9; 0.3 below three data points
#[wasm_bindgen]
pub fn confidence_level(data_points: usize, variability: f64) -> f64 {
    shared::confidence_level(data_points, variability)
}

#[wasm_bindgen]
pub fn economic_order_quantity(annual_demand: f64, order_cost: f64, holding_cost: f64) -> f64 {
    shared::economic_order_quantity(annual_demand, order_cost, holding_cost)
}

#[wasm_bindgen]
pub fn reorder_point(daily_demand: f64, lead_time_days: f64, safety_stock: f64) -> f64 {
    shared::reorder_point(daily_demand, lead_time_days, safety_stock)
}

#[wasm_bindgen]
pub fn optimal_inventory_level(eoq: f64, reorder_point: f64) -> f64 {
    shared::optimal_inventory_level(eoq, reorder_point)
}

/// Classify `[{id, value}]` items into A/B/C by cumulative value share
#[wasm_bindgen]
pub fn classify_abc(items_json: &str) -> Result<String, JsValue> {
    let items: Vec<ValuedItem> = parse(items_json, "items")?;
    to_json(&shared::classify_abc(&items))
}

/// Trend of a `[{date, quantity}]` consumption history
#[wasm_bindgen]
pub fn analyze_consumption_trend(history_json: &str) -> Result<String, JsValue> {
    let history: Vec<ConsumptionPoint> = parse(history_json, "history")?;
    to_json(&shared::analyze_consumption_trend(&history))
}

/// Trailing simple moving average, returned as a `Float64Array`
#[wasm_bindgen]
pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    shared::moving_average(values, window)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_profit_from_json() {
        let items = r#"[
            {"item_id": "6f9619ff-8b86-d011-b42d-00c04fc964ff", "item_type": "finished_products",
             "item_name": "Syrup 1L", "quantity": "10", "unit_price": "25"},
            {"item_id": "7f9619ff-8b86-d011-b42d-00c04fc964ff", "item_type": "raw_materials",
             "item_name": "Sugar", "quantity": "2", "unit_price": "5"}
        ]"#;
        let costs = r#"["15", null]"#;

        let json = calculate_profit(items, costs).unwrap();
        let result: ProfitCalculationResult = serde_json::from_str(&json).unwrap();

        assert_eq!(result.total_cost, Decimal::from(150));
        assert_eq!(result.total_price, Decimal::from(260));
        assert_eq!(result.profit, Decimal::from(110));
        assert_eq!(result.unresolved_costs.len(), 1);
    }

    #[test]
    fn test_replenishment_formulas() {
        assert_eq!(remaining_days(100.0, 0.0), 999.0);
        assert!((remaining_days(100.0, 4.0) - 25.0).abs() < 1e-9);
        assert!((economic_order_quantity(1000.0, 50.0, 2.0) - 223.606_797_749_979).abs() < 1e-6);
        assert!((reorder_point(10.0, 7.0, 30.0) - 100.0).abs() < 1e-9);
        assert!((optimal_inventory_level(200.0, 100.0) - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_classify_abc_from_json() {
        let json = classify_abc(r#"[{"id":"a","value":80},{"id":"b","value":15},{"id":"c","value":5}]"#)
            .unwrap();
        let classes: Vec<AbcItem> = serde_json::from_str(&json).unwrap();

        assert_eq!(classes[0].class, AbcClass::A);
        assert_eq!(classes[1].class, AbcClass::B);
        assert_eq!(classes[2].class, AbcClass::C);
    }

    #[test]
    fn test_trend_and_moving_average() {
        let json = analyze_consumption_trend(
            r#"[{"date":"2024-01-01","quantity":20},{"date":"2024-02-01","quantity":10}]"#,
        )
        .unwrap();
        let trend: ConsumptionTrend = serde_json::from_str(&json).unwrap();
        assert_eq!(trend.trend, Trend::Decreasing);

        assert_eq!(moving_average(&[1.0, 2.0, 3.0, 4.0], 2), vec![1.5, 2.5, 3.5]);
    }

    #[test]
    fn test_decode_names_the_bad_input() {
        let err = decode::<Vec<ValuedItem>>("{", "items").unwrap_err();
        assert!(err.starts_with("Invalid items JSON:"));

        let err = decode::<Vec<ConsumptionPoint>>(r#"[{"date":"yesterday"}]"#, "history").unwrap_err();
        assert!(err.starts_with("Invalid history JSON:"));
    }

    #[test]
    fn test_confidence_can_fall_below_the_variability_floor() {
        let confidence = confidence_level(3, 1.0);
        assert!((confidence - 0.056).abs() < 1e-9);
        assert!(confidence_level(1000, 0.0) <= 0.9);
    }
}
