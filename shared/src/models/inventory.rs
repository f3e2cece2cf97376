//! Inventory analytics models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ItemType;
use crate::profit::CalculationError;

/// Current stock of an inventory item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockLevel {
    pub item_type: ItemType,
    pub item_id: Uuid,
    pub code: String,
    pub name: String,
    pub quantity: Decimal,
    pub unit_cost: Decimal,
}

impl StockLevel {
    /// Stock value, `quantity * unit_cost`
    pub fn value(&self) -> Result<Decimal, CalculationError> {
        self.quantity
            .checked_mul(self.unit_cost)
            .ok_or(CalculationError::Overflow("stock value"))
    }
}

/// Anything with a value that can be ranked for ABC classification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValuedItem {
    pub id: String,
    pub value: f64,
}

/// ABC tier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AbcClass {
    /// Top 80% of cumulative value
    A,
    /// Next 15%
    B,
    /// Remainder
    C,
}

impl std::fmt::Display for AbcClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AbcClass::A => write!(f, "A"),
            AbcClass::B => write!(f, "B"),
            AbcClass::C => write!(f, "C"),
        }
    }
}

/// A classified item, in descending-value order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AbcItem {
    pub id: String,
    pub value: f64,
    /// Fraction of the total value (0..=1)
    pub share: f64,
    pub cumulative_share: f64,
    pub class: AbcClass,
}

/// Direction of consumption over time
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    Flat,
}

/// A dated consumption observation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConsumptionPoint {
    pub date: NaiveDate,
    pub quantity: f64,
}

/// Outcome of comparing earlier and later consumption
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ConsumptionTrend {
    pub change_rate: f64,
    pub trend: Trend,
}

impl Default for ConsumptionTrend {
    fn default() -> Self {
        Self {
            change_rate: 0.0,
            trend: Trend::Flat,
        }
    }
}

/// Replenishment parameters for a material
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisParams {
    pub lead_time_days: f64,
    /// Fixed cost of placing one order
    pub order_cost: f64,
    /// Cost of holding one unit for a year
    pub holding_cost: f64,
    /// Days of demand kept as safety stock
    pub safety_days: f64,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            lead_time_days: 7.0,
            order_cost: 50.0,
            holding_cost: 2.0,
            safety_days: 3.0,
        }
    }
}

/// Replenishment recommendation for one material
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryRecommendation {
    pub stock: f64,
    pub daily_demand: f64,
    pub annual_demand: f64,
    pub remaining_days: f64,
    pub safety_stock: f64,
    pub economic_order_quantity: f64,
    pub reorder_point: f64,
    pub optimal_level: f64,
    pub trend: ConsumptionTrend,
    pub confidence: f64,
    pub needs_reorder: bool,
    pub suggested_order_quantity: f64,
}
