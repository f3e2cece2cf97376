//! Commercial invoice and profit models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kinds of stock an invoice line can refer to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    RawMaterials,
    PackagingMaterials,
    SemiFinishedProducts,
    FinishedProducts,
}

impl ItemType {
    pub const ALL: [ItemType; 4] = [
        ItemType::RawMaterials,
        ItemType::PackagingMaterials,
        ItemType::SemiFinishedProducts,
        ItemType::FinishedProducts,
    ];

    /// Inventory table holding items of this type
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::RawMaterials => "raw_materials",
            ItemType::PackagingMaterials => "packaging_materials",
            ItemType::SemiFinishedProducts => "semi_finished_products",
            ItemType::FinishedProducts => "finished_products",
        }
    }
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ItemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ItemType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown item type: {}", s))
    }
}

/// A single line of a commercial invoice
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvoiceLineItem {
    pub item_id: Uuid,
    pub item_type: ItemType,
    pub item_name: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}

/// Invoice header used for grouping profit reports
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvoiceHeader {
    pub id: Uuid,
    pub invoice_number: String,
    /// Customer or supplier the invoice was issued to
    pub party_name: String,
    pub date: NaiveDate,
}

/// A line item with its resolved cost and profit figures
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfitLine {
    pub item_id: Uuid,
    pub item_type: ItemType,
    pub item_name: String,
    pub quantity: Decimal,
    pub cost_price: Decimal,
    pub unit_price: Decimal,
    pub total_cost: Decimal,
    pub total_price: Decimal,
    pub item_profit: Decimal,
    pub item_profit_margin: Decimal,
}

/// Result of a profit calculation over a set of line items
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProfitCalculationResult {
    pub total_cost: Decimal,
    pub total_price: Decimal,
    pub profit: Decimal,
    /// Percentage of `total_price`
    pub profit_margin: Decimal,
    pub items: Vec<ProfitLine>,
    /// Items whose unit cost could not be resolved and was taken as zero
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unresolved_costs: Vec<Uuid>,
}

impl ProfitCalculationResult {
    /// True for the zeroed result returned on empty input or failure
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
            && self.total_cost.is_zero()
            && self.total_price.is_zero()
            && self.profit.is_zero()
    }
}

/// How invoice profits are grouped in a report
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProfitGrouping {
    #[default]
    Month,
    Party,
}

/// Profit totals for one month or party
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PeriodProfit {
    pub key: String,
    pub invoice_count: u32,
    pub total_cost: Decimal,
    pub total_price: Decimal,
    pub profit: Decimal,
    pub profit_margin: Decimal,
}
