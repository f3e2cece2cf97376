//! Production and packaging usage models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category of a consumed material
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum MaterialCategory {
    /// Consumed by production orders
    RawMaterial,
    /// Consumed by packaging orders
    Packaging,
}

impl MaterialCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialCategory::RawMaterial => "raw-material",
            MaterialCategory::Packaging => "packaging",
        }
    }
}

impl std::fmt::Display for MaterialCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MaterialCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raw-material" => Ok(MaterialCategory::RawMaterial),
            "packaging" => Ok(MaterialCategory::Packaging),
            other => Err(format!("unknown material category: {}", other)),
        }
    }
}

/// One ingredient or material line of a production/packaging order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UsageRow {
    pub code: String,
    pub name: String,
    pub required_quantity: Decimal,
    pub parent_order_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Order metadata used to date usage rows
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderMeta {
    pub id: Uuid,
    pub date: NaiveDate,
    pub status: String,
}

/// Monthly consumption of one material
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaterialConsumption {
    /// Materials are identified by their code
    pub material_id: String,
    pub material_code: String,
    pub material_name: String,
    pub category: MaterialCategory,
    /// `yyyy-MM`
    pub month: String,
    pub consumption_qty: Decimal,
}

/// Consumption of one material across a whole window
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaterialConsumptionSummary {
    pub material_id: String,
    pub material_name: String,
    pub category: MaterialCategory,
    pub total_qty: Decimal,
    pub months_active: u32,
    pub average_monthly_qty: Decimal,
}
