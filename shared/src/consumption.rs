//! Material consumption aggregation
//!
//! Groups production and packaging usage rows by material and month.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{
    ConsumptionPoint, MaterialCategory, MaterialConsumption, MaterialConsumptionSummary,
    OrderMeta, UsageRow,
};
use crate::profit::CalculationError;
use crate::types::{month_key, month_start, months_before, parse_month_key};

/// Default length of the trailing window, in months before the current one
pub const DEFAULT_MONTHS_BACK: u32 = 6;

/// Month keys from `months_back` months ago through the month of `today`,
/// oldest first.
pub fn target_months(today: NaiveDate, months_back: u32) -> Vec<String> {
    let current = month_start(today);
    (0..=months_back)
        .rev()
        .map(|offset| month_key(months_before(current, offset)))
        .collect()
}

/// Month a usage row belongs to: its parent order's date when the order is
/// known, otherwise the row's own creation time.
pub fn resolve_usage_month(row: &UsageRow, order_dates: &HashMap<Uuid, NaiveDate>) -> String {
    match order_dates.get(&row.parent_order_id) {
        Some(date) => month_key(*date),
        None => month_key(row.created_at.date_naive()),
    }
}

/// Accumulates usage rows into per-material monthly totals
#[derive(Debug, Default)]
pub struct ConsumptionAggregator {
    // keyed by (month, material_id) so output comes out month-ordered
    groups: BTreeMap<(String, String), MaterialConsumption>,
}

impl ConsumptionAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one collection of usage rows together with the orders they belong to
    pub fn add_usage(
        &mut self,
        category: MaterialCategory,
        rows: &[UsageRow],
        orders: &[OrderMeta],
    ) -> Result<&mut Self, CalculationError> {
        let order_dates: HashMap<Uuid, NaiveDate> =
            orders.iter().map(|o| (o.id, o.date)).collect();

        for row in rows {
            let month = resolve_usage_month(row, &order_dates);
            let record = self
                .groups
                .entry((month.clone(), row.code.clone()))
                .or_insert_with(|| MaterialConsumption {
                    material_id: row.code.clone(),
                    material_code: row.code.clone(),
                    material_name: row.name.clone(),
                    category,
                    month,
                    consumption_qty: Decimal::ZERO,
                });
            record.consumption_qty = record
                .consumption_qty
                .checked_add(row.required_quantity)
                .ok_or(CalculationError::Overflow("consumption_qty"))?;
        }

        Ok(self)
    }

    /// Records falling in `months`, ordered by month then material id
    pub fn finish(self, months: &[String]) -> Vec<MaterialConsumption> {
        let wanted: HashSet<&str> = months.iter().map(String::as_str).collect();
        self.groups
            .into_iter()
            .filter(|((month, _), _)| wanted.contains(month.as_str()))
            .map(|(_, record)| record)
            .collect()
    }
}

/// Monthly consumption over the trailing window ending at `today`
pub fn aggregate_consumption(
    production_usage: &[UsageRow],
    production_orders: &[OrderMeta],
    packaging_usage: &[UsageRow],
    packaging_orders: &[OrderMeta],
    today: NaiveDate,
    months_back: u32,
) -> Result<Vec<MaterialConsumption>, CalculationError> {
    let months = target_months(today, months_back);
    let mut aggregator = ConsumptionAggregator::new();
    aggregator
        .add_usage(MaterialCategory::RawMaterial, production_usage, production_orders)?
        .add_usage(MaterialCategory::Packaging, packaging_usage, packaging_orders)?;
    Ok(aggregator.finish(&months))
}

/// Fold monthly records into one summary per material, largest total first
pub fn summarize_by_material(
    records: &[MaterialConsumption],
) -> Result<Vec<MaterialConsumptionSummary>, CalculationError> {
    let mut by_material: BTreeMap<&str, MaterialConsumptionSummary> = BTreeMap::new();

    for record in records {
        let summary = by_material
            .entry(record.material_id.as_str())
            .or_insert_with(|| MaterialConsumptionSummary {
                material_id: record.material_id.clone(),
                material_name: record.material_name.clone(),
                category: record.category,
                total_qty: Decimal::ZERO,
                months_active: 0,
                average_monthly_qty: Decimal::ZERO,
            });
        summary.total_qty = summary
            .total_qty
            .checked_add(record.consumption_qty)
            .ok_or(CalculationError::Overflow("total_qty"))?;
        summary.months_active += 1;
    }

    let mut summaries: Vec<_> = by_material
        .into_values()
        .map(|mut s| {
            s.average_monthly_qty = s
                .total_qty
                .checked_div(Decimal::from(s.months_active))
                .unwrap_or(Decimal::ZERO);
            s
        })
        .collect();
    summaries.sort_by(|a, b| {
        b.total_qty
            .cmp(&a.total_qty)
            .then_with(|| a.material_id.cmp(&b.material_id))
    });
    Ok(summaries)
}

/// One point per month for a material, zero-filled for months without usage
pub fn monthly_history(
    records: &[MaterialConsumption],
    material_id: &str,
    months: &[String],
) -> Result<Vec<ConsumptionPoint>, CalculationError> {
    let mut history = Vec::with_capacity(months.len());

    for month in months {
        let Some(date) = parse_month_key(month) else {
            continue;
        };
        let quantity = records
            .iter()
            .filter(|r| r.material_id == material_id && &r.month == month)
            .try_fold(Decimal::ZERO, |acc, r| acc.checked_add(r.consumption_qty))
            .ok_or(CalculationError::Overflow("monthly quantity"))?;

        history.push(ConsumptionPoint {
            date,
            quantity: quantity.to_f64().unwrap_or(0.0),
        });
    }

    Ok(history)
}
