//! Invoice profit calculations
//!
//! Costs are resolved by the caller and passed in alongside the line items,
//! so everything here is deterministic and free of I/O.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{
    InvoiceHeader, InvoiceLineItem, PeriodProfit, ProfitCalculationResult, ProfitGrouping,
    ProfitLine,
};
use crate::types::month_key;

/// Errors raised while reducing line items
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalculationError {
    #[error("Decimal overflow while computing {0}")]
    Overflow(&'static str),
}

/// Profit as a percentage of price; zero when there is no revenue
pub fn margin_percent(profit: Decimal, price: Decimal) -> Result<Decimal, CalculationError> {
    if price <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    profit
        .checked_div(price)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or(CalculationError::Overflow("margin"))
}

/// Compute the profit figures of one line at the given unit cost
pub fn profit_line(
    item: &InvoiceLineItem,
    cost_price: Decimal,
) -> Result<ProfitLine, CalculationError> {
    let total_cost = cost_price
        .checked_mul(item.quantity)
        .ok_or(CalculationError::Overflow("total_cost"))?;
    let total_price = item
        .unit_price
        .checked_mul(item.quantity)
        .ok_or(CalculationError::Overflow("total_price"))?;
    let item_profit = total_price
        .checked_sub(total_cost)
        .ok_or(CalculationError::Overflow("item_profit"))?;

    Ok(ProfitLine {
        item_id: item.item_id,
        item_type: item.item_type,
        item_name: item.item_name.clone(),
        quantity: item.quantity,
        cost_price,
        unit_price: item.unit_price,
        total_cost,
        total_price,
        item_profit,
        item_profit_margin: margin_percent(item_profit, total_price)?,
    })
}

/// Reduce computed lines into aggregate totals.
///
/// The margin is derived from the aggregated totals; per-line margins are not
/// additive.
pub fn summarize_lines(lines: Vec<ProfitLine>) -> Result<ProfitCalculationResult, CalculationError> {
    let mut total_cost = Decimal::ZERO;
    let mut total_price = Decimal::ZERO;

    for line in &lines {
        total_cost = total_cost
            .checked_add(line.total_cost)
            .ok_or(CalculationError::Overflow("total_cost"))?;
        total_price = total_price
            .checked_add(line.total_price)
            .ok_or(CalculationError::Overflow("total_price"))?;
    }

    let profit = total_price
        .checked_sub(total_cost)
        .ok_or(CalculationError::Overflow("profit"))?;

    Ok(ProfitCalculationResult {
        total_cost,
        total_price,
        profit,
        profit_margin: margin_percent(profit, total_price)?,
        items: lines,
        unresolved_costs: Vec::new(),
    })
}

/// Calculate profit for line items given their resolved unit costs.
///
/// `costs` is parallel to `items`. A missing entry, `None`, or a negative cost
/// counts as zero and the item id is reported in `unresolved_costs`.
pub fn calculate_profit(
    items: &[InvoiceLineItem],
    costs: &[Option<Decimal>],
) -> Result<ProfitCalculationResult, CalculationError> {
    let mut unresolved = Vec::new();
    let mut lines = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        let cost_price = match costs.get(index).copied().flatten() {
            Some(cost) if cost >= Decimal::ZERO => cost,
            _ => {
                unresolved.push(item.item_id);
                Decimal::ZERO
            }
        };
        lines.push(profit_line(item, cost_price)?);
    }

    let mut result = summarize_lines(lines)?;
    result.unresolved_costs = unresolved;
    Ok(result)
}

/// Group per-invoice results by month of the invoice date or by party.
///
/// Group margins are derived from the group totals. Output is sorted by key.
pub fn group_profit(
    invoices: &[(InvoiceHeader, ProfitCalculationResult)],
    grouping: ProfitGrouping,
) -> Result<Vec<PeriodProfit>, CalculationError> {
    let mut groups: BTreeMap<String, (u32, Decimal, Decimal)> = BTreeMap::new();

    for (header, result) in invoices {
        let key = match grouping {
            ProfitGrouping::Month => month_key(header.date),
            ProfitGrouping::Party => header.party_name.clone(),
        };
        let entry = groups.entry(key).or_insert((0, Decimal::ZERO, Decimal::ZERO));
        entry.0 += 1;
        entry.1 = entry
            .1
            .checked_add(result.total_cost)
            .ok_or(CalculationError::Overflow("total_cost"))?;
        entry.2 = entry
            .2
            .checked_add(result.total_price)
            .ok_or(CalculationError::Overflow("total_price"))?;
    }

    groups
        .into_iter()
        .map(|(key, (invoice_count, total_cost, total_price))| {
            let profit = total_price
                .checked_sub(total_cost)
                .ok_or(CalculationError::Overflow("profit"))?;
            Ok(PeriodProfit {
                key,
                invoice_count,
                total_cost,
                total_price,
                profit,
                profit_margin: margin_percent(profit, total_price)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemType;
    use chrono::NaiveDate;
    use std::str::FromStr;
    use uuid::Uuid;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn item(quantity: &str, unit_price: &str) -> InvoiceLineItem {
        InvoiceLineItem {
            item_id: Uuid::new_v4(),
            item_type: ItemType::FinishedProducts,
            item_name: "Tomato paste 400g".to_string(),
            quantity: dec(quantity),
            unit_price: dec(unit_price),
        }
    }

    #[test]
    fn test_profit_line_figures() {
        let line = profit_line(&item("10", "15"), dec("12")).unwrap();
        assert_eq!(line.total_cost, dec("120"));
        assert_eq!(line.total_price, dec("150"));
        assert_eq!(line.item_profit, dec("30"));
        assert_eq!(line.item_profit_margin, dec("20"));
    }

    #[test]
    fn test_zero_price_line_has_zero_margin() {
        let line = profit_line(&item("5", "0"), dec("3")).unwrap();
        assert_eq!(line.item_profit, dec("-15"));
        assert_eq!(line.item_profit_margin, Decimal::ZERO);
    }

    #[test]
    fn test_margin_derived_from_aggregates() {
        let items = vec![item("1", "100"), item("1", "10")];
        let costs = vec![Some(dec("50")), Some(dec("9"))];
        let result = calculate_profit(&items, &costs).unwrap();

        assert_eq!(result.total_cost, dec("59"));
        assert_eq!(result.total_price, dec("110"));
        assert_eq!(result.profit, dec("51"));
        // 51 / 110 * 100, not the mean of 50% and 10%
        assert_eq!(result.profit_margin, dec("51") / dec("110") * dec("100"));
    }

    #[test]
    fn test_unresolved_costs_default_to_zero() {
        let items = vec![item("2", "10"), item("3", "10"), item("1", "10")];
        let costs = vec![None, Some(dec("-4"))];
        let result = calculate_profit(&items, &costs).unwrap();

        assert_eq!(result.total_cost, Decimal::ZERO);
        assert_eq!(result.unresolved_costs.len(), 3);
        assert_eq!(result.unresolved_costs[0], items[0].item_id);
        assert!(result.items.iter().all(|l| l.cost_price.is_zero()));
    }

    #[test]
    fn test_empty_items_give_default() {
        let result = calculate_profit(&[], &[]).unwrap();
        assert!(result.is_empty());
        assert_eq!(result, ProfitCalculationResult::default());
    }

    #[test]
    fn test_overflow_is_reported() {
        let items = vec![item("79228162514264337593543950335", "2")];
        let costs = vec![Some(Decimal::ZERO)];
        assert_eq!(
            calculate_profit(&items, &costs),
            Err(CalculationError::Overflow("total_price"))
        );
    }

    #[test]
    fn test_group_profit_by_month_and_party() {
        let header = |party: &str, y: i32, m: u32| InvoiceHeader {
            id: Uuid::new_v4(),
            invoice_number: format!("INV-{}-{}", y, m),
            party_name: party.to_string(),
            date: NaiveDate::from_ymd_opt(y, m, 10).unwrap(),
        };
        let result = |cost: &str, price: &str| {
            calculate_profit(&[item("1", price)], &[Some(dec(cost))]).unwrap()
        };

        let invoices = vec![
            (header("Nile Foods", 2024, 1), result("40", "100")),
            (header("Delta Market", 2024, 1), result("10", "20")),
            (header("Nile Foods", 2024, 2), result("30", "50")),
        ];

        let by_month = group_profit(&invoices, ProfitGrouping::Month).unwrap();
        assert_eq!(by_month.len(), 2);
        assert_eq!(by_month[0].key, "2024-01");
        assert_eq!(by_month[0].invoice_count, 2);
        assert_eq!(by_month[0].total_price, dec("120"));
        assert_eq!(by_month[0].profit, dec("70"));

        let by_party = group_profit(&invoices, ProfitGrouping::Party).unwrap();
        assert_eq!(by_party[0].key, "Delta Market");
        assert_eq!(by_party[1].key, "Nile Foods");
        assert_eq!(by_party[1].total_cost, dec("70"));
        assert_eq!(by_party[1].profit_margin, dec("80") / dec("150") * dec("100"));
    }
}
