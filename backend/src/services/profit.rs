//! Profit calculation service
//!
//! Resolves unit costs through an injected [`CostLookup`] and hands the
//! arithmetic to the shared profit module.

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{CalculationError, InvoiceLineItem, ItemType, ProfitCalculationResult};

/// Source of unit costs for inventory items
#[async_trait]
pub trait CostLookup: Send + Sync {
    /// Unit cost of an item, `None` if the item does not exist or has no cost
    async fn unit_cost(&self, item_type: ItemType, item_id: Uuid) -> AppResult<Option<Decimal>>;
}

/// Profit calculator over invoice line items
#[derive(Clone)]
pub struct ProfitService<L> {
    lookup: L,
}

impl<L: CostLookup> ProfitService<L> {
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }

    /// Resolve each item's unit cost, one lookup at a time.
    ///
    /// Lookups never fail the calculation: errors, missing rows and negative
    /// costs are logged and left as `None`.
    async fn resolve_costs(&self, items: &[InvoiceLineItem]) -> Vec<Option<Decimal>> {
        let mut costs = Vec::with_capacity(items.len());

        for item in items {
            let cost = match self.lookup.unit_cost(item.item_type, item.item_id).await {
                Ok(Some(cost)) if cost >= Decimal::ZERO => Some(cost),
                Ok(Some(cost)) => {
                    tracing::warn!(
                        item_id = %item.item_id,
                        item_type = %item.item_type,
                        %cost,
                        "Negative unit cost, using zero"
                    );
                    None
                }
                Ok(None) => {
                    tracing::warn!(
                        item_id = %item.item_id,
                        item_type = %item.item_type,
                        "No unit cost found, using zero"
                    );
                    None
                }
                Err(e) => {
                    tracing::warn!(
                        item_id = %item.item_id,
                        item_type = %item.item_type,
                        error = %e,
                        "Cost lookup failed, using zero"
                    );
                    None
                }
            };
            costs.push(cost);
        }

        costs
    }

    /// Calculate profit, surfacing arithmetic failures
    pub async fn try_calculate(
        &self,
        items: &[InvoiceLineItem],
    ) -> Result<ProfitCalculationResult, CalculationError> {
        let costs = self.resolve_costs(items).await;
        let result = shared::calculate_profit(items, &costs)?;

        if !result.unresolved_costs.is_empty() {
            tracing::info!(
                unresolved = result.unresolved_costs.len(),
                item_count = items.len(),
                "Profit calculated with unresolved costs"
            );
        }

        Ok(result)
    }

    /// Calculate profit, falling back to a zeroed result on failure
    pub async fn calculate(&self, items: &[InvoiceLineItem]) -> ProfitCalculationResult {
        match self.try_calculate(items).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    item_count = items.len(),
                    "Profit calculation failed, returning zeroed result"
                );
                ProfitCalculationResult::default()
            }
        }
    }
}
