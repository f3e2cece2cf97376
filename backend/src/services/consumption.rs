//! Material consumption service

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::AppResult;
use crate::models::{MaterialConsumption, MaterialConsumptionSummary, OrderMeta, UsageRow};

/// Source of production/packaging usage rows and their orders
#[async_trait]
pub trait UsageSource: Send + Sync {
    async fn production_usage(&self) -> AppResult<Vec<UsageRow>>;
    async fn packaging_usage(&self) -> AppResult<Vec<UsageRow>>;
    async fn production_orders(&self) -> AppResult<Vec<OrderMeta>>;
    async fn packaging_orders(&self) -> AppResult<Vec<OrderMeta>>;
}

/// Groups material usage by month over a trailing window
#[derive(Clone)]
pub struct ConsumptionService<S> {
    source: S,
}

impl<S: UsageSource> ConsumptionService<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Monthly consumption per material for the `months_back + 1` months
    /// ending with the month of `today`.
    ///
    /// Any failed fetch aborts the whole computation.
    pub async fn monthly_consumption(
        &self,
        months_back: u32,
        today: NaiveDate,
    ) -> AppResult<Vec<MaterialConsumption>> {
        let (production_usage, packaging_usage, production_orders, packaging_orders) = tokio::try_join!(
            self.source.production_usage(),
            self.source.packaging_usage(),
            self.source.production_orders(),
            self.source.packaging_orders(),
        )?;

        tracing::debug!(
            production_rows = production_usage.len(),
            packaging_rows = packaging_usage.len(),
            months_back,
            "Aggregating material consumption"
        );

        Ok(shared::aggregate_consumption(
            &production_usage,
            &production_orders,
            &packaging_usage,
            &packaging_orders,
            today,
            months_back,
        )?)
    }

    /// Per-material totals over the same window
    pub async fn material_summary(
        &self,
        months_back: u32,
        today: NaiveDate,
    ) -> AppResult<Vec<MaterialConsumptionSummary>> {
        let records = self.monthly_consumption(months_back, today).await?;
        Ok(shared::summarize_by_material(&records)?)
    }
}
