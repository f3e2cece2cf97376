//! Inventory analytics service
//!
//! Combines stock levels with consumption history to classify inventory
//! value and recommend replenishment.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::models::{
    AbcItem, AnalysisParams, ConsumptionPoint, DateRange, InventoryRecommendation,
    MaterialCategory, StockLevel, ValuedItem,
};
use crate::services::consumption::{ConsumptionService, UsageSource};

/// Source of current stock levels
#[async_trait]
pub trait StockSource: Send + Sync {
    /// Every stocked item across all inventory tables
    async fn stock_levels(&self) -> AppResult<Vec<StockLevel>>;

    /// Stock of a raw or packaging material by code
    async fn material_stock(
        &self,
        category: MaterialCategory,
        code: &str,
    ) -> AppResult<Option<StockLevel>>;
}

/// Replenishment analysis of one material
#[derive(Debug, Serialize)]
pub struct MaterialRecommendation {
    pub material_code: String,
    pub material_name: String,
    pub category: MaterialCategory,
    pub history: Vec<ConsumptionPoint>,
    pub recommendation: InventoryRecommendation,
}

/// Inventory analytics over stock and usage sources
#[derive(Clone)]
pub struct InventoryAnalyticsService<S> {
    source: S,
    params: AnalysisParams,
}

impl<S> InventoryAnalyticsService<S>
where
    S: StockSource + UsageSource + Clone,
{
    pub fn new(source: S, params: AnalysisParams) -> Self {
        Self { source, params }
    }

    /// ABC classification of all stock by `quantity * unit_cost`
    pub async fn abc_classification(&self) -> AppResult<Vec<AbcItem>> {
        let levels = self.source.stock_levels().await?;

        let valued = levels
            .iter()
            .map(|level| {
                Ok(ValuedItem {
                    id: format!("{}:{}", level.item_type, level.code),
                    value: level.value()?.to_f64().unwrap_or(0.0),
                })
            })
            .collect::<AppResult<Vec<ValuedItem>>>()?;

        Ok(shared::classify_abc(&valued))
    }

    /// Replenishment recommendation for a material from its trailing usage
    pub async fn material_recommendation(
        &self,
        category: MaterialCategory,
        code: &str,
        months_back: u32,
        today: NaiveDate,
    ) -> AppResult<MaterialRecommendation> {
        let stock = self
            .source
            .material_stock(category, code)
            .await?
            .ok_or_else(|| AppError::NotFound("Material".to_string()))?;

        let records = ConsumptionService::new(self.source.clone())
            .monthly_consumption(months_back, today)
            .await?;

        let months = shared::target_months(today, months_back);
        let history = shared::monthly_history(&records, &stock.code, &months)?;

        let window_start = months
            .first()
            .and_then(|m| shared::parse_month_key(m))
            .unwrap_or(today);
        let window_days = DateRange::new(window_start, today).days() as f64;

        let recommendation = shared::recommend(
            stock.quantity.to_f64().unwrap_or(0.0),
            &history,
            window_days,
            &self.params,
        );

        if recommendation.needs_reorder {
            tracing::info!(
                material = %stock.code,
                stock = recommendation.stock,
                reorder_point = recommendation.reorder_point,
                "Material at or below reorder point"
            );
        }

        Ok(MaterialRecommendation {
            material_code: stock.code,
            material_name: stock.name,
            category,
            history,
            recommendation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AbcClass, ItemType, OrderMeta, UsageRow};
    use crate::services::consumption::tests::{date, usage, FixtureSource};
    use rust_decimal::Decimal;
    use std::sync::Arc;
    use uuid::Uuid;

    #[derive(Clone, Default)]
    struct FakeFactory {
        usage: FixtureSource,
        stock: Arc<Vec<StockLevel>>,
    }

    #[async_trait]
    impl StockSource for FakeFactory {
        async fn stock_levels(&self) -> AppResult<Vec<StockLevel>> {
            Ok(self.stock.as_ref().clone())
        }

        async fn material_stock(
            &self,
            category: MaterialCategory,
            code: &str,
        ) -> AppResult<Option<StockLevel>> {
            let item_type = match category {
                MaterialCategory::RawMaterial => ItemType::RawMaterials,
                MaterialCategory::Packaging => ItemType::PackagingMaterials,
            };
            Ok(self
                .stock
                .iter()
                .find(|s| s.item_type == item_type && s.code == code)
                .cloned())
        }
    }

    #[async_trait]
    impl UsageSource for FakeFactory {
        async fn production_usage(&self) -> AppResult<Vec<UsageRow>> {
            self.usage.production_usage().await
        }
        async fn packaging_usage(&self) -> AppResult<Vec<UsageRow>> {
            self.usage.packaging_usage().await
        }
        async fn production_orders(&self) -> AppResult<Vec<OrderMeta>> {
            self.usage.production_orders().await
        }
        async fn packaging_orders(&self) -> AppResult<Vec<OrderMeta>> {
            self.usage.packaging_orders().await
        }
    }

    fn stock(item_type: ItemType, code: &str, quantity: i64, unit_cost: i64) -> StockLevel {
        StockLevel {
            item_type,
            item_id: Uuid::new_v4(),
            code: code.to_string(),
            name: format!("{} name", code),
            quantity: Decimal::from(quantity),
            unit_cost: Decimal::from(unit_cost),
        }
    }

    #[tokio::test]
    async fn test_abc_over_stock_value() {
        let factory = FakeFactory {
            stock: Arc::new(vec![
                stock(ItemType::RawMaterials, "RM-1", 10, 5),
                stock(ItemType::FinishedProducts, "FP-1", 80, 10),
                stock(ItemType::PackagingMaterials, "PK-1", 15, 10),
            ]),
            ..FakeFactory::default()
        };

        let service = InventoryAnalyticsService::new(factory, AnalysisParams::default());
        let classes = service.abc_classification().await.unwrap();

        assert_eq!(classes[0].id, "finished_products:FP-1");
        assert_eq!(classes[0].class, AbcClass::A);
        assert_eq!(classes[1].class, AbcClass::B);
        assert_eq!(classes[2].class, AbcClass::C);
    }

    #[tokio::test]
    async fn test_overflowing_stock_value_is_calculation_error() {
        let mut huge = stock(ItemType::RawMaterials, "RM-1", 1, 2);
        huge.quantity = Decimal::MAX;
        let factory = FakeFactory {
            stock: Arc::new(vec![huge]),
            ..FakeFactory::default()
        };

        let service = InventoryAnalyticsService::new(factory, AnalysisParams::default());
        let result = service.abc_classification().await;

        assert!(matches!(result, Err(AppError::Calculation(_))));
    }

    #[tokio::test]
    async fn test_unknown_material_is_not_found() {
        let service = InventoryAnalyticsService::new(FakeFactory::default(), AnalysisParams::default());
        let result = service
            .material_recommendation(MaterialCategory::RawMaterial, "RM-404", 6, date(2024, 6, 30))
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_recommendation_uses_trailing_usage() {
        let factory = FakeFactory {
            usage: FixtureSource {
                production: Arc::new(vec![
                    usage("RM-1", 30, Uuid::new_v4(), date(2024, 4, 10)),
                    usage("RM-1", 30, Uuid::new_v4(), date(2024, 5, 10)),
                    usage("RM-1", 31, Uuid::new_v4(), date(2024, 6, 10)),
                ]),
                ..FixtureSource::default()
            },
            stock: Arc::new(vec![stock(ItemType::RawMaterials, "RM-1", 5, 2)]),
        };

        let service = InventoryAnalyticsService::new(factory, AnalysisParams::default());
        let result = service
            .material_recommendation(MaterialCategory::RawMaterial, "RM-1", 2, date(2024, 6, 30))
            .await
            .unwrap();

        // April 1st through June 30th
        assert_eq!(result.history.len(), 3);
        assert!((result.recommendation.daily_demand - 1.0).abs() < 1e-9);
        assert!(result.recommendation.needs_reorder);
        assert_eq!(result.material_name, "RM-1 name");
    }
}
