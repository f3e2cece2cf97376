//! Inventory tables: unit costs and stock levels

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use super::PgStore;
use crate::error::AppResult;
use crate::models::{ItemType, MaterialCategory, StockLevel};
use crate::services::analytics::StockSource;
use crate::services::profit::CostLookup;

/// Row shared by all four inventory tables
#[derive(Debug, FromRow)]
struct StockRow {
    id: Uuid,
    code: String,
    name: String,
    quantity: Decimal,
    unit_cost: Option<Decimal>,
}

impl StockRow {
    fn into_stock_level(self, item_type: ItemType) -> StockLevel {
        StockLevel {
            item_type,
            item_id: self.id,
            code: self.code,
            name: self.name,
            quantity: self.quantity,
            unit_cost: self.unit_cost.unwrap_or(Decimal::ZERO),
        }
    }
}

fn material_table(category: MaterialCategory) -> ItemType {
    match category {
        MaterialCategory::RawMaterial => ItemType::RawMaterials,
        MaterialCategory::Packaging => ItemType::PackagingMaterials,
    }
}

#[async_trait]
impl CostLookup for PgStore {
    async fn unit_cost(&self, item_type: ItemType, item_id: Uuid) -> AppResult<Option<Decimal>> {
        // Table names come from a closed enum, never from input
        let query = format!("SELECT unit_cost FROM {} WHERE id = $1", item_type.as_str());

        let cost = sqlx::query_scalar::<_, Option<Decimal>>(&query)
            .bind(item_id)
            .fetch_optional(&self.db)
            .await?;

        Ok(cost.flatten())
    }
}

#[async_trait]
impl StockSource for PgStore {
    async fn stock_levels(&self) -> AppResult<Vec<StockLevel>> {
        let mut levels = Vec::new();

        for item_type in ItemType::ALL {
            let query = format!(
                r#"
                SELECT id, code, name, COALESCE(quantity, 0) as quantity, unit_cost
                FROM {}
                ORDER BY code
                "#,
                item_type.as_str()
            );

            let rows = sqlx::query_as::<_, StockRow>(&query)
                .fetch_all(&self.db)
                .await?;

            levels.extend(rows.into_iter().map(|r| r.into_stock_level(item_type)));
        }

        Ok(levels)
    }

    async fn material_stock(
        &self,
        category: MaterialCategory,
        code: &str,
    ) -> AppResult<Option<StockLevel>> {
        let item_type = material_table(category);
        let query = format!(
            r#"
            SELECT id, code, name, COALESCE(quantity, 0) as quantity, unit_cost
            FROM {}
            WHERE code = $1
            "#,
            item_type.as_str()
        );

        let row = sqlx::query_as::<_, StockRow>(&query)
            .bind(code)
            .fetch_optional(&self.db)
            .await?;

        Ok(row.map(|r| r.into_stock_level(item_type)))
    }
}
