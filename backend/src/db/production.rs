//! Production and packaging order tables

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use super::PgStore;
use crate::error::AppResult;
use crate::models::{OrderMeta, UsageRow};
use crate::services::consumption::UsageSource;

#[derive(Debug, FromRow)]
struct UsageRecord {
    code: String,
    name: String,
    required_quantity: Decimal,
    parent_order_id: Uuid,
    created_at: DateTime<Utc>,
}

impl From<UsageRecord> for UsageRow {
    fn from(r: UsageRecord) -> Self {
        UsageRow {
            code: r.code,
            name: r.name,
            required_quantity: r.required_quantity,
            parent_order_id: r.parent_order_id,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct OrderRecord {
    id: Uuid,
    date: NaiveDate,
    status: String,
}

impl From<OrderRecord> for OrderMeta {
    fn from(r: OrderRecord) -> Self {
        OrderMeta {
            id: r.id,
            date: r.date,
            status: r.status,
        }
    }
}

impl PgStore {
    async fn fetch_usage(&self, query: &str) -> AppResult<Vec<UsageRow>> {
        let rows = sqlx::query_as::<_, UsageRecord>(query)
            .fetch_all(&self.db)
            .await?;
        Ok(rows.into_iter().map(UsageRow::from).collect())
    }

    async fn fetch_orders(&self, query: &str) -> AppResult<Vec<OrderMeta>> {
        let rows = sqlx::query_as::<_, OrderRecord>(query)
            .fetch_all(&self.db)
            .await?;
        Ok(rows.into_iter().map(OrderMeta::from).collect())
    }
}

#[async_trait]
impl UsageSource for PgStore {
    async fn production_usage(&self) -> AppResult<Vec<UsageRow>> {
        self.fetch_usage(
            r#"
            SELECT raw_material_code as code,
                   raw_material_name as name,
                   COALESCE(required_quantity, 0) as required_quantity,
                   production_order_id as parent_order_id,
                   created_at
            FROM production_order_ingredients
            "#,
        )
        .await
    }

    async fn packaging_usage(&self) -> AppResult<Vec<UsageRow>> {
        self.fetch_usage(
            r#"
            SELECT packaging_material_code as code,
                   packaging_material_name as name,
                   COALESCE(required_quantity, 0) as required_quantity,
                   packaging_order_id as parent_order_id,
                   created_at
            FROM packaging_order_materials
            "#,
        )
        .await
    }

    async fn production_orders(&self) -> AppResult<Vec<OrderMeta>> {
        self.fetch_orders("SELECT id, date, status FROM production_orders")
            .await
    }

    async fn packaging_orders(&self) -> AppResult<Vec<OrderMeta>> {
        self.fetch_orders("SELECT id, date, status FROM packaging_orders")
            .await
    }
}
