//! Commercial invoice tables

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use super::PgStore;
use crate::error::AppResult;
use crate::models::{DateRange, InvoiceHeader, InvoiceLineItem, ItemType};
use crate::services::reporting::InvoiceSource;

#[derive(Debug, FromRow)]
struct InvoiceRow {
    id: Uuid,
    invoice_number: String,
    party_name: String,
    date: NaiveDate,
}

#[derive(Debug, FromRow)]
struct LineItemRow {
    invoice_id: Uuid,
    item_id: Uuid,
    item_type: String,
    item_name: String,
    quantity: Decimal,
    unit_price: Decimal,
}

impl LineItemRow {
    /// Rows with an unknown item type are skipped
    fn into_line_item(self) -> Option<InvoiceLineItem> {
        match self.item_type.parse::<ItemType>() {
            Ok(item_type) => Some(InvoiceLineItem {
                item_id: self.item_id,
                item_type,
                item_name: self.item_name,
                quantity: self.quantity,
                unit_price: self.unit_price,
            }),
            Err(e) => {
                tracing::warn!(
                    invoice_id = %self.invoice_id,
                    item_id = %self.item_id,
                    "Skipping invoice line: {}",
                    e
                );
                None
            }
        }
    }
}

const LINE_ITEM_COLUMNS: &str = r#"
    SELECT invoice_id, item_id, item_type, item_name,
           COALESCE(quantity, 0) as quantity,
           COALESCE(unit_price, 0) as unit_price
    FROM sales_invoice_items
"#;

#[async_trait]
impl InvoiceSource for PgStore {
    async fn invoice_items(&self, invoice_id: Uuid) -> AppResult<Option<Vec<InvoiceLineItem>>> {
        let invoice_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM sales_invoices WHERE id = $1)",
        )
        .bind(invoice_id)
        .fetch_one(&self.db)
        .await?;

        if !invoice_exists {
            return Ok(None);
        }

        let query = format!("{} WHERE invoice_id = $1 ORDER BY created_at", LINE_ITEM_COLUMNS);
        let rows = sqlx::query_as::<_, LineItemRow>(&query)
            .bind(invoice_id)
            .fetch_all(&self.db)
            .await?;

        Ok(Some(
            rows.into_iter()
                .filter_map(LineItemRow::into_line_item)
                .collect(),
        ))
    }

    async fn invoices_between(
        &self,
        range: &DateRange,
    ) -> AppResult<Vec<(InvoiceHeader, Vec<InvoiceLineItem>)>> {
        let invoices = sqlx::query_as::<_, InvoiceRow>(
            r#"
            SELECT id, invoice_number, COALESCE(party_name, '') as party_name, date
            FROM sales_invoices
            WHERE date BETWEEN $1 AND $2
            ORDER BY date ASC, invoice_number ASC
            "#,
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.db)
        .await?;

        if invoices.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = invoices.iter().map(|i| i.id).collect();
        let query = format!("{} WHERE invoice_id = ANY($1) ORDER BY created_at", LINE_ITEM_COLUMNS);
        let rows = sqlx::query_as::<_, LineItemRow>(&query)
            .bind(ids)
            .fetch_all(&self.db)
            .await?;

        let mut items_by_invoice: HashMap<Uuid, Vec<InvoiceLineItem>> = HashMap::new();
        for row in rows {
            let invoice_id = row.invoice_id;
            if let Some(item) = row.into_line_item() {
                items_by_invoice.entry(invoice_id).or_default().push(item);
            }
        }

        Ok(invoices
            .into_iter()
            .map(|inv| {
                let items = items_by_invoice.remove(&inv.id).unwrap_or_default();
                let header = InvoiceHeader {
                    id: inv.id,
                    invoice_number: inv.invoice_number,
                    party_name: inv.party_name,
                    date: inv.date,
                };
                (header, items)
            })
            .collect())
    }
}
