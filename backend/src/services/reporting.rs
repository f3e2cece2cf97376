//! Reporting service for invoice profit and data export

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    DateRange, InvoiceHeader, InvoiceLineItem, PeriodProfit, ProfitCalculationResult,
    ProfitGrouping,
};
use crate::services::profit::{CostLookup, ProfitService};

/// Source of stored commercial invoices
#[async_trait]
pub trait InvoiceSource: Send + Sync {
    /// Line items of an invoice, `None` if the invoice does not exist
    async fn invoice_items(&self, invoice_id: Uuid) -> AppResult<Option<Vec<InvoiceLineItem>>>;

    /// Invoices dated within the range, each with its line items
    async fn invoices_between(
        &self,
        range: &DateRange,
    ) -> AppResult<Vec<(InvoiceHeader, Vec<InvoiceLineItem>)>>;
}

/// Reporting service
#[derive(Clone)]
pub struct ReportingService<S> {
    source: S,
}

impl<S> ReportingService<S>
where
    S: InvoiceSource + CostLookup + Clone,
{
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Profit of a stored invoice
    pub async fn invoice_profit(&self, invoice_id: Uuid) -> AppResult<ProfitCalculationResult> {
        let items = self
            .source
            .invoice_items(invoice_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Invoice".to_string()))?;

        Ok(ProfitService::new(self.source.clone()).calculate(&items).await)
    }

    /// Profit of every invoice in the range, grouped by month or party.
    ///
    /// Unlike the single-invoice path, an arithmetic failure here fails the
    /// report instead of silently contributing zeros.
    pub async fn profit_report(
        &self,
        range: &DateRange,
        grouping: ProfitGrouping,
    ) -> AppResult<Vec<PeriodProfit>> {
        let invoices = self.source.invoices_between(range).await?;
        let calculator = ProfitService::new(self.source.clone());

        let mut results = Vec::with_capacity(invoices.len());
        for (header, items) in invoices {
            let result = calculator.try_calculate(&items).await?;
            results.push((header, result));
        }

        tracing::debug!(
            invoices = results.len(),
            start = %range.start,
            end = %range.end,
            "Building profit report"
        );

        Ok(shared::group_profit(&results, grouping)?)
    }
}

/// Export report rows as CSV
pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for record in data {
        wtr.serialize(record)
            .map_err(|e| AppError::Export(format!("CSV serialization error: {}", e)))?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| AppError::Export(format!("CSV writer error: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| AppError::Export(format!("UTF-8 conversion error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemType;
    use crate::services::profit::tests::MapLookup;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::collections::HashMap;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct FakeLedger {
        costs: MapLookup,
        invoices: Arc<Vec<(InvoiceHeader, Vec<InvoiceLineItem>)>>,
    }

    #[async_trait]
    impl CostLookup for FakeLedger {
        async fn unit_cost(
            &self,
            item_type: ItemType,
            item_id: Uuid,
        ) -> AppResult<Option<Decimal>> {
            self.costs.unit_cost(item_type, item_id).await
        }
    }

    #[async_trait]
    impl InvoiceSource for FakeLedger {
        async fn invoice_items(&self, invoice_id: Uuid) -> AppResult<Option<Vec<InvoiceLineItem>>> {
            Ok(self
                .invoices
                .iter()
                .find(|(h, _)| h.id == invoice_id)
                .map(|(_, items)| items.clone()))
        }

        async fn invoices_between(
            &self,
            range: &DateRange,
        ) -> AppResult<Vec<(InvoiceHeader, Vec<InvoiceLineItem>)>> {
            Ok(self
                .invoices
                .iter()
                .filter(|(h, _)| range.contains(h.date))
                .cloned()
                .collect())
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn invoice(party: &str, on: NaiveDate, unit_price: i64, item_id: Uuid) -> (InvoiceHeader, Vec<InvoiceLineItem>) {
        let header = InvoiceHeader {
            id: Uuid::new_v4(),
            invoice_number: format!("S-{}", on),
            party_name: party.to_string(),
            date: on,
        };
        let items = vec![InvoiceLineItem {
            item_id,
            item_type: ItemType::FinishedProducts,
            item_name: "Juice 1L".to_string(),
            quantity: Decimal::from(10),
            unit_price: Decimal::from(unit_price),
        }];
        (header, items)
    }

    fn ledger() -> FakeLedger {
        let product = Uuid::new_v4();
        FakeLedger {
            costs: MapLookup {
                costs: Arc::new(HashMap::from([(
                    (ItemType::FinishedProducts, product),
                    Decimal::from(6),
                )])),
                ..MapLookup::default()
            },
            invoices: Arc::new(vec![
                invoice("Cairo Retail", date(2024, 1, 5), 10, product),
                invoice("Alex Wholesale", date(2024, 1, 20), 8, product),
                invoice("Cairo Retail", date(2024, 2, 3), 12, product),
                invoice("Cairo Retail", date(2023, 12, 30), 50, product),
            ]),
        }
    }

    #[tokio::test]
    async fn test_invoice_profit() {
        let ledger = ledger();
        let invoice_id = ledger.invoices[0].0.id;

        let result = ReportingService::new(ledger)
            .invoice_profit(invoice_id)
            .await
            .unwrap();

        assert_eq!(result.total_cost, Decimal::from(60));
        assert_eq!(result.total_price, Decimal::from(100));
        assert_eq!(result.profit_margin, Decimal::from(40));
    }

    #[tokio::test]
    async fn test_missing_invoice_is_not_found() {
        let result = ReportingService::new(ledger())
            .invoice_profit(Uuid::new_v4())
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_profit_report_by_month() {
        let range = DateRange::new(date(2024, 1, 1), date(2024, 2, 29));
        let report = ReportingService::new(ledger())
            .profit_report(&range, ProfitGrouping::Month)
            .await
            .unwrap();

        assert_eq!(report.len(), 2);
        assert_eq!(report[0].key, "2024-01");
        assert_eq!(report[0].invoice_count, 2);
        assert_eq!(report[0].total_price, Decimal::from(180));
        assert_eq!(report[0].profit, Decimal::from(60));
        assert_eq!(report[1].profit, Decimal::from(60));
    }

    #[tokio::test]
    async fn test_profit_report_by_party() {
        let range = DateRange::new(date(2024, 1, 1), date(2024, 2, 29));
        let report = ReportingService::new(ledger())
            .profit_report(&range, ProfitGrouping::Party)
            .await
            .unwrap();

        let keys: Vec<&str> = report.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["Alex Wholesale", "Cairo Retail"]);
        assert_eq!(report[1].invoice_count, 2);
    }

    #[test]
    fn test_export_to_csv() {
        let rows = vec![PeriodProfit {
            key: "2024-01".to_string(),
            invoice_count: 2,
            total_cost: Decimal::from(120),
            total_price: Decimal::from(180),
            profit: Decimal::from(60),
            profit_margin: Decimal::new(3333, 2),
        }];

        let csv = export_to_csv(&rows).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("key,invoice_count,total_cost,total_price,profit,profit_margin")
        );
        assert_eq!(lines.next(), Some("2024-01,2,120,180,60,33.33"));
    }
}
