//! HTTP handlers for profit calculation endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{InvoiceLineItem, ProfitCalculationResult};
use crate::services::{ProfitService, ReportingService};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CalculateProfitInput {
    pub items: Vec<InvoiceLineItem>,
}

/// Calculate profit for ad-hoc line items, e.g. an invoice being drafted
pub async fn calculate_profit(
    State(state): State<AppState>,
    Json(input): Json<CalculateProfitInput>,
) -> AppResult<Json<ProfitCalculationResult>> {
    shared::validate_line_items(&input.items).map_err(|msg| AppError::validation("items", msg))?;

    let service = ProfitService::new(state.store());
    let result = service.calculate(&input.items).await;
    Ok(Json(result))
}

/// Profit of a stored invoice
pub async fn get_invoice_profit(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
) -> AppResult<Json<ProfitCalculationResult>> {
    let service = ReportingService::new(state.store());
    let result = service.invoice_profit(invoice_id).await?;
    Ok(Json(result))
}
