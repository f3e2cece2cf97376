//! Reporting handlers for profit and consumption reports

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::{DateRange, ProfitGrouping};
use crate::services::reporting::export_to_csv;
use crate::services::{ConsumptionService, ReportingService};
use crate::AppState;

/// Months covered by a profit report without an explicit start date
const DEFAULT_PROFIT_REPORT_MONTHS: u32 = 11;

#[derive(Deserialize)]
pub struct ProfitReportQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub group_by: Option<ProfitGrouping>,
    pub format: Option<String>, // "json" or "csv"
}

#[derive(Deserialize)]
pub struct ConsumptionQuery {
    pub months_back: Option<u32>,
    pub format: Option<String>,
}

/// Render rows as JSON, or as a CSV attachment when `format=csv`
fn render<T: Serialize>(data: Vec<T>, format: Option<&str>, filename: &str) -> AppResult<Response> {
    if format == Some("csv") {
        let csv = export_to_csv(&data)?;
        let disposition = format!("attachment; filename=\"{}\"", filename);
        Ok((
            [
                (header::CONTENT_TYPE, "text/csv".to_string()),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            csv,
        )
            .into_response())
    } else {
        Ok(Json(data).into_response())
    }
}

/// Resolve and validate the trailing window of a consumption report
fn months_back(state: &AppState, query: &ConsumptionQuery) -> AppResult<u32> {
    let reporting = &state.config.reporting;
    let months_back = query.months_back.unwrap_or(reporting.default_months_back);
    shared::validate_months_back(months_back, reporting.max_months_back)
        .map_err(|msg| AppError::validation("months_back", msg))?;
    Ok(months_back)
}

/// Get profit grouped by month or party
pub async fn get_profit_report(
    State(state): State<AppState>,
    Query(query): Query<ProfitReportQuery>,
) -> AppResult<Response> {
    let today = Utc::now().date_naive();
    let end = query.end_date.unwrap_or(today);
    let start = query.start_date.unwrap_or_else(|| {
        shared::months_before(shared::month_start(end), DEFAULT_PROFIT_REPORT_MONTHS)
    });
    let range = DateRange::new(start, end);
    shared::validate_date_range(&range).map_err(|msg| AppError::validation("start_date", msg))?;

    let service = ReportingService::new(state.store());
    let data = service
        .profit_report(&range, query.group_by.unwrap_or_default())
        .await?;

    render(data, query.format.as_deref(), "profit_report.csv")
}

/// Get monthly material consumption
pub async fn get_consumption_report(
    State(state): State<AppState>,
    Query(query): Query<ConsumptionQuery>,
) -> AppResult<Response> {
    let months_back = months_back(&state, &query)?;

    let service = ConsumptionService::new(state.store());
    let data = service
        .monthly_consumption(months_back, Utc::now().date_naive())
        .await?;

    render(data, query.format.as_deref(), "material_consumption.csv")
}

/// Get per-material consumption totals
pub async fn get_consumption_summary(
    State(state): State<AppState>,
    Query(query): Query<ConsumptionQuery>,
) -> AppResult<Response> {
    let months_back = months_back(&state, &query)?;

    let service = ConsumptionService::new(state.store());
    let data = service
        .material_summary(months_back, Utc::now().date_naive())
        .await?;

    render(data, query.format.as_deref(), "consumption_summary.csv")
}
