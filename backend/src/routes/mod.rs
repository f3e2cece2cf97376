//! Route definitions for the Factory Insights API

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/profit", profit_routes())
        .nest("/invoices", invoice_routes())
        .nest("/reports", report_routes())
        .nest("/analytics", analytics_routes())
}

/// Profit calculation routes
fn profit_routes() -> Router<AppState> {
    Router::new().route("/calculate", post(handlers::calculate_profit))
}

/// Stored invoice routes
fn invoice_routes() -> Router<AppState> {
    Router::new().route("/:invoice_id/profit", get(handlers::get_invoice_profit))
}

/// Reporting routes (JSON or CSV)
fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/profit", get(handlers::get_profit_report))
        .route("/consumption", get(handlers::get_consumption_report))
        .route("/consumption/summary", get(handlers::get_consumption_summary))
}

/// Inventory analytics routes
fn analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/abc", get(handlers::get_abc_classification))
        .route(
            "/materials/:category/:code",
            get(handlers::get_material_recommendation),
        )
        .route("/trend", post(handlers::analyze_trend))
}
