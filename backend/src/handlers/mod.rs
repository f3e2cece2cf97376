//! HTTP handlers for the Factory Insights API

pub mod analytics;
pub mod health;
pub mod profit;
pub mod reporting;

pub use analytics::{analyze_trend, get_abc_classification, get_material_recommendation};
pub use health::health_check;
pub use profit::{calculate_profit, get_invoice_profit};
pub use reporting::{get_consumption_report, get_consumption_summary, get_profit_report};
