//! Business logic services for the Factory Insights platform
//!
//! Each service is generic over the data-source traits it needs; handlers
//! wire them to [`crate::db::PgStore`].

pub mod analytics;
pub mod consumption;
pub mod profit;
pub mod reporting;

pub use analytics::InventoryAnalyticsService;
pub use consumption::ConsumptionService;
pub use profit::ProfitService;
pub use reporting::ReportingService;
