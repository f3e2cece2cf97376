//! Shared types and computations for the Factory Insights platform
//!
//! This crate contains the domain models and the pure calculations shared
//! between the backend, the browser (via WASM), and the test suites.

pub mod analytics;
pub mod consumption;
pub mod models;
pub mod profit;
pub mod types;
pub mod validation;

pub use analytics::*;
pub use consumption::*;
pub use models::*;
pub use profit::*;
pub use types::*;
pub use validation::*;
