//! Domain models for the Factory Insights service
//!
//! Re-exports models from the shared crate along with the types the backend
//! passes between layers

pub use shared::models::*;
pub use shared::{CalculationError, DateRange};
