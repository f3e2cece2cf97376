//! Domain models for the Factory Insights platform

mod inventory;
mod invoice;
mod production;

pub use inventory::*;
pub use invoice::*;
pub use production::*;
