//! PostgreSQL access to the hosted factory database
//!
//! `PgStore` implements every data-source trait the services depend on.

mod inventory;
mod invoices;
mod production;

use sqlx::PgPool;

/// Read-only store over the factory tables
#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}
