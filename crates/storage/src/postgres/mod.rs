//! PostgreSQL-backed repositories.
//!
//! One [`PostgresStore`] implements all four repository traits over a
//! shared connection pool.

mod bookings;
mod events;
mod users;
mod venues;

use sqlx::PgPool;

use crate::{Result, StoreError};

/// PostgreSQL-backed repository implementation.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new PostgreSQL store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }
}

/// Maps an UPDATE outcome to `NotFound` when no row matched.
fn ensure_updated(rows_affected: u64, entity: &'static str, id: i64) -> Result<()> {
    if rows_affected == 0 {
        return Err(StoreError::NotFound { entity, id });
    }
    Ok(())
}
