use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement};
use tracing::warn;
use xxhash_rust::xxh3::xxh3_64;

use crate::error::DbInfraError;

pub fn pg_lock_id(key: &str) -> i64 {
    xxh3_64(key.as_bytes()) as i64
}

/// A held advisory lock, borrowing the admin session that took it.
pub struct Guard<'a> {
    admin_pool: &'a DatabaseConnection,
    lock_key: i64,
    released: bool,
}

impl Guard<'_> {
    pub fn lock_key(&self) -> i64 {
        self.lock_key
    }

    /// Release the lock on the admin session.
    pub async fn release(mut self) -> Result<(), DbInfraError> {
        if self.released {
            return Ok(());
        }

        let stmt = Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            "SELECT pg_advisory_unlock($1) AS unlocked",
            vec![self.lock_key.into()],
        );

        match self.admin_pool.query_one(stmt).await {
            Ok(Some(row)) => {
                let unlocked: bool = row.try_get("", "unlocked")?;
                if !unlocked {
                    warn!(
                        code = "PG_UNLOCK_FALSE",
                        lock_key = self.lock_key,
                        "Advisory lock unlock returned false"
                    );
                }
            }
            Ok(None) => {
                warn!(
                    lock_key = self.lock_key,
                    "No result from advisory lock unlock query"
                );
            }
            Err(e) => {
                warn!(
                    error = %e,
                    lock_key = self.lock_key,
                    "Failed to unlock advisory lock"
                );
            }
        }

        self.released = true;
        Ok(())
    }
}

/// Non-blocking lock acquisition for migration runs.
#[async_trait]
pub trait MigrationLock<'a> {
    /// Returns `Some(Guard)` if acquired, `None` if another session holds it.
    async fn try_acquire(&mut self) -> Result<Option<Guard<'a>>, DbInfraError>;
}

/// PostgreSQL session-level advisory lock.
pub struct PgAdvisoryLock<'a> {
    admin_pool: &'a DatabaseConnection,
    lock_key: i64,
}

impl<'a> PgAdvisoryLock<'a> {
    /// INVARIANT: the admin pool is configured with min=max=1 so every checkout
    /// reuses the session that holds the advisory lock.
    pub fn new(admin_pool: &'a DatabaseConnection, key: &str) -> Self {
        Self {
            admin_pool,
            lock_key: pg_lock_id(key),
        }
    }
}

#[async_trait]
impl<'a> MigrationLock<'a> for PgAdvisoryLock<'a> {
    async fn try_acquire(&mut self) -> Result<Option<Guard<'a>>, DbInfraError> {
        let lock_stmt = Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            "SELECT pg_try_advisory_lock($1) AS locked",
            vec![self.lock_key.into()],
        );

        let row = self
            .admin_pool
            .query_one(lock_stmt)
            .await?
            .ok_or_else(|| DbInfraError::migration("pg_try_advisory_lock returned no row"))?;
        let locked: bool = row.try_get("", "locked")?;

        if !locked {
            return Ok(None);
        }

        Ok(Some(Guard {
            admin_pool: self.admin_pool,
            lock_key: self.lock_key,
            released: false,
        }))
    }
}
