pub mod core;
pub mod locking;

pub use core::{connect, connect_url, orchestrate_migration, orchestrate_migration_internal, PoolPurpose};
pub use locking::{Guard, MigrationLock, PgAdvisoryLock};
