//! Shared database configuration, bootstrap and migration infrastructure.
//! Used by the backend, the migration CLI and devtask.

pub mod admin;
pub mod config;
pub mod error;
pub mod infra;
pub mod provision;

pub use config::db::{database_url, DbProfile};
pub use config::provision::{ExistingPolicy, ProvisionSettings};
pub use error::DbInfraError;
pub use infra::db::core::{connect, connect_url, orchestrate_migration, PoolPurpose};
pub use provision::{run_plan, ProvisionError, ProvisionPlan, ProvisionReport, SeaOrmTarget};
