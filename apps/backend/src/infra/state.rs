use db_infra::{connect, orchestrate_migration, DbProfile, PoolPurpose};
use migration::MigrationCommand;
use tracing::info;

use crate::error::AppError;
use crate::state::app_state::AppState;

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    db_profile: Option<DbProfile>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self { db_profile: None }
    }

    pub fn with_db(mut self, profile: DbProfile) -> Self {
        self.db_profile = Some(profile);
        self
    }

    /// Runs `migrate up` before connecting the runtime pool.
    pub async fn build(self) -> Result<AppState, AppError> {
        let Some(profile) = self.db_profile else {
            return Ok(AppState::without_db());
        };

        // Fast path makes this a single query when the schema is current
        orchestrate_migration(profile, MigrationCommand::Up).await?;
        let conn = connect(profile, PoolPurpose::Runtime).await?;
        info!(profile = ?profile, "state=db_connected");
        Ok(AppState::new(conn))
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
