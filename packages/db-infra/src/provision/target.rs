use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, DbErr, Statement};
use tracing::{info, warn};

use crate::config::db::{sanitize_db_url, with_database};
use crate::error::DbInfraError;
use crate::infra::db::core::{connect_url, PoolPurpose};
use crate::provision::plan::{Probe, Step};

/// Something a provisioning plan can be executed against.
#[async_trait]
pub trait ProvisionTarget: Send {
    async fn apply(&mut self, step: &Step) -> Result<(), DbErr>;

    async fn exists(&mut self, probe: &Probe) -> Result<bool, DbErr>;
}

/// Postgres target over a single-session admin connection with SQL echo off.
pub struct SeaOrmTarget {
    base_url: String,
    conn: DatabaseConnection,
    current: String,
}

impl SeaOrmTarget {
    pub async fn connect(admin_url: &str) -> Result<Self, DbInfraError> {
        let conn = connect_url(admin_url, PoolPurpose::Provision).await?;
        let current = crate::config::db::database_name(admin_url)?;
        info!(url = %sanitize_db_url(admin_url), "provision=connected");
        Ok(Self {
            base_url: admin_url.to_string(),
            conn,
            current,
        })
    }

    pub fn current_database(&self) -> &str {
        &self.current
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    pub async fn close(self) {
        if let Err(e) = self.conn.close().await {
            warn!(error = %e, "failed to close provisioning connection");
        }
    }

    async fn reconnect(&mut self, database: &str) -> Result<(), DbErr> {
        let url = with_database(&self.base_url, database).map_err(|e| DbErr::Custom(e.to_string()))?;
        let next = connect_url(&url, PoolPurpose::Provision)
            .await
            .map_err(|e| DbErr::Custom(e.to_string()))?;

        let previous = std::mem::replace(&mut self.conn, next);
        if let Err(e) = previous.close().await {
            warn!(error = %e, "failed to close previous provisioning connection");
        }
        self.current = database.to_string();
        Ok(())
    }
}

#[async_trait]
impl ProvisionTarget for SeaOrmTarget {
    async fn apply(&mut self, step: &Step) -> Result<(), DbErr> {
        match step {
            Step::Connect { database } => self.reconnect(database.as_str()).await,
            _ => {
                if let Some(sql) = step.sql() {
                    self.conn.execute_unprepared(&sql).await?;
                }
                Ok(())
            }
        }
    }

    async fn exists(&mut self, probe: &Probe) -> Result<bool, DbErr> {
        let stmt = Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            probe.query(),
            vec![probe.name().as_str().into()],
        );
        Ok(self.conn.query_one(stmt).await?.is_some())
    }
}
