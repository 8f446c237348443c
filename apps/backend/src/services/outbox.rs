//! Transactional outbox: one `event_logs` row per change.

use std::fmt;

use sea_orm::ConnectionTrait;
use serde::Serialize;
use tracing::debug;

use crate::adapters::event_logs_sea::{self, EventLogInsert};
use crate::errors::domain::{DomainError, Entity, InfraErrorKind};

pub const PROCESSING_COMPLETED: &str = "completed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    Create,
    Update,
    Delete,
}

impl EventType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            EventType::Create => "CREATE",
            EventType::Update => "UPDATE",
            EventType::Delete => "DELETE",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request facts copied into each event row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventContext {
    pub method: String,
    pub path: String,
    pub body: Option<String>,
    pub user_id: Option<String>,
    pub ip_address: Option<String>,
    pub status_code: Option<i32>,
}

impl EventContext {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_ip(mut self, ip_address: impl Into<String>) -> Self {
        self.ip_address = Some(ip_address.into());
        self
    }

    pub fn with_status(mut self, status_code: u16) -> Self {
        self.status_code = Some(i32::from(status_code));
        self
    }

    pub fn with_body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }
}

/// JSON text stored in `request_body`.
pub fn body<T: Serialize>(value: &T) -> Result<String, DomainError> {
    serde_json::to_string(value).map_err(|e| {
        DomainError::infra(
            InfraErrorKind::Other("Serialize".into()),
            format!("failed to encode event body: {e}"),
        )
    })
}

pub async fn record<C: ConnectionTrait>(
    conn: &C,
    event: EventType,
    entity: Entity,
    entity_id: i32,
    ctx: &EventContext,
) -> Result<(), DomainError> {
    event_logs_sea::insert(
        conn,
        EventLogInsert {
            event_type: event.as_str().to_string(),
            entity_type: entity.as_str().to_string(),
            entity_id,
            request_method: ctx.method.clone(),
            request_path: ctx.path.clone(),
            request_body: ctx.body.clone(),
            user_id: ctx.user_id.clone(),
            ip_address: ctx.ip_address.clone(),
            status_code: ctx.status_code,
            processing_status: PROCESSING_COMPLETED.to_string(),
        },
    )
    .await?;

    debug!(event = %event, entity = entity.as_str(), entity_id, "outbox=recorded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    use super::*;

    #[test]
    fn event_types_are_uppercase() {
        assert_eq!(EventType::Create.to_string(), "CREATE");
        assert_eq!(EventType::Update.as_str(), "UPDATE");
        assert_eq!(EventType::Delete.as_str(), "DELETE");
    }

    #[test]
    fn context_builder_sets_fields() {
        let ctx = EventContext::new("POST", "/countries/")
            .with_ip("203.0.113.9")
            .with_status(201)
            .with_body("{}".into());
        assert_eq!(ctx.status_code, Some(201));
        assert_eq!(ctx.ip_address.as_deref(), Some("203.0.113.9"));
        assert_eq!(ctx.body.as_deref(), Some("{}"));
        assert_eq!(ctx.user_id, None);
    }

    #[tokio::test]
    async fn record_inserts_one_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 1,
                rows_affected: 1,
            }])
            .into_connection();

        let ctx = EventContext::new("DELETE", "/states/4").with_status(200);
        record(&db, EventType::Delete, Entity::State, 4, &ctx)
            .await
            .unwrap();

        let log = db.into_transaction_log();
        assert_eq!(log.len(), 1);
        let sql = format!("{:?}", log[0]);
        assert!(sql.contains("event_logs"));
        assert!(sql.contains("DELETE"));
    }
}
