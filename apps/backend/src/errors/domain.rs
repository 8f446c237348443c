//! Domain-level error type used across services and adapters.
//!
//! This error type is HTTP- and DB-agnostic. Handlers return
//! `Result<T, crate::error::AppError>` and convert from `DomainError`
//! through `From<DomainError> for AppError`.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Infra error kinds to distinguish operational failures
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InfraErrorKind {
    Timeout,
    DbUnavailable,
    Other(String),
}

/// Which rule a validation failure broke
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    /// A request field is out of range or badly formatted
    Field,
    /// A row is still referenced (SQLSTATE 23503)
    ForeignKey,
    /// A check constraint rejected the row (SQLSTATE 23514)
    Check,
    Other(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Country,
    State,
    City,
}

impl Entity {
    /// Lowercase name stored in `event_logs.entity_type`.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Entity::Country => "country",
            Entity::State => "state",
            Entity::City => "city",
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Entity::Country => "Country",
            Entity::State => "State",
            Entity::City => "City",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Entity(Entity),
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    DuplicateCode(Entity),
    Other(String),
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Input validation or business rule violation
    Validation(ValidationKind, String),
    /// Semantic conflict
    Conflict(ConflictKind, String),
    /// Missing resource in domain terms
    NotFound(NotFoundKind, String),
    /// Infrastructure/operational failures
    Infra(InfraErrorKind, String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(kind, d) => write!(f, "validation error {kind:?}: {d}"),
            DomainError::Conflict(kind, d) => write!(f, "conflict {kind:?}: {d}"),
            DomainError::NotFound(kind, d) => write!(f, "not found {kind:?}: {d}"),
            DomainError::Infra(kind, d) => write!(f, "infra {kind:?}: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }
    pub fn field(detail: impl Into<String>) -> Self {
        Self::Validation(ValidationKind::Field, detail.into())
    }
    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }
    pub fn infra(kind: InfraErrorKind, detail: impl Into<String>) -> Self {
        Self::Infra(kind, detail.into())
    }

    /// `"<Entity> with id <id> not found"`
    pub fn entity_not_found(entity: Entity, id: i32) -> Self {
        Self::not_found(
            NotFoundKind::Entity(entity),
            format!("{} with id {id} not found", entity.label()),
        )
    }

    /// `"<Entity> with code '<code>' already exists"`; cities are scoped to
    /// active rows, so their message says "Active city".
    pub fn duplicate_code(entity: Entity, code: &str) -> Self {
        let label = match entity {
            Entity::City => "Active city",
            other => other.label(),
        };
        Self::conflict(
            ConflictKind::DuplicateCode(entity),
            format!("{label} with code '{code}' already exists"),
        )
    }
}
