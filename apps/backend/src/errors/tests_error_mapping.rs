// Unit tests for error mapping: pure domain logic without HTTP or database dependencies
use crate::errors::domain::{
    ConflictKind, DomainError, Entity, InfraErrorKind, NotFoundKind, ValidationKind,
};
use crate::{AppError, ErrorCode};

#[test]
fn maps_field_validation_to_422() {
    let app: AppError = DomainError::field("code must be exactly 2 characters").into();
    assert_eq!(app.code(), ErrorCode::ValidationError);
    assert_eq!(app.status().as_u16(), 422);
}

#[test]
fn maps_foreign_key_violation_to_400() {
    let de = DomainError::validation(
        ValidationKind::ForeignKey,
        "Cannot delete country with existing states",
    );
    let app: AppError = de.into();
    assert_eq!(app.code(), ErrorCode::FkViolation);
    assert_eq!(app.status().as_u16(), 400);
    assert_eq!(app.detail(), "Cannot delete country with existing states");
}

#[test]
fn maps_conflicts() {
    let app: AppError = DomainError::duplicate_code(Entity::Country, "JP").into();
    assert_eq!(app.code().as_str(), "DUPLICATE_COUNTRY_CODE");
    assert_eq!(app.status().as_u16(), 409);
    assert_eq!(app.detail(), "Country with code 'JP' already exists");

    let other = DomainError::conflict(
        ConflictKind::Other("Unique".to_string()),
        "Unique constraint violation",
    );
    let app: AppError = other.into();
    assert_eq!(app.code().as_str(), "CONFLICT");
    assert_eq!(app.status().as_u16(), 409);
}

#[test]
fn maps_not_found() {
    let app: AppError = DomainError::entity_not_found(Entity::State, 3).into();
    assert_eq!(app.code().as_str(), "STATE_NOT_FOUND");
    assert_eq!(app.status().as_u16(), 404);

    let app: AppError =
        DomainError::not_found(NotFoundKind::Other("Record".into()), "Record not found").into();
    assert_eq!(app.code().as_str(), "NOT_FOUND");
}

#[test]
fn maps_infra() {
    let app: AppError = DomainError::infra(InfraErrorKind::Timeout, "timeout").into();
    assert_eq!(app.code().as_str(), "DB_TIMEOUT");
    assert_eq!(app.status().as_u16(), 504);
    assert!(matches!(app, AppError::Timeout { .. }));

    let app: AppError = DomainError::infra(InfraErrorKind::DbUnavailable, "down").into();
    assert_eq!(app.code().as_str(), "DB_UNAVAILABLE");
    assert_eq!(app.status().as_u16(), 503);

    let app: AppError =
        DomainError::infra(InfraErrorKind::Other("DbErr".into()), "Database operation failed")
            .into();
    assert_eq!(app.code().as_str(), "DB_ERROR");
    assert_eq!(app.status().as_u16(), 500);
}
