use sea_orm::ConnectionTrait;
use tracing::info;

use crate::adapters::countries_sea::{self, CountryInsert, CountryPatch};
use crate::adapters::{states_sea, Page};
use crate::domain::{CountryCreate, CountryUpdate};
use crate::entities::{Country, State};
use crate::errors::domain::{DomainError, Entity, ValidationKind};
use crate::services::outbox::{self, EventContext, EventType};

pub const HAS_STATES: &str = "Cannot delete country with existing states";

pub async fn get_country<C: ConnectionTrait>(conn: &C, id: i32) -> Result<Country, DomainError> {
    countries_sea::find_by_id(conn, id)
        .await?
        .ok_or_else(|| DomainError::entity_not_found(Entity::Country, id))
}

pub async fn list_countries<C: ConnectionTrait>(
    conn: &C,
    page: Page,
) -> Result<Vec<Country>, DomainError> {
    Ok(countries_sea::list(conn, page).await?)
}

/// States of one country; the country itself must exist.
pub async fn list_country_states<C: ConnectionTrait>(
    conn: &C,
    country_id: i32,
    page: Page,
) -> Result<Vec<State>, DomainError> {
    get_country(conn, country_id).await?;
    Ok(states_sea::list(conn, page, Some(country_id)).await?)
}

async fn ensure_code_free<C: ConnectionTrait>(
    conn: &C,
    code: &str,
    exclude_id: Option<i32>,
) -> Result<(), DomainError> {
    if countries_sea::find_by_code(conn, code, exclude_id)
        .await?
        .is_some()
    {
        return Err(DomainError::duplicate_code(Entity::Country, code));
    }
    Ok(())
}

pub async fn create_country<C: ConnectionTrait>(
    conn: &C,
    req: CountryCreate,
    ctx: EventContext,
) -> Result<Country, DomainError> {
    let req = req.normalize()?;
    ensure_code_free(conn, &req.code, None).await?;

    let ctx = ctx.with_body(outbox::body(&req)?);
    let country = countries_sea::create(conn, CountryInsert::new(req.name, req.code)).await?;
    outbox::record(conn, EventType::Create, Entity::Country, country.id, &ctx).await?;

    info!(country_id = country.id, code = %country.code, "Country created");
    Ok(country)
}

pub async fn update_country<C: ConnectionTrait>(
    conn: &C,
    id: i32,
    req: CountryUpdate,
    ctx: EventContext,
) -> Result<Country, DomainError> {
    let req = req.normalize()?;
    let current = get_country(conn, id).await?;

    if let Some(code) = req.code.as_deref() {
        if code != current.code {
            ensure_code_free(conn, code, Some(id)).await?;
        }
    }

    let ctx = ctx.with_body(outbox::body(&req)?);
    let patch = CountryPatch {
        name: req.name,
        code: req.code,
    };
    let country = countries_sea::update(conn, current, patch).await?;
    outbox::record(conn, EventType::Update, Entity::Country, country.id, &ctx).await?;

    info!(country_id = country.id, "Country updated");
    Ok(country)
}

/// Deletes and returns the row. Fails with a foreign key validation error
/// while states still reference it.
pub async fn delete_country<C: ConnectionTrait>(
    conn: &C,
    id: i32,
    ctx: EventContext,
) -> Result<Country, DomainError> {
    let country = get_country(conn, id).await?;

    outbox::record(conn, EventType::Delete, Entity::Country, country.id, &ctx).await?;
    countries_sea::delete(conn, id)
        .await
        .map_err(|e| match DomainError::from(e) {
            DomainError::Validation(ValidationKind::ForeignKey, _) => {
                DomainError::validation(ValidationKind::ForeignKey, HAS_STATES)
            }
            other => other,
        })?;

    info!(country_id = id, "Country deleted");
    Ok(country)
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult, RuntimeErr};

    use super::*;
    use crate::entities::{countries, states};
    use crate::errors::domain::{ConflictKind, NotFoundKind};

    fn japan() -> countries::Model {
        countries::Model {
            id: 1,
            name: "Japan".into(),
            code: "JP".into(),
        }
    }

    fn ok_exec() -> MockExecResult {
        MockExecResult {
            last_insert_id: 1,
            rows_affected: 1,
        }
    }

    fn ctx() -> EventContext {
        EventContext::new("POST", "/countries/").with_status(201)
    }

    #[tokio::test]
    async fn create_inserts_country_and_event() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<countries::Model>::new()])
            .append_query_results([[japan()]])
            .append_exec_results([ok_exec()])
            .into_connection();

        let req = CountryCreate {
            name: "Japan".into(),
            code: "jp".into(),
        };
        let country = create_country(&db, req, ctx()).await.unwrap();
        assert_eq!(country, japan());

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("event_logs"));
        assert!(log.contains(r#"{\"name\":\"Japan\",\"code\":\"JP\"}"#));
    }

    #[tokio::test]
    async fn create_rejects_taken_code() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[japan()]])
            .into_connection();

        let req = CountryCreate {
            name: "Japan again".into(),
            code: "JP".into(),
        };
        let err = create_country(&db, req, ctx()).await.unwrap_err();
        assert_eq!(
            err,
            DomainError::conflict(
                ConflictKind::DuplicateCode(Entity::Country),
                "Country with code 'JP' already exists"
            )
        );
    }

    #[tokio::test]
    async fn create_validates_before_touching_db() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let req = CountryCreate {
            name: String::new(),
            code: "JP".into(),
        };
        let err = create_country(&db, req, ctx()).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(ValidationKind::Field, _)));
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn get_missing_country_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<countries::Model>::new()])
            .into_connection();

        let err = get_country(&db, 9).await.unwrap_err();
        assert_eq!(
            err,
            DomainError::not_found(
                NotFoundKind::Entity(Entity::Country),
                "Country with id 9 not found"
            )
        );
    }

    #[tokio::test]
    async fn update_with_same_code_skips_uniqueness_check() {
        let renamed = countries::Model {
            name: "Nippon".into(),
            ..japan()
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[japan()]])
            .append_query_results([[renamed.clone()]])
            .append_exec_results([ok_exec()])
            .into_connection();

        let req = CountryUpdate {
            name: Some("Nippon".into()),
            code: Some("jp".into()),
        };
        let country = update_country(&db, 1, req, EventContext::new("PUT", "/countries/1"))
            .await
            .unwrap();
        assert_eq!(country, renamed);
    }

    #[tokio::test]
    async fn update_event_records_only_set_fields() {
        let renamed = countries::Model {
            name: "Nippon".into(),
            ..japan()
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[japan()]])
            .append_query_results([[renamed]])
            .append_exec_results([ok_exec()])
            .into_connection();

        let req = CountryUpdate {
            name: Some("Nippon".into()),
            code: None,
        };
        let ctx = EventContext::new("PUT", "/countries/1").with_status(200);
        update_country(&db, 1, req, ctx).await.unwrap();

        let log = db.into_transaction_log();
        let event = format!("{:?}", log[2]);
        assert!(event.contains("event_logs"));
        assert!(event.contains(r#"String(Some("UPDATE"))"#));
        assert!(event.contains(r#"{\"name\":\"Nippon\"}"#));
        assert!(!event.contains("code\\\":"));
        assert!(event.contains("Int(Some(200))"));
        assert!(event.contains(r#"String(Some("completed"))"#));
    }

    #[tokio::test]
    async fn delete_records_event_before_removing_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[japan()]])
            .append_exec_results([ok_exec(), ok_exec()])
            .into_connection();

        let ctx = EventContext::new("DELETE", "/countries/1")
            .with_ip("198.51.100.7")
            .with_status(200);
        delete_country(&db, 1, ctx).await.unwrap();

        let log = db.into_transaction_log();
        assert_eq!(log.len(), 3);
        let event = format!("{:?}", log[1]);
        assert!(event.contains("event_logs"));
        assert!(event.contains(r#"String(Some("DELETE"))"#));
        assert!(event.contains(r#"String(Some("country"))"#));
        assert!(event.contains(r#"String(Some("198.51.100.7"))"#));
        assert!(event.contains(r#"String(Some("completed"))"#));
        assert!(format!("{:?}", log[2]).contains(r#"DELETE FROM \"main\".\"countries\""#));
    }

    #[tokio::test]
    async fn delete_with_states_maps_to_restrict_message() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[japan()]])
            .append_exec_results([ok_exec()])
            .append_exec_errors([DbErr::Exec(RuntimeErr::Internal(
                "update or delete on table \"countries\" violates foreign key constraint \"fk_states_country_id\" on table \"states\"".into(),
            ))])
            .into_connection();

        let err = delete_country(&db, 1, EventContext::new("DELETE", "/countries/1"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::validation(ValidationKind::ForeignKey, HAS_STATES)
        );
    }

    #[tokio::test]
    async fn delete_returns_removed_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[japan()]])
            .append_exec_results([ok_exec(), ok_exec()])
            .into_connection();

        let country = delete_country(&db, 1, EventContext::new("DELETE", "/countries/1"))
            .await
            .unwrap();
        assert_eq!(country.code, "JP");
    }

    #[tokio::test]
    async fn states_of_missing_country_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<countries::Model>::new()])
            .into_connection();

        let err = list_country_states(&db, 5, Page::default()).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::NotFound(NotFoundKind::Entity(Entity::Country), _)
        ));
    }

    #[tokio::test]
    async fn states_of_country_are_listed() {
        let tokyo = states::Model {
            id: 3,
            country_id: 1,
            name: "Tokyo".into(),
            code: "JP-13".into(),
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[japan()]])
            .append_query_results([[tokyo.clone()]])
            .into_connection();

        let states = list_country_states(&db, 1, Page::default()).await.unwrap();
        assert_eq!(states, vec![tokyo]);
    }
}
