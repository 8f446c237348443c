use sea_orm::ConnectionTrait;
use tracing::info;

use crate::adapters::cities_sea::{self, CityInsert, CityPatch, CityScope};
use crate::adapters::{states_sea, Page};
use crate::domain::{CityCreate, CityUpdate};
use crate::entities::City;
use crate::errors::domain::{DomainError, Entity};
use crate::services::outbox::{self, EventContext, EventType};

/// Inactive cities are only visible with `include_inactive`.
pub async fn get_city<C: ConnectionTrait>(
    conn: &C,
    id: i32,
    include_inactive: bool,
) -> Result<City, DomainError> {
    let scope = CityScope {
        include_inactive,
        state_id: None,
    };
    cities_sea::find_by_id(conn, id, scope)
        .await?
        .ok_or_else(|| DomainError::entity_not_found(Entity::City, id))
}

pub async fn list_cities<C: ConnectionTrait>(
    conn: &C,
    page: Page,
    scope: CityScope,
) -> Result<Vec<City>, DomainError> {
    Ok(cities_sea::list(conn, page, scope).await?)
}

async fn ensure_active_code_free<C: ConnectionTrait>(
    conn: &C,
    code: &str,
    exclude_id: Option<i32>,
) -> Result<(), DomainError> {
    if cities_sea::find_active_by_code(conn, code, exclude_id)
        .await?
        .is_some()
    {
        return Err(DomainError::duplicate_code(Entity::City, code));
    }
    Ok(())
}

pub async fn create_city<C: ConnectionTrait>(
    conn: &C,
    req: CityCreate,
    ctx: EventContext,
) -> Result<City, DomainError> {
    let req = req.normalize()?;
    if states_sea::find_by_id(conn, req.state_id).await?.is_none() {
        return Err(DomainError::entity_not_found(Entity::State, req.state_id));
    }
    ensure_active_code_free(conn, &req.code, None).await?;

    let ctx = ctx.with_body(outbox::body(&req)?);
    let city = cities_sea::create(
        conn,
        CityInsert {
            state_id: req.state_id,
            name: req.name,
            code: req.code,
            is_active: req.is_active,
        },
    )
    .await?;
    outbox::record(conn, EventType::Create, Entity::City, city.id, &ctx).await?;

    info!(city_id = city.id, state_id = city.state_id, code = %city.code, "City created");
    Ok(city)
}

pub async fn update_city<C: ConnectionTrait>(
    conn: &C,
    id: i32,
    req: CityUpdate,
    include_inactive: bool,
    ctx: EventContext,
) -> Result<City, DomainError> {
    let req = req.normalize()?;
    let current = get_city(conn, id, include_inactive).await?;

    // Reactivation claims the code among active rows as much as a rename does.
    let code = req.code.as_deref().unwrap_or(&current.code);
    let active = req.is_active.unwrap_or(current.is_active);
    if active && (code != current.code || !current.is_active) {
        ensure_active_code_free(conn, code, Some(id)).await?;
    }

    let ctx = ctx.with_body(outbox::body(&req)?);
    let patch = CityPatch {
        name: req.name,
        code: req.code,
        is_active: req.is_active,
    };
    let city = cities_sea::update(conn, current, patch).await?;
    outbox::record(conn, EventType::Update, Entity::City, city.id, &ctx).await?;

    info!(city_id = city.id, is_active = city.is_active, "City updated");
    Ok(city)
}

pub async fn delete_city<C: ConnectionTrait>(
    conn: &C,
    id: i32,
    include_inactive: bool,
    ctx: EventContext,
) -> Result<City, DomainError> {
    let city = get_city(conn, id, include_inactive).await?;

    outbox::record(conn, EventType::Delete, Entity::City, city.id, &ctx).await?;
    cities_sea::delete(conn, id).await?;

    info!(city_id = id, "City deleted");
    Ok(city)
}
