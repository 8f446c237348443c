use sea_orm::ConnectionTrait;
use tracing::info;

use crate::adapters::states_sea::{self, StateInsert, StatePatch};
use crate::adapters::{countries_sea, Page};
use crate::domain::{StateCreate, StateUpdate};
use crate::entities::State;
use crate::errors::domain::{DomainError, Entity, ValidationKind};
use crate::services::outbox::{self, EventContext, EventType};

pub const HAS_CITIES: &str = "Cannot delete state with existing cities";

pub async fn get_state<C: ConnectionTrait>(conn: &C, id: i32) -> Result<State, DomainError> {
    states_sea::find_by_id(conn, id)
        .await?
        .ok_or_else(|| DomainError::entity_not_found(Entity::State, id))
}

pub async fn list_states<C: ConnectionTrait>(
    conn: &C,
    page: Page,
    country_id: Option<i32>,
) -> Result<Vec<State>, DomainError> {
    Ok(states_sea::list(conn, page, country_id).await?)
}

async fn ensure_country_exists<C: ConnectionTrait>(
    conn: &C,
    country_id: i32,
) -> Result<(), DomainError> {
    match countries_sea::find_by_id(conn, country_id).await? {
        Some(_) => Ok(()),
        None => Err(DomainError::entity_not_found(Entity::Country, country_id)),
    }
}

async fn ensure_code_free<C: ConnectionTrait>(
    conn: &C,
    code: &str,
    exclude_id: Option<i32>,
) -> Result<(), DomainError> {
    if states_sea::find_by_code(conn, code, exclude_id).await?.is_some() {
        return Err(DomainError::duplicate_code(Entity::State, code));
    }
    Ok(())
}

pub async fn create_state<C: ConnectionTrait>(
    conn: &C,
    req: StateCreate,
    ctx: EventContext,
) -> Result<State, DomainError> {
    let req = req.normalize()?;
    ensure_country_exists(conn, req.country_id).await?;
    ensure_code_free(conn, &req.code, None).await?;

    let ctx = ctx.with_body(outbox::body(&req)?);
    let state = states_sea::create(conn, StateInsert::new(req.country_id, req.name, req.code)).await?;
    outbox::record(conn, EventType::Create, Entity::State, state.id, &ctx).await?;

    info!(state_id = state.id, country_id = state.country_id, code = %state.code, "State created");
    Ok(state)
}

pub async fn update_state<C: ConnectionTrait>(
    conn: &C,
    id: i32,
    req: StateUpdate,
    ctx: EventContext,
) -> Result<State, DomainError> {
    let req = req.normalize()?;
    let current = get_state(conn, id).await?;

    if let Some(country_id) = req.country_id {
        if country_id != current.country_id {
            ensure_country_exists(conn, country_id).await?;
        }
    }
    if let Some(code) = req.code.as_deref() {
        if code != current.code {
            ensure_code_free(conn, code, Some(id)).await?;
        }
    }

    let ctx = ctx.with_body(outbox::body(&req)?);
    let patch = StatePatch {
        country_id: req.country_id,
        name: req.name,
        code: req.code,
    };
    let state = states_sea::update(conn, current, patch).await?;
    outbox::record(conn, EventType::Update, Entity::State, state.id, &ctx).await?;

    info!(state_id = state.id, "State updated");
    Ok(state)
}

pub async fn delete_state<C: ConnectionTrait>(
    conn: &C,
    id: i32,
    ctx: EventContext,
) -> Result<State, DomainError> {
    let state = get_state(conn, id).await?;

    outbox::record(conn, EventType::Delete, Entity::State, state.id, &ctx).await?;
    states_sea::delete(conn, id)
        .await
        .map_err(|e| match DomainError::from(e) {
            DomainError::Validation(ValidationKind::ForeignKey, _) => {
                DomainError::validation(ValidationKind::ForeignKey, HAS_CITIES)
            }
            other => other,
        })?;

    info!(state_id = id, "State deleted");
    Ok(state)
}
