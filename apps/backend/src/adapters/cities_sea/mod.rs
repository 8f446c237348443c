//! SeaORM adapter for cities.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, NotSet, QueryFilter,
    QueryOrder, QuerySelect, Select, Set,
};

use crate::adapters::Page;
use crate::entities::cities;

pub mod dto;

pub use dto::{CityInsert, CityPatch, CityScope};

fn scoped(scope: CityScope) -> Select<cities::Entity> {
    let mut query = cities::Entity::find();
    if !scope.include_inactive {
        query = query.filter(cities::Column::IsActive.eq(true));
    }
    if let Some(state_id) = scope.state_id {
        query = query.filter(cities::Column::StateId.eq(state_id));
    }
    query
}

pub async fn find_by_id<C: ConnectionTrait>(
    conn: &C,
    id: i32,
    scope: CityScope,
) -> Result<Option<cities::Model>, DbErr> {
    scoped(scope)
        .filter(cities::Column::Id.eq(id))
        .one(conn)
        .await
}

/// An active city holding `code`, other than `exclude_id`.
pub async fn find_active_by_code<C: ConnectionTrait>(
    conn: &C,
    code: &str,
    exclude_id: Option<i32>,
) -> Result<Option<cities::Model>, DbErr> {
    let mut query = scoped(CityScope::default()).filter(cities::Column::Code.eq(code));
    if let Some(id) = exclude_id {
        query = query.filter(cities::Column::Id.ne(id));
    }
    query.one(conn).await
}

pub async fn list<C: ConnectionTrait>(
    conn: &C,
    page: Page,
    scope: CityScope,
) -> Result<Vec<cities::Model>, DbErr> {
    scoped(scope)
        .order_by_asc(cities::Column::Id)
        .offset(page.skip)
        .limit(page.limit)
        .all(conn)
        .await
}

pub async fn create<C: ConnectionTrait>(conn: &C, dto: CityInsert) -> Result<cities::Model, DbErr> {
    cities::ActiveModel {
        id: NotSet,
        state_id: Set(dto.state_id),
        name: Set(dto.name),
        code: Set(dto.code),
        is_active: Set(dto.is_active),
    }
    .insert(conn)
    .await
}

pub async fn update<C: ConnectionTrait>(
    conn: &C,
    current: cities::Model,
    patch: CityPatch,
) -> Result<cities::Model, DbErr> {
    if patch.is_empty() {
        return Ok(current);
    }
    let mut active: cities::ActiveModel = current.into();
    if let Some(name) = patch.name {
        active.name = Set(name);
    }
    if let Some(code) = patch.code {
        active.code = Set(code);
    }
    if let Some(is_active) = patch.is_active {
        active.is_active = Set(is_active);
    }
    active.update(conn).await
}

pub async fn delete<C: ConnectionTrait>(conn: &C, id: i32) -> Result<u64, DbErr> {
    let result = cities::Entity::delete_by_id(id).exec(conn).await?;
    Ok(result.rows_affected)
}
