//! SeaORM adapter for states.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, NotSet, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::adapters::Page;
use crate::entities::states;

pub mod dto;

pub use dto::{StateInsert, StatePatch};

pub async fn find_by_id<C: ConnectionTrait>(
    conn: &C,
    id: i32,
) -> Result<Option<states::Model>, DbErr> {
    states::Entity::find_by_id(id).one(conn).await
}

pub async fn find_by_code<C: ConnectionTrait>(
    conn: &C,
    code: &str,
    exclude_id: Option<i32>,
) -> Result<Option<states::Model>, DbErr> {
    let mut query = states::Entity::find().filter(states::Column::Code.eq(code));
    if let Some(id) = exclude_id {
        query = query.filter(states::Column::Id.ne(id));
    }
    query.one(conn).await
}

/// States ordered by id, optionally only those of one country.
pub async fn list<C: ConnectionTrait>(
    conn: &C,
    page: Page,
    country_id: Option<i32>,
) -> Result<Vec<states::Model>, DbErr> {
    let mut query = states::Entity::find();
    if let Some(country_id) = country_id {
        query = query.filter(states::Column::CountryId.eq(country_id));
    }
    query
        .order_by_asc(states::Column::Id)
        .offset(page.skip)
        .limit(page.limit)
        .all(conn)
        .await
}

pub async fn create<C: ConnectionTrait>(conn: &C, dto: StateInsert) -> Result<states::Model, DbErr> {
    states::ActiveModel {
        id: NotSet,
        country_id: Set(dto.country_id),
        name: Set(dto.name),
        code: Set(dto.code),
    }
    .insert(conn)
    .await
}

pub async fn update<C: ConnectionTrait>(
    conn: &C,
    current: states::Model,
    patch: StatePatch,
) -> Result<states::Model, DbErr> {
    if patch.is_empty() {
        return Ok(current);
    }
    let mut active: states::ActiveModel = current.into();
    if let Some(country_id) = patch.country_id {
        active.country_id = Set(country_id);
    }
    if let Some(name) = patch.name {
        active.name = Set(name);
    }
    if let Some(code) = patch.code {
        active.code = Set(code);
    }
    active.update(conn).await
}

pub async fn delete<C: ConnectionTrait>(conn: &C, id: i32) -> Result<u64, DbErr> {
    let result = states::Entity::delete_by_id(id).exec(conn).await?;
    Ok(result.rows_affected)
}
