//! SeaORM adapter for countries.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, NotSet, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::adapters::Page;
use crate::entities::countries;

pub mod dto;

pub use dto::{CountryInsert, CountryPatch};

pub async fn find_by_id<C: ConnectionTrait>(
    conn: &C,
    id: i32,
) -> Result<Option<countries::Model>, DbErr> {
    countries::Entity::find_by_id(id).one(conn).await
}

/// Any country holding `code`, other than `exclude_id`.
pub async fn find_by_code<C: ConnectionTrait>(
    conn: &C,
    code: &str,
    exclude_id: Option<i32>,
) -> Result<Option<countries::Model>, DbErr> {
    let mut query = countries::Entity::find().filter(countries::Column::Code.eq(code));
    if let Some(id) = exclude_id {
        query = query.filter(countries::Column::Id.ne(id));
    }
    query.one(conn).await
}

pub async fn list<C: ConnectionTrait>(conn: &C, page: Page) -> Result<Vec<countries::Model>, DbErr> {
    countries::Entity::find()
        .order_by_asc(countries::Column::Id)
        .offset(page.skip)
        .limit(page.limit)
        .all(conn)
        .await
}

pub async fn create<C: ConnectionTrait>(
    conn: &C,
    dto: CountryInsert,
) -> Result<countries::Model, DbErr> {
    countries::ActiveModel {
        id: NotSet,
        name: Set(dto.name),
        code: Set(dto.code),
    }
    .insert(conn)
    .await
}

pub async fn update<C: ConnectionTrait>(
    conn: &C,
    current: countries::Model,
    patch: CountryPatch,
) -> Result<countries::Model, DbErr> {
    if patch.is_empty() {
        return Ok(current);
    }
    let mut active: countries::ActiveModel = current.into();
    if let Some(name) = patch.name {
        active.name = Set(name);
    }
    if let Some(code) = patch.code {
        active.code = Set(code);
    }
    active.update(conn).await
}

/// Rows removed (0 or 1).
pub async fn delete<C: ConnectionTrait>(conn: &C, id: i32) -> Result<u64, DbErr> {
    let result = countries::Entity::delete_by_id(id).exec(conn).await?;
    Ok(result.rows_affected)
}
