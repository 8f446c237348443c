use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// `code` is unique among active rows only (partial index
/// `cities_code_active_unique`).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(schema_name = "main", table_name = "cities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_name = "state_id")]
    pub state_id: i32,
    pub name: String,
    pub code: String,
    #[sea_orm(column_name = "is_active")]
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::states::Entity",
        from = "Column::StateId",
        to = "super::states::Column::Id",
        on_delete = "Restrict"
    )]
    State,
}

impl Related<super::states::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::State.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
