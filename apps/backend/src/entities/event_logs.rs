use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(schema_name = "main", table_name = "event_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub event_type: String,
    pub entity_type: String,
    pub entity_id: i32,
    pub request_method: String,
    pub request_path: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub request_body: Option<String>,
    pub user_id: Option<String>,
    pub ip_address: Option<String>,
    pub created_at: PrimitiveDateTime,
    pub status_code: Option<i32>,
    pub processing_status: String,
    pub processed_at: Option<PrimitiveDateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
