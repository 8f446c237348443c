//! SeaORM adapter for the event log outbox.

use sea_orm::{ConnectionTrait, DbErr, EntityTrait, NotSet, Set};

use crate::entities::event_logs;

pub mod dto;

pub use dto::EventLogInsert;

pub async fn insert<C: ConnectionTrait>(conn: &C, dto: EventLogInsert) -> Result<(), DbErr> {
    let active = event_logs::ActiveModel {
        id: NotSet,
        event_type: Set(dto.event_type),
        entity_type: Set(dto.entity_type),
        entity_id: Set(dto.entity_id),
        request_method: Set(dto.request_method),
        request_path: Set(dto.request_path),
        request_body: Set(dto.request_body),
        user_id: Set(dto.user_id),
        ip_address: Set(dto.ip_address),
        created_at: NotSet,
        status_code: Set(dto.status_code),
        processing_status: Set(dto.processing_status),
        processed_at: NotSet,
    };

    event_logs::Entity::insert(active)
        .exec_without_returning(conn)
        .await?;
    Ok(())
}
