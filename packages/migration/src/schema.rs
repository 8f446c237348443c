use sea_orm_migration::prelude::*;

/// Application schema. Created by the database bootstrap, not by migrations.
#[derive(Iden)]
pub enum Main {
    #[iden = "main"]
    Schema,
}

#[derive(Iden)]
pub enum Countries {
    Table,
    Id,
    Name,
    Code,
}

#[derive(Iden)]
pub enum States {
    Table,
    Id,
    CountryId,
    Name,
    Code,
}

#[derive(Iden)]
pub enum Cities {
    Table,
    Id,
    StateId,
    Name,
    Code,
    IsActive,
}

#[derive(Iden)]
pub enum EventLogs {
    Table,
    Id,
    EventType,
    EntityType,
    EntityId,
    RequestMethod,
    RequestPath,
    RequestBody,
    UserId,
    IpAddress,
    CreatedAt,
    StatusCode,
    ProcessingStatus,
    ProcessedAt,
}
