//! SeaORM adapters, one per table.
//!
//! Adapter functions return `DbErr`; services map to `DomainError`
//! through `From<DbErr>`.

pub mod cities_sea;
pub mod countries_sea;
pub mod event_logs_sea;
pub mod states_sea;

/// Offset pagination as taken from `skip` / `limit` query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: u64,
    pub limit: u64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: 100,
        }
    }
}
