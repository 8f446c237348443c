//! DTOs for event_logs_sea adapter.

/// One outbox row. `created_at` and `processing_status` take the column
/// defaults unless set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventLogInsert {
    pub event_type: String,
    pub entity_type: String,
    pub entity_id: i32,
    pub request_method: String,
    pub request_path: String,
    pub request_body: Option<String>,
    pub user_id: Option<String>,
    pub ip_address: Option<String>,
    pub status_code: Option<i32>,
    pub processing_status: String,
}
