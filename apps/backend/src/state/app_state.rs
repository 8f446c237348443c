use sea_orm::DatabaseConnection;

/// Application state containing shared resources
#[derive(Debug)]
pub struct AppState {
    /// Database connection (absent in route tests that never touch the DB)
    pub db: Option<DatabaseConnection>,
}

impl AppState {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db: Some(db) }
    }

    pub fn without_db() -> Self {
        Self { db: None }
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }
}
