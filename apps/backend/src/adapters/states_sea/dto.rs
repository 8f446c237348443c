//! DTOs for states_sea adapter.

#[derive(Debug, Clone)]
pub struct StateInsert {
    pub country_id: i32,
    pub name: String,
    pub code: String,
}

impl StateInsert {
    pub fn new(country_id: i32, name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            country_id,
            name: name.into(),
            code: code.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatePatch {
    pub country_id: Option<i32>,
    pub name: Option<String>,
    pub code: Option<String>,
}

impl StatePatch {
    pub fn is_empty(&self) -> bool {
        self.country_id.is_none() && self.name.is_none() && self.code.is_none()
    }
}
