//! DTOs for cities_sea adapter.

#[derive(Debug, Clone)]
pub struct CityInsert {
    pub state_id: i32,
    pub name: String,
    pub code: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct CityPatch {
    pub name: Option<String>,
    pub code: Option<String>,
    pub is_active: Option<bool>,
}

impl CityPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.code.is_none() && self.is_active.is_none()
    }
}

/// Row filter for reads. Inactive cities are hidden unless asked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CityScope {
    pub include_inactive: bool,
    pub state_id: Option<i32>,
}
