//! DTOs for countries_sea adapter.

#[derive(Debug, Clone)]
pub struct CountryInsert {
    pub name: String,
    pub code: String,
}

impl CountryInsert {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
        }
    }
}

/// Columns to overwrite; `None` leaves the column as is.
#[derive(Debug, Clone, Default)]
pub struct CountryPatch {
    pub name: Option<String>,
    pub code: Option<String>,
}

impl CountryPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.code.is_none()
    }
}
