use serde::{Deserialize, Serialize};

use crate::domain::validation;
use crate::errors::DomainError;

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityCreate {
    pub state_id: i32,
    pub name: String,
    /// JIS X 0402, six digits
    pub code: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl CityCreate {
    pub fn normalize(self) -> Result<Self, DomainError> {
        validation::positive_id("state_id", self.state_id)?;
        validation::name(&self.name)?;
        validation::city_code_checked(&self.code)?;
        Ok(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl CityUpdate {
    pub fn normalize(self) -> Result<Self, DomainError> {
        if let Some(name) = &self.name {
            validation::name(name)?;
        }
        if let Some(code) = &self.code {
            validation::city_code_checked(code)?;
        }
        Ok(self)
    }
}
