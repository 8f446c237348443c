use serde::{Deserialize, Serialize};

use crate::domain::validation;
use crate::errors::DomainError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateCreate {
    pub country_id: i32,
    pub name: String,
    /// ISO 3166-2, stored uppercase
    pub code: String,
}

impl StateCreate {
    pub fn normalize(self) -> Result<Self, DomainError> {
        validation::name(&self.name)?;
        let code = validation::state_code_normalized(&self.code)?;
        Ok(Self { code, ..self })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl StateUpdate {
    pub fn normalize(self) -> Result<Self, DomainError> {
        if let Some(name) = &self.name {
            validation::name(name)?;
        }
        let code = self
            .code
            .as_deref()
            .map(validation::state_code_normalized)
            .transpose()?;
        Ok(Self { code, ..self })
    }
}
