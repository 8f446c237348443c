use serde::{Deserialize, Serialize};

use crate::domain::validation;
use crate::errors::DomainError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryCreate {
    pub name: String,
    /// ISO 3166-1 alpha-2
    pub code: String,
}

impl CountryCreate {
    /// Applies the field rules and uppercases `code`.
    pub fn normalize(self) -> Result<Self, DomainError> {
        validation::name(&self.name)?;
        let code = validation::country_code(&self.code)?;
        Ok(Self { code, ..self })
    }
}

/// Partial update; serializes only the fields that were set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl CountryUpdate {
    pub fn normalize(self) -> Result<Self, DomainError> {
        if let Some(name) = &self.name {
            validation::name(name)?;
        }
        let code = self
            .code
            .as_deref()
            .map(validation::country_code)
            .transpose()?;
        Ok(Self { code, ..self })
    }
}
