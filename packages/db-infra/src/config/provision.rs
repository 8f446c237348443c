use std::env;
use std::fmt;

use crate::config::db::{database_url, parse_flag, DbProfile};
use crate::error::DbInfraError;

pub const DEFAULT_LOCAL_ROLE: &str = "app_local";
pub const DEFAULT_SCHEMA: &str = "main";
pub const DEFAULT_TEST_DATABASE: &str = "app_test";
pub const DEFAULT_TEST_ROLE: &str = "app_test";
pub const DEFAULT_TEST_PASSWORD: &str = "app_test";

/// What to do with database/role creation steps when the object already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExistingPolicy {
    /// Issue the CREATE statement unconditionally; a re-run fails at `CREATE DATABASE`.
    #[default]
    Fail,
    /// Probe the catalog first and skip the step when the object is present.
    Skip,
}

/// Inputs for the bootstrap plan.
#[derive(Clone)]
pub struct ProvisionSettings {
    /// Administrative connection to the default (local) database
    pub admin_url: String,
    pub schema: String,
    pub local_role: String,
    pub test_database: String,
    pub test_role: String,
    pub test_password: String,
    pub existing: ExistingPolicy,
}

impl ProvisionSettings {
    /// Settings with the dev-container defaults and the given admin URL.
    pub fn new(admin_url: impl Into<String>) -> Self {
        Self {
            admin_url: admin_url.into(),
            schema: DEFAULT_SCHEMA.to_string(),
            local_role: DEFAULT_LOCAL_ROLE.to_string(),
            test_database: DEFAULT_TEST_DATABASE.to_string(),
            test_role: DEFAULT_TEST_ROLE.to_string(),
            test_password: DEFAULT_TEST_PASSWORD.to_string(),
            existing: ExistingPolicy::Fail,
        }
    }

    /// Read `PROVISION_*` variables, falling back to defaults.
    ///
    /// `PROVISION_DATABASE_URL` defaults to the local profile's `DATABASE_URL`.
    pub fn from_env() -> Result<Self, DbInfraError> {
        let admin_url = match env::var("PROVISION_DATABASE_URL") {
            Ok(url) if !url.trim().is_empty() => url,
            _ => database_url(DbProfile::Local)?,
        };

        let existing = match env::var("PROVISION_SKIP_EXISTING") {
            Ok(raw) => match parse_flag(&raw) {
                Some(true) => ExistingPolicy::Skip,
                Some(false) => ExistingPolicy::Fail,
                None => {
                    return Err(DbInfraError::config(format!(
                        "PROVISION_SKIP_EXISTING must be a boolean flag, got '{raw}'"
                    )))
                }
            },
            Err(_) => ExistingPolicy::Fail,
        };

        Ok(Self {
            admin_url,
            schema: var_or("PROVISION_SCHEMA", DEFAULT_SCHEMA),
            local_role: var_or("PROVISION_LOCAL_ROLE", DEFAULT_LOCAL_ROLE),
            test_database: var_or("PROVISION_TEST_DATABASE", DEFAULT_TEST_DATABASE),
            test_role: var_or("PROVISION_TEST_ROLE", DEFAULT_TEST_ROLE),
            test_password: var_or("PROVISION_TEST_PASSWORD", DEFAULT_TEST_PASSWORD),
            existing,
        })
    }

    pub fn with_existing(mut self, existing: ExistingPolicy) -> Self {
        self.existing = existing;
        self
    }
}

impl fmt::Debug for ProvisionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProvisionSettings")
            .field("admin_url", &crate::config::db::sanitize_db_url(&self.admin_url))
            .field("schema", &self.schema)
            .field("local_role", &self.local_role)
            .field("test_database", &self.test_database)
            .field("test_role", &self.test_role)
            .field("test_password", &"***")
            .field("existing", &self.existing)
            .finish()
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use std::env;

    use serial_test::serial;

    use super::*;

    const VARS: &[&str] = &[
        "PROVISION_DATABASE_URL",
        "PROVISION_SCHEMA",
        "PROVISION_LOCAL_ROLE",
        "PROVISION_TEST_DATABASE",
        "PROVISION_TEST_ROLE",
        "PROVISION_TEST_PASSWORD",
        "PROVISION_SKIP_EXISTING",
        "DATABASE_URL",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn defaults_follow_dev_container_layout() {
        clear_env();
        let settings = ProvisionSettings::from_env().unwrap();

        assert_eq!(settings.admin_url, crate::config::db::DEFAULT_DATABASE_URL);
        assert_eq!(settings.schema, "main");
        assert_eq!(settings.local_role, "app_local");
        assert_eq!(settings.test_database, "app_test");
        assert_eq!(settings.test_role, "app_test");
        assert_eq!(settings.existing, ExistingPolicy::Fail);
    }

    #[test]
    #[serial]
    fn skip_existing_flag_is_parsed() {
        clear_env();
        env::set_var("PROVISION_SKIP_EXISTING", "1");
        assert_eq!(
            ProvisionSettings::from_env().unwrap().existing,
            ExistingPolicy::Skip
        );

        env::set_var("PROVISION_SKIP_EXISTING", "false");
        assert_eq!(
            ProvisionSettings::from_env().unwrap().existing,
            ExistingPolicy::Fail
        );

        env::set_var("PROVISION_SKIP_EXISTING", "sometimes");
        let err = ProvisionSettings::from_env().unwrap_err();
        assert!(err.to_string().contains("PROVISION_SKIP_EXISTING"));

        clear_env();
    }

    #[test]
    #[serial]
    fn overrides_are_read() {
        clear_env();
        env::set_var("PROVISION_DATABASE_URL", "postgresql://root:pw@db:5432/postgres");
        env::set_var("PROVISION_SCHEMA", "geo");
        env::set_var("PROVISION_TEST_ROLE", "ci_test");

        let settings = ProvisionSettings::from_env().unwrap();
        assert_eq!(settings.admin_url, "postgresql://root:pw@db:5432/postgres");
        assert_eq!(settings.schema, "geo");
        assert_eq!(settings.test_role, "ci_test");
        assert_eq!(settings.local_role, "app_local");

        clear_env();
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let mut settings = ProvisionSettings::new("postgresql://root:hunter2@db:5432/postgres");
        settings.test_password = "s3cret".to_string();

        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains("***"));
    }
}
