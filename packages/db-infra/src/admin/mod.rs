//! Maintenance helpers behind the `db-script` commands.

pub mod connection;
pub mod inspect;
pub mod permissions;
pub mod reset;

pub use connection::{check_connection, list_base_tables, ConnectionReport, TableRef};
pub use inspect::{inspect_data, inspect_schema, DataInspection, SchemaInspection, TableInspection, TableSample};
pub use permissions::{create_test_database, fix_test_permissions, setup_main_schema, SchemaSetupOutcome};
pub use reset::{drop_all_tables, reset_test_database, ResetReport};

/// Schemas the application tables may live in: the configured schema, then
/// `public`.
pub fn app_schemas(schema: &str) -> Vec<&str> {
    let mut schemas = vec![schema];
    if schema != "public" {
        schemas.push("public");
    }
    schemas
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_schemas_follow_configured_schema() {
        assert_eq!(app_schemas("main"), vec!["main", "public"]);
        assert_eq!(app_schemas("geo"), vec!["geo", "public"]);
        assert_eq!(app_schemas("public"), vec!["public"]);
    }
}
