use migration::MigrationCommand;
use sea_orm::ConnectionTrait;
use tracing::info;

use crate::admin::connection::{list_base_tables, TableRef};
use crate::admin::app_schemas;
use crate::config::db::{database_url, DbProfile};
use crate::error::DbInfraError;
use crate::infra::db::core::{connect_url, orchestrate_migration, PoolPurpose};
use crate::provision::Ident;

#[derive(Debug, Clone)]
pub struct ResetReport {
    pub dropped: Vec<TableRef>,
    pub tables: Vec<TableRef>,
}

/// Drop every base table in `schema` and `public` with `CASCADE`, including
/// the migration bookkeeping table.
pub async fn drop_all_tables<C>(conn: &C, schema: &str) -> Result<Vec<TableRef>, DbInfraError>
where
    C: ConnectionTrait,
{
    let schemas = app_schemas(schema);
    let tables = list_base_tables(conn, &schemas).await?;

    for table in &tables {
        let sql = format!(
            "DROP TABLE IF EXISTS {}.{} CASCADE",
            Ident::new(table.table_schema.as_str())?,
            Ident::new(table.table_name.as_str())?
        );
        info!(table = %table, "reset=drop");
        conn.execute_unprepared(&sql).await?;
    }

    for schema in &schemas {
        let sql = format!(
            "DROP TABLE IF EXISTS {}.\"seaql_migrations\" CASCADE",
            Ident::new(*schema)?
        );
        conn.execute_unprepared(&sql).await?;
    }

    Ok(tables)
}

/// Drop, migrate and verify the test database.
///
/// Only the test profile is touched, so the `_test` name rule always applies.
pub async fn reset_test_database(schema: &str) -> Result<ResetReport, DbInfraError> {
    let url = database_url(DbProfile::Test)?;

    let conn = connect_url(&url, PoolPurpose::Admin).await?;
    let dropped = drop_all_tables(&conn, schema).await?;
    conn.close().await?;

    orchestrate_migration(DbProfile::Test, MigrationCommand::Up).await?;

    let conn = connect_url(&url, PoolPurpose::Admin).await?;
    let tables = list_base_tables(&conn, &app_schemas(schema)).await?;
    conn.close().await?;

    if tables.is_empty() {
        return Err(DbInfraError::migration(
            "no tables found in the test database after migrating",
        ));
    }

    Ok(ResetReport { dropped, tables })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};

    use super::*;

    fn table(schema: &str, name: &str) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([
            ("table_schema", Value::from(schema)),
            ("table_name", Value::from(name)),
        ])
    }

    fn ok_exec() -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }
    }

    #[tokio::test]
    async fn drop_targets_the_configured_schema() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[table("geo", "cities")]])
            .append_exec_results([ok_exec(), ok_exec(), ok_exec()])
            .into_connection();

        let dropped = drop_all_tables(&db, "geo").await.unwrap();
        assert_eq!(dropped[0].to_string(), "geo.cities");

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains(r#"DROP TABLE IF EXISTS \"geo\".\"cities\" CASCADE"#));
        assert!(log.contains(r#"DROP TABLE IF EXISTS \"geo\".\"seaql_migrations\" CASCADE"#));
        assert!(log.contains(r#"DROP TABLE IF EXISTS \"public\".\"seaql_migrations\" CASCADE"#));
        assert!(!log.contains("main"));
    }
}
