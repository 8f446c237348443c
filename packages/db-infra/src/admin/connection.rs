use std::fmt;

use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, FromQueryResult, Statement, Value};

use crate::config::db::{database_name, database_url, DbProfile};
use crate::error::DbInfraError;
use crate::infra::db::core::{connect_url, PoolPurpose};

/// Schema-qualified table name.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct TableRef {
    pub table_schema: String,
    pub table_name: String,
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table_schema, self.table_name)
    }
}

#[derive(Debug, FromQueryResult)]
struct VersionRow {
    version: String,
}

#[derive(Debug, Clone)]
pub struct ConnectionReport {
    pub database: String,
    pub server_version: String,
    pub tables: Vec<TableRef>,
}

/// Base tables in `schemas`, ordered by schema then name.
pub async fn list_base_tables<C>(conn: &C, schemas: &[&str]) -> Result<Vec<TableRef>, DbInfraError>
where
    C: ConnectionTrait,
{
    if schemas.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = (1..=schemas.len())
        .map(|i| format!("${i}"))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "SELECT table_schema::text AS table_schema, table_name::text AS table_name \
         FROM information_schema.tables \
         WHERE table_schema IN ({placeholders}) AND table_type = 'BASE TABLE' \
         ORDER BY table_schema, table_name"
    );
    let values: Vec<Value> = schemas.iter().map(|s| (*s).into()).collect();

    let tables = TableRef::find_by_statement(Statement::from_sql_and_values(
        DatabaseBackend::Postgres,
        sql,
        values,
    ))
    .all(conn)
    .await?;

    Ok(tables)
}

pub async fn server_version(conn: &DatabaseConnection) -> Result<String, DbInfraError> {
    let row = VersionRow::find_by_statement(Statement::from_string(
        DatabaseBackend::Postgres,
        "SELECT version() AS version",
    ))
    .one(conn)
    .await?
    .ok_or_else(|| DbInfraError::connect("SELECT version() returned no row"))?;
    Ok(row.version)
}

/// Connect to the database of `profile`, read the server version and list
/// the tables in `schema` and `public`.
pub async fn check_connection(
    profile: DbProfile,
    schema: &str,
) -> Result<ConnectionReport, DbInfraError> {
    let url = database_url(profile)?;
    let conn = connect_url(&url, PoolPurpose::Admin).await?;

    let report = ConnectionReport {
        database: database_name(&url)?,
        server_version: server_version(&conn).await?,
        tables: list_base_tables(&conn, &super::app_schemas(schema)).await?,
    };

    conn.close().await?;
    Ok(report)
}
