use std::fmt::Write as _;

use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, FromQueryResult, Statement};

use crate::admin::connection::list_base_tables;
use crate::error::DbInfraError;
use crate::provision::Ident;

const RULE: &str =
    "================================================================================";

/// Rows shown per table by the data report.
pub const SAMPLE_ROWS: u64 = 5;

/// Bookkeeping tables left out of the data samples.
const SKIP_SAMPLES: &[&str] = &["seaql_migrations"];

#[derive(Debug, Clone, FromQueryResult)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub not_null: bool,
    pub column_default: Option<String>,
}

#[derive(Debug, Clone, FromQueryResult)]
pub struct IndexInfo {
    pub name: String,
    pub is_unique: bool,
    pub columns: String,
    pub predicate: Option<String>,
}

#[derive(Debug, Clone, FromQueryResult)]
pub struct ConstraintInfo {
    pub name: String,
    /// `p` for primary key, `f` for foreign key
    pub kind: String,
    pub definition: String,
}

#[derive(Debug, Clone)]
pub struct TableInspection {
    pub schema: String,
    pub table: String,
    pub columns: Vec<ColumnInfo>,
    pub indexes: Vec<IndexInfo>,
    pub constraints: Vec<ConstraintInfo>,
}

#[derive(Debug, Clone)]
pub struct SchemaInspection {
    pub schema: String,
    /// Every table in the schema, even when only one was inspected
    pub all_tables: Vec<String>,
    pub tables: Vec<TableInspection>,
    pub migration_version: Option<String>,
}

/// Row count and the first rows of one table, each rendered as JSON.
#[derive(Debug, Clone)]
pub struct TableSample {
    pub table: String,
    pub row_count: i64,
    pub rows: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DataInspection {
    pub tables: Vec<TableInspection>,
    pub samples: Vec<TableSample>,
}

#[derive(Debug, FromQueryResult)]
struct CountRow {
    count: i64,
}

#[derive(Debug, FromQueryResult)]
struct SampleRow {
    row: String,
}

const COLUMNS_SQL: &str = "\
SELECT a.attname::text AS name,
       format_type(a.atttypid, a.atttypmod) AS data_type,
       a.attnotnull AS not_null,
       pg_get_expr(d.adbin, d.adrelid) AS column_default
FROM pg_attribute a
JOIN pg_class c ON c.oid = a.attrelid
JOIN pg_namespace n ON n.oid = c.relnamespace
LEFT JOIN pg_attrdef d ON d.adrelid = a.attrelid AND d.adnum = a.attnum
WHERE n.nspname = $1 AND c.relname = $2 AND a.attnum > 0 AND NOT a.attisdropped
ORDER BY a.attnum";

const INDEXES_SQL: &str = "\
SELECT i.relname::text AS name,
       ix.indisunique AS is_unique,
       array_to_string(ARRAY(
           SELECT a.attname::text
           FROM unnest(ix.indkey::int2[]) WITH ORDINALITY AS k(attnum, ord)
           JOIN pg_attribute a ON a.attrelid = ix.indrelid AND a.attnum = k.attnum
           ORDER BY k.ord
       ), ', ') AS columns,
       pg_get_expr(ix.indpred, ix.indrelid) AS predicate
FROM pg_index ix
JOIN pg_class i ON i.oid = ix.indexrelid
JOIN pg_class t ON t.oid = ix.indrelid
JOIN pg_namespace n ON n.oid = t.relnamespace
WHERE n.nspname = $1 AND t.relname = $2
ORDER BY i.relname";

const CONSTRAINTS_SQL: &str = "\
SELECT con.conname::text AS name,
       con.contype::text AS kind,
       pg_get_constraintdef(con.oid) AS definition
FROM pg_constraint con
JOIN pg_class t ON t.oid = con.conrelid
JOIN pg_namespace n ON n.oid = t.relnamespace
WHERE n.nspname = $1 AND t.relname = $2 AND con.contype IN ('p', 'f')
ORDER BY con.contype DESC, con.conname";

fn table_stmt(sql: &str, schema: &str, table: &str) -> Statement {
    Statement::from_sql_and_values(
        DatabaseBackend::Postgres,
        sql,
        [schema.into(), table.into()],
    )
}

pub async fn inspect_table<C>(conn: &C, schema: &str, table: &str) -> Result<TableInspection, DbInfraError>
where
    C: ConnectionTrait,
{
    let columns = ColumnInfo::find_by_statement(table_stmt(COLUMNS_SQL, schema, table))
        .all(conn)
        .await?;
    let indexes = IndexInfo::find_by_statement(table_stmt(INDEXES_SQL, schema, table))
        .all(conn)
        .await?;
    let constraints = ConstraintInfo::find_by_statement(table_stmt(CONSTRAINTS_SQL, schema, table))
        .all(conn)
        .await?;

    Ok(TableInspection {
        schema: schema.to_string(),
        table: table.to_string(),
        columns,
        indexes,
        constraints,
    })
}

/// Inspect every table of `schema`, or only `table` when given.
pub async fn inspect_schema(
    conn: &DatabaseConnection,
    schema: &str,
    table: Option<&str>,
) -> Result<SchemaInspection, DbInfraError> {
    let all_tables: Vec<String> = list_base_tables(conn, &[schema])
        .await?
        .into_iter()
        .map(|t| t.table_name)
        .collect();

    let selected: Vec<&str> = match table {
        Some(name) if all_tables.iter().any(|t| t == name) => vec![name],
        Some(name) => {
            return Err(DbInfraError::config(format!(
                "Table '{name}' not found in {schema} schema. Available tables: {}",
                all_tables.join(", ")
            )))
        }
        None => all_tables.iter().map(String::as_str).collect(),
    };

    let mut tables = Vec::with_capacity(selected.len());
    for name in selected {
        tables.push(inspect_table(conn, schema, name).await?);
    }

    let migration_version = migration::get_latest_migration_version(conn).await?;

    Ok(SchemaInspection {
        schema: schema.to_string(),
        all_tables,
        tables,
        migration_version,
    })
}

pub async fn sample_table<C>(
    conn: &C,
    schema: &str,
    table: &str,
    limit: u64,
) -> Result<TableSample, DbInfraError>
where
    C: ConnectionTrait,
{
    let qualified = format!("{}.{}", Ident::new(schema)?, Ident::new(table)?);

    let row_count = CountRow::find_by_statement(Statement::from_string(
        DatabaseBackend::Postgres,
        format!("SELECT COUNT(*) AS count FROM {qualified}"),
    ))
    .one(conn)
    .await?
    .map(|r| r.count)
    .unwrap_or(0);

    let rows = if row_count > 0 {
        SampleRow::find_by_statement(Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            format!("SELECT row_to_json(t)::text AS row FROM (SELECT * FROM {qualified} LIMIT $1) t"),
            [(limit as i64).into()],
        ))
        .all(conn)
        .await?
        .into_iter()
        .map(|r| r.row)
        .collect()
    } else {
        Vec::new()
    };

    Ok(TableSample {
        table: table.to_string(),
        row_count,
        rows,
    })
}

/// Structure of every table in `schema` plus up to `limit` rows of each.
pub async fn inspect_data<C>(conn: &C, schema: &str, limit: u64) -> Result<DataInspection, DbInfraError>
where
    C: ConnectionTrait,
{
    let names: Vec<String> = list_base_tables(conn, &[schema])
        .await?
        .into_iter()
        .map(|t| t.table_name)
        .collect();

    let mut tables = Vec::with_capacity(names.len());
    let mut samples = Vec::with_capacity(names.len());
    for name in &names {
        tables.push(inspect_table(conn, schema, name).await?);
        if !SKIP_SAMPLES.contains(&name.as_str()) {
            samples.push(sample_table(conn, schema, name, limit).await?);
        }
    }

    Ok(DataInspection { tables, samples })
}

fn index_line(idx: &IndexInfo) -> String {
    let kind = if idx.is_unique { "UNIQUE" } else { "INDEX" };
    let predicate = idx
        .predicate
        .as_deref()
        .map(|p| format!(" WHERE {p}"))
        .unwrap_or_default();
    format!("{} ({kind}): [{}]{predicate}", idx.name, idx.columns)
}

/// Index listing only.
pub fn render_indexes(inspection: &SchemaInspection) -> String {
    let mut out = String::new();
    for table in &inspection.tables {
        let _ = writeln!(out, "\n=== {} INDEXES ===", table.table);
        if table.indexes.is_empty() {
            let _ = writeln!(out, "  (none)");
        }
        for idx in &table.indexes {
            let _ = writeln!(out, "  {}", index_line(idx));
        }
    }
    out
}

/// Full report: summary, per-table details and the migration version.
pub fn render_details(inspection: &SchemaInspection) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "DATABASE TABLES IN '{}' SCHEMA", inspection.schema);
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "\nTotal tables: {}", inspection.all_tables.len());
    let _ = writeln!(out, "Tables: {}", inspection.all_tables.join(", "));

    for table in &inspection.tables {
        let _ = writeln!(out, "\n{RULE}");
        let _ = writeln!(out, "TABLE: {}.{}", table.schema, table.table);
        let _ = writeln!(out, "{RULE}");

        let _ = writeln!(out, "\nCOLUMNS:");
        for col in &table.columns {
            let nullable = if col.not_null { "NOT NULL" } else { "NULL" };
            let default = col
                .column_default
                .as_deref()
                .map(|d| format!(", default={d}"))
                .unwrap_or_default();
            let _ = writeln!(out, "  - {}: {} ({nullable}{default})", col.name, col.data_type);
        }

        let _ = writeln!(out, "\nINDEXES:");
        if table.indexes.is_empty() {
            let _ = writeln!(out, "  (none)");
        }
        for idx in &table.indexes {
            let _ = writeln!(out, "  - {}", index_line(idx));
        }

        for (title, kind) in [("FOREIGN KEYS", "f"), ("PRIMARY KEY", "p")] {
            let _ = writeln!(out, "\n{title}:");
            let mut matched = table.constraints.iter().filter(|c| c.kind == kind).peekable();
            if matched.peek().is_none() {
                let _ = writeln!(out, "  (none)");
            }
            for con in matched {
                let _ = writeln!(out, "  - {}: {}", con.name, con.definition);
            }
        }
    }

    let _ = writeln!(out, "\n{RULE}");
    let _ = writeln!(out, "MIGRATION VERSION");
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(
        out,
        "\nCurrent migration version: {}",
        inspection.migration_version.as_deref().unwrap_or("(none)")
    );
    out
}

/// Table structure followed by the data samples.
pub fn render_data(inspection: &DataInspection) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Database Tables ===\n");
    for table in &inspection.tables {
        let _ = writeln!(out, "📋 {}", table.table);
        for col in &table.columns {
            let nullable = if col.not_null { "NOT NULL" } else { "NULL" };
            let _ = writeln!(out, "  ├─ {}: {} ({nullable})", col.name, col.data_type);
        }
        if !table.indexes.is_empty() {
            let _ = writeln!(out, "  └─ Indexes:");
            for idx in &table.indexes {
                let _ = writeln!(out, "     └─ {}: [{}]", idx.name, idx.columns);
            }
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "=== Data Samples ===\n");
    for sample in &inspection.samples {
        let _ = writeln!(out, "📊 {}: {} rows", sample.table, sample.row_count);
        for row in &sample.rows {
            let _ = writeln!(out, "  └─ {row}");
        }
        let _ = writeln!(out);
    }
    out
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use sea_orm::{MockDatabase, Value};

    use super::*;

    fn cities() -> SchemaInspection {
        SchemaInspection {
            schema: "main".to_string(),
            all_tables: vec!["cities".to_string(), "countries".to_string()],
            tables: vec![TableInspection {
                schema: "main".to_string(),
                table: "cities".to_string(),
                columns: vec![
                    ColumnInfo {
                        name: "id".to_string(),
                        data_type: "integer".to_string(),
                        not_null: true,
                        column_default: Some("nextval('main.cities_id_seq'::regclass)".to_string()),
                    },
                    ColumnInfo {
                        name: "is_active".to_string(),
                        data_type: "boolean".to_string(),
                        not_null: true,
                        column_default: Some("true".to_string()),
                    },
                ],
                indexes: vec![IndexInfo {
                    name: "cities_code_active_unique".to_string(),
                    is_unique: true,
                    columns: "code".to_string(),
                    predicate: Some("(is_active = true)".to_string()),
                }],
                constraints: vec![
                    ConstraintInfo {
                        name: "cities_pkey".to_string(),
                        kind: "p".to_string(),
                        definition: "PRIMARY KEY (id)".to_string(),
                    },
                    ConstraintInfo {
                        name: "fk_cities_state_id".to_string(),
                        kind: "f".to_string(),
                        definition: "FOREIGN KEY (state_id) REFERENCES main.states(id) ON DELETE RESTRICT"
                            .to_string(),
                    },
                ],
            }],
            migration_version: Some("m20251109_000004_create_cities".to_string()),
        }
    }

    #[test]
    fn index_report_shows_partial_predicate() {
        let out = render_indexes(&cities());
        assert!(out.contains("=== cities INDEXES ==="));
        assert!(out.contains("cities_code_active_unique (UNIQUE): [code] WHERE (is_active = true)"));
    }

    #[test]
    fn detail_report_lists_every_section() {
        let out = render_details(&cities());
        assert!(out.contains("Total tables: 2"));
        assert!(out.contains("TABLE: main.cities"));
        assert!(out.contains("  - is_active: boolean (NOT NULL, default=true)"));
        assert!(out.contains("  - cities_pkey: PRIMARY KEY (id)"));
        assert!(out.contains("ON DELETE RESTRICT"));
        assert!(out.contains("Current migration version: m20251109_000004_create_cities"));
    }

    #[tokio::test]
    async fn sample_counts_then_reads_limited_rows() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[BTreeMap::from([("count", Value::BigInt(Some(7)))])]])
            .append_query_results([[BTreeMap::from([(
                "row",
                Value::from(r#"{"id":1,"name":"Japan","code":"JP"}"#),
            )])]])
            .into_connection();

        let sample = sample_table(&db, "geo", "countries", SAMPLE_ROWS).await.unwrap();
        assert_eq!(sample.row_count, 7);
        assert_eq!(sample.rows, vec![r#"{"id":1,"name":"Japan","code":"JP"}"#]);

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains(r#"SELECT COUNT(*) AS count FROM \"geo\".\"countries\""#));
        assert!(log.contains("LIMIT $1"));
        assert!(log.contains("BigInt(Some(5))"));
    }

    #[tokio::test]
    async fn empty_table_skips_row_query() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[BTreeMap::from([("count", Value::BigInt(Some(0)))])]])
            .into_connection();

        let sample = sample_table(&db, "main", "cities", SAMPLE_ROWS).await.unwrap();
        assert_eq!(sample.row_count, 0);
        assert!(sample.rows.is_empty());
        assert_eq!(db.into_transaction_log().len(), 1);
    }

    #[test]
    fn data_report_shows_structure_then_samples() {
        let inspection = DataInspection {
            tables: cities().tables,
            samples: vec![TableSample {
                table: "cities".to_string(),
                row_count: 1,
                rows: vec![r#"{"id":1,"name":"Minato"}"#.to_string()],
            }],
        };

        let out = render_data(&inspection);
        let structure = out.find("=== Database Tables ===").unwrap();
        let samples = out.find("=== Data Samples ===").unwrap();
        assert!(structure < samples);
        assert!(out.contains("  ├─ is_active: boolean (NOT NULL)"));
        assert!(out.contains("     └─ cities_code_active_unique: [code]"));
        assert!(out.contains("📊 cities: 1 rows"));
        assert!(out.contains(r#"  └─ {"id":1,"name":"Minato"}"#));
    }
}
