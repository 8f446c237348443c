use std::process::ExitCode;

use clap::{Parser, Subcommand};
use db_infra::admin::{self, inspect, ConnectionReport};
use db_infra::config::db::{database_url, load_dotenv, sanitize_db_url};
use db_infra::provision::{ProvisionReport, StepOutcome};
use db_infra::{connect, DbInfraError, DbProfile, PoolPurpose, ProvisionSettings};
use migration_cli::init_tracing;

const BANNER: &str = "============================================================";

#[derive(Parser)]
#[command(name = "db-script")]
#[command(about = "Database maintenance scripts for the geo registry")]
struct Args {
    #[command(subcommand)]
    script: Script,
}

/// Each script also answers to its snake_case file name.
#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Script {
    /// Connect with DATABASE_URL and list tables
    #[command(alias = "check_db_connection")]
    CheckDb,
    /// Connect with DATABASE_URL_TEST and list tables
    #[command(alias = "check_test_db_connection")]
    CheckTestDb,
    /// Show columns, indexes and constraints of the configured schema
    #[command(alias = "inspect_tables")]
    InspectTables {
        /// Only this table (default: all tables)
        #[arg(short, long)]
        table: Option<String>,
        /// Show only indexes
        #[arg(short, long)]
        indexes_only: bool,
    },
    /// List tables with columns and indexes, then row counts and sample rows
    #[command(alias = "db_inspect")]
    InspectData {
        /// Rows shown per table
        #[arg(short, long, default_value_t = inspect::SAMPLE_ROWS)]
        limit: u64,
    },
    /// Create the schema with grants in the local and test databases
    #[command(alias = "setup_main_schema")]
    SetupMainSchema,
    /// Grant the test role full use of the test database's public schema
    #[command(alias = "fix_test_db_permissions")]
    FixTestPermissions,
    /// Create the test database if it does not exist
    #[command(alias = "create_test_db")]
    CreateTestDb,
    /// Drop all tables in the test database, migrate and verify
    #[command(alias = "reset_test_db")]
    ResetTestDb,
}

#[tokio::main]
async fn main() -> ExitCode {
    load_dotenv();
    init_tracing("db_infra=warn,migration=info,sqlx=warn");

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => e.exit(),
    };

    let result = match args.script {
        Script::CheckDb => check_db(DbProfile::Local).await,
        Script::CheckTestDb => check_db(DbProfile::Test).await,
        Script::InspectTables {
            table,
            indexes_only,
        } => inspect_tables(table.as_deref(), indexes_only).await,
        Script::InspectData { limit } => inspect_data(limit).await,
        Script::SetupMainSchema => setup_main_schema().await,
        Script::FixTestPermissions => fix_test_permissions().await,
        Script::CreateTestDb => create_test_db().await,
        Script::ResetTestDb => reset_test_db().await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ {e}");
            ExitCode::FAILURE
        }
    }
}

fn print_connection(report: &ConnectionReport, schema: &str) {
    println!("✅ Successfully connected to database '{}'!", report.database);
    println!("📊 PostgreSQL version: {}", report.server_version);
    if report.tables.is_empty() {
        println!("\n📋 No tables found in {schema} or public schema");
    } else {
        println!("\n📋 Found {} table(s):", report.tables.len());
        for table in &report.tables {
            println!("   - {table}");
        }
    }
}

fn print_steps(report: &ProvisionReport) {
    for step in &report.steps {
        let mark = match step.outcome {
            StepOutcome::Applied => "✅",
            StepOutcome::Skipped => "⏭️ ",
        };
        println!("   {mark} {}", step.label);
    }
}

async fn check_db(profile: DbProfile) -> Result<(), DbInfraError> {
    let url = database_url(profile)?;
    println!("📌 {}: {}", profile.env_var(), sanitize_db_url(&url));
    println!("🔄 Attempting to connect to database...");

    let settings = ProvisionSettings::from_env()?;
    let report = admin::check_connection(profile, &settings.schema).await?;
    print_connection(&report, &settings.schema);
    Ok(())
}

async fn inspect_tables(table: Option<&str>, indexes_only: bool) -> Result<(), DbInfraError> {
    let settings = ProvisionSettings::from_env()?;
    let conn = connect(DbProfile::Local, PoolPurpose::Admin).await?;
    let inspection = admin::inspect_schema(&conn, &settings.schema, table).await;
    conn.close().await?;

    let inspection = inspection?;
    if indexes_only {
        print!("{}", inspect::render_indexes(&inspection));
    } else {
        print!("{}", inspect::render_details(&inspection));
    }
    Ok(())
}

async fn inspect_data(limit: u64) -> Result<(), DbInfraError> {
    let settings = ProvisionSettings::from_env()?;
    let conn = connect(DbProfile::Local, PoolPurpose::Admin).await?;
    let inspection = admin::inspect_data(&conn, &settings.schema, limit).await;
    conn.close().await?;

    print!("{}", inspect::render_data(&inspection?));
    Ok(())
}

async fn setup_main_schema() -> Result<(), DbInfraError> {
    println!("{BANNER}");
    println!("Setup Main Schema Script");
    println!("{BANNER}");

    let settings = ProvisionSettings::from_env()?;
    let outcomes = admin::setup_main_schema(&settings).await?;

    let mut failed = 0;
    for outcome in &outcomes {
        println!(
            "\n🔧 Setting up {} schema in {} database for {}...",
            settings.schema, outcome.database, outcome.role
        );
        match &outcome.result {
            Ok(report) => print_steps(report),
            Err(e) => {
                failed += 1;
                println!("   ❌ Failed: {e}");
            }
        }
    }

    println!("\n{BANNER}");
    if failed > 0 {
        println!("❌ Main schema setup failed");
        println!("{BANNER}");
        return Err(DbInfraError::migration(format!(
            "schema setup failed in {failed} database(s)"
        )));
    }
    println!("✅ Main schema setup completed successfully!");
    println!("{BANNER}");
    Ok(())
}

async fn fix_test_permissions() -> Result<(), DbInfraError> {
    println!("🔧 Fixing test database permissions...");
    let settings = ProvisionSettings::from_env()?;
    let report = admin::fix_test_permissions(&settings).await?;
    print_steps(&report);
    println!("\n✅ Test database permissions fixed successfully!");
    Ok(())
}

async fn create_test_db() -> Result<(), DbInfraError> {
    let settings = ProvisionSettings::from_env()?;
    let report = admin::create_test_database(&settings).await?;
    if report.skipped() > 0 {
        println!("✓ Test database '{}' already exists", settings.test_database);
    } else {
        println!("✓ Test database '{}' created", settings.test_database);
    }
    Ok(())
}

async fn reset_test_db() -> Result<(), DbInfraError> {
    println!("{BANNER}");
    println!("Test Database Reset Script");
    println!("{BANNER}");
    println!(
        "📌 DATABASE_URL_TEST: {}\n",
        sanitize_db_url(&database_url(DbProfile::Test)?)
    );

    let settings = ProvisionSettings::from_env()?;
    let report = admin::reset_test_database(&settings.schema).await?;

    if report.dropped.is_empty() {
        println!("   ℹ️  No tables to drop");
    } else {
        for table in &report.dropped {
            println!("   Dropping table: {table}");
        }
        println!("   ✅ Dropped {} table(s)", report.dropped.len());
    }
    println!("\n✅ Migrations completed successfully");
    println!("\n🔍 Found {} table(s):", report.tables.len());
    for table in &report.tables {
        println!("   - {table}");
    }

    println!("\n{BANNER}");
    println!("✅ Test database reset completed successfully!");
    println!("{BANNER}");
    Ok(())
}
