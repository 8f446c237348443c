use std::future::Future;
use std::time::{Duration, Instant};

use migration::{migrate, MigrationCommand, Migrator, MigratorTrait};
use rand::Rng;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tracing::{info, trace, warn};

use crate::config::db::{database_name, database_url, sanitize_db_url, sql_echo, DbProfile};
use crate::error::DbInfraError;
use crate::infra::db::locking::{Guard, MigrationLock, PgAdvisoryLock};

const CONNECT_ATTEMPTS: u32 = 5;
const CONNECT_INTERVAL_MS: u64 = 500;
const MIGRATION_BODY_TIMEOUT_MS: u64 = 120_000;

/// Pool shape for a connection.
///
/// Admin pools are pinned to a single session so the advisory lock and the
/// statements that follow it share one backend connection. Provision pools
/// have the admin shape but never echo SQL, since role statements carry
/// passwords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolPurpose {
    Admin,
    Provision,
    Runtime,
}

impl PoolPurpose {
    fn options(self, url: &str) -> ConnectOptions {
        let mut opt = ConnectOptions::new(url);
        match self {
            PoolPurpose::Admin | PoolPurpose::Provision => {
                opt.min_connections(1)
                    .max_connections(1)
                    .acquire_timeout(Duration::from_secs(2));
            }
            PoolPurpose::Runtime => {
                opt.min_connections(1)
                    .max_connections(10)
                    .acquire_timeout(Duration::from_secs(5));
            }
        }
        opt.sqlx_logging(self != PoolPurpose::Provision && sql_echo());
        opt
    }
}

async fn retry_connection<T, F, Fut>(
    mut connect_fn: F,
    max_attempts: u32,
    interval_ms: u64,
) -> Result<T, DbInfraError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbInfraError>>,
{
    let mut last_error = None;

    for attempt in 1..=max_attempts {
        match connect_fn().await {
            Ok(result) => {
                if attempt > 1 {
                    info!(
                        "connection_retry=success attempts={} interval_ms={}",
                        attempt, interval_ms
                    );
                }
                return Ok(result);
            }
            Err(e) => {
                last_error = Some(e);
                if attempt < max_attempts {
                    warn!(
                        "connection_retry=failed attempt={} max_attempts={} interval_ms={}",
                        attempt, max_attempts, interval_ms
                    );
                    tokio::time::sleep(Duration::from_millis(interval_ms)).await;
                }
            }
        }
    }

    Err(last_error
        .unwrap_or_else(|| DbInfraError::connect("no connection attempt was made")))
}

/// Connect to an explicit URL with bounded retry.
pub async fn connect_url(url: &str, purpose: PoolPurpose) -> Result<DatabaseConnection, DbInfraError> {
    let opt = purpose.options(url);
    let sanitized = sanitize_db_url(url);

    retry_connection(
        || {
            let opt = opt.clone();
            let sanitized = sanitized.clone();
            async move {
                Database::connect(opt).await.map_err(|e| {
                    DbInfraError::connect(format!(
                        "failed to connect to Postgres ({purpose:?} pool, {sanitized}): {e}"
                    ))
                })
            }
        },
        CONNECT_ATTEMPTS,
        CONNECT_INTERVAL_MS,
    )
    .await
}

/// Connect to the database configured for `profile`.
pub async fn connect(
    profile: DbProfile,
    purpose: PoolPurpose,
) -> Result<DatabaseConnection, DbInfraError> {
    let url = database_url(profile)?;
    connect_url(&url, purpose).await
}

async fn fast_path_schema_check(conn: &DatabaseConnection) -> Result<bool, DbInfraError> {
    let expected_count = Migrator::migrations().len();
    let expected_last = Migrator::migrations()
        .last()
        .map(|m| m.name().to_string())
        .unwrap_or_default();

    let (current_count, current_last) = match Migrator::get_applied_migrations(conn).await {
        Ok(migrations) => {
            let last = migrations.last().map(|m| m.name().to_string());
            (migrations.len(), last)
        }
        Err(DbErr::Exec(_)) | Err(DbErr::Query(_)) => {
            trace!(fastpath = "miss", reason = "migration_table_missing");
            return Ok(false);
        }
        Err(e) => {
            return Err(DbInfraError::migration(format!(
                "failed to get applied migrations: {e}"
            )));
        }
    };

    let is_up_to_date = current_count == expected_count
        && !expected_last.is_empty()
        && current_last.as_deref() == Some(expected_last.as_str());

    trace!(
        fastpath = if is_up_to_date { "hit" } else { "miss" },
        current_count = current_count,
        expected_count = expected_count,
        current_last = %current_last.as_deref().unwrap_or(""),
        expected_last = %expected_last
    );

    Ok(is_up_to_date)
}

/// Run a migration command against the database of `profile`.
///
/// Opens a single-session admin pool, serializes concurrent runners through
/// a Postgres advisory lock and verifies the applied count afterwards.
pub async fn orchestrate_migration(
    profile: DbProfile,
    command: MigrationCommand,
) -> Result<(), DbInfraError> {
    let url = database_url(profile)?;
    let admin_pool = connect_url(&url, PoolPurpose::Admin).await?;

    let result = orchestrate_migration_internal(&admin_pool, &url, profile, command).await;
    if let Err(e) = admin_pool.close().await {
        warn!(error = %e, "failed to close admin pool");
    }
    result
}

pub async fn orchestrate_migration_internal(
    pool: &DatabaseConnection,
    url: &str,
    profile: DbProfile,
    command: MigrationCommand,
) -> Result<(), DbInfraError> {
    let db_name = database_name(url)?;
    info!(
        "migrate=start profile={:?} command={:?} database={}",
        profile, command, db_name
    );

    if matches!(command, MigrationCommand::Status) {
        migrate(pool, command)
            .await
            .map_err(|e| DbInfraError::migration(format!("migration execution failed: {e}")))?;
        info!("migrate=done");
        return Ok(());
    }

    let key = format!("geo:migrate:{}", sanitize_db_url(url));
    let lock = PgAdvisoryLock::new(pool, &key);
    let result = migrate_with_lock(pool, lock, profile, command).await;

    info!("migrate=done");
    result
}

fn lock_acquire_timeout_ms(profile: DbProfile) -> u64 {
    std::env::var("MIGRATE_LOCK_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(match profile {
            DbProfile::Test => 3_000,
            DbProfile::Local => 10_000,
        })
}

async fn migrate_with_lock<'a, L>(
    pool: &'a DatabaseConnection,
    mut lock: L,
    profile: DbProfile,
    command: MigrationCommand,
) -> Result<(), DbInfraError>
where
    L: MigrationLock<'a>,
{
    let lock_acquire_ms = lock_acquire_timeout_ms(profile);
    let start = Instant::now();

    let mut attempts: u32 = 0;
    let guard = loop {
        attempts += 1;

        if matches!(command, MigrationCommand::Up) && fast_path_schema_check(pool).await? {
            info!("migrate=skipped up_to_date=true");
            return Ok(());
        }

        if let Some(acquired) = lock.try_acquire().await? {
            trace!(
                lock = "won",
                attempts = attempts,
                elapsed_ms = start.elapsed().as_millis()
            );
            break acquired;
        }

        let base_delay_ms = (5u64 << attempts.saturating_sub(1).min(16)).min(80);
        let jitter_ms = rand::rng().random::<u64>() % 4;
        let delay_ms = base_delay_ms + jitter_ms;

        trace!(
            lock = "backoff",
            attempts = attempts,
            delay_ms = delay_ms,
            elapsed_ms = start.elapsed().as_millis()
        );

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        if start.elapsed() >= Duration::from_millis(lock_acquire_ms) {
            return Err(DbInfraError::migration(format!(
                "migration lock acquisition timeout after {:?} ({} attempts)",
                start.elapsed(),
                attempts
            )));
        }
    };

    match run_guarded(pool, guard, profile, command).await {
        Ok(guard) => {
            if let Err(release_err) = guard.release().await {
                warn!(error = %release_err, "Failed to release migration guard");
            }
            Ok(())
        }
        Err((guard, migration_err)) => {
            if let Err(release_err) = guard.release().await {
                warn!(error = %release_err, "Failed to release migration guard after error");
            }
            Err(migration_err)
        }
    }
}

async fn run_guarded<'a>(
    pool: &'a DatabaseConnection,
    guard: Guard<'a>,
    profile: DbProfile,
    command: MigrationCommand,
) -> Result<Guard<'a>, (Guard<'a>, DbInfraError)> {
    let start = Instant::now();

    let body = tokio::time::timeout(
        Duration::from_millis(MIGRATION_BODY_TIMEOUT_MS),
        migrate(pool, command),
    );
    let migration_result = match body.await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(DbInfraError::migration(format!("migration execution failed: {e}"))),
        Err(_) => {
            info!(
                elapsed_ms = start.elapsed().as_millis(),
                "Migration body timeout - migration dropped"
            );
            Err(DbInfraError::migration(format!(
                "migration body execution timed out after {MIGRATION_BODY_TIMEOUT_MS}ms"
            )))
        }
    };

    if let Err(e) = migration_result {
        return Err((guard, e));
    }

    info!(
        migrator = "ran",
        profile = ?profile,
        elapsed_ms = start.elapsed().as_millis()
    );

    let expected_count = Migrator::migrations().len();
    let applied_count = migration::count_applied_migrations(pool).await.unwrap_or(0);
    info!(
        migrate = "counts",
        expected_count = expected_count,
        applied_count = applied_count
    );

    if let Err(detail) = verify_applied_count(command, expected_count, applied_count) {
        return Err((guard, DbInfraError::migration(detail)));
    }

    Ok(guard)
}

/// Post-condition of each migration command on the applied count.
fn verify_applied_count(
    command: MigrationCommand,
    expected_count: usize,
    applied_count: usize,
) -> Result<(), String> {
    match command {
        MigrationCommand::Reset if applied_count != 0 => Err(format!(
            "Migration verification failed: reset should leave 0 migrations applied, but {applied_count} were found"
        )),
        MigrationCommand::Up | MigrationCommand::Fresh | MigrationCommand::Refresh
            if applied_count != expected_count =>
        {
            Err(format!(
                "Migration verification failed: expected {expected_count} migrations, but {applied_count} were applied"
            ))
        }
        _ => Ok(()),
    }
}
