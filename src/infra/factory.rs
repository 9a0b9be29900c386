use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::domain::ports::{AttendeeRepository, EventRepository, UserRepository};
use crate::error::StartupError;
use crate::state::AppState;
use crate::infra::repositories::{
    postgres_attendee_repo::PostgresAttendeeRepo, postgres_event_repo::PostgresEventRepo,
    postgres_user_repo::PostgresUserRepo,
    sqlite_attendee_repo::SqliteAttendeeRepo, sqlite_event_repo::SqliteEventRepo,
    sqlite_user_repo::SqliteUserRepo,
};

pub fn is_postgres_url(database_url: &str) -> bool {
    database_url.starts_with("postgres://") || database_url.starts_with("postgresql://")
}

/// Connects to the configured store, migrates it and provisions the default
/// admin. Postgres is used for `postgres://` URLs, SQLite otherwise.
pub async fn bootstrap_state(config: &Config) -> Result<AppState, StartupError> {
    let database_url = &config.database_url;

    if is_postgres_url(database_url) {
        info!("Initializing PostgreSQL connection...");

        let opts: PgConnectOptions = database_url.parse::<PgConnectOptions>()?
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await?;

        postgres_state(pool, config).await
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await?;

        sqlite_state(pool, config).await
    }
}

pub async fn postgres_state(pool: PgPool, config: &Config) -> Result<AppState, StartupError> {
    info!("Running PostgreSQL migrations...");
    sqlx::migrate!("./migrations/postgres").run(&pool).await?;

    assemble(
        config,
        Arc::new(PostgresEventRepo::new(pool.clone())),
        Arc::new(PostgresAttendeeRepo::new(pool.clone())),
        Arc::new(PostgresUserRepo::new(pool)),
    ).await
}

pub async fn sqlite_state(pool: SqlitePool, config: &Config) -> Result<AppState, StartupError> {
    info!("Running SQLite migrations...");
    sqlx::migrate!("./migrations/sqlite").run(&pool).await?;

    assemble(
        config,
        Arc::new(SqliteEventRepo::new(pool.clone())),
        Arc::new(SqliteAttendeeRepo::new(pool.clone())),
        Arc::new(SqliteUserRepo::new(pool)),
    ).await
}

async fn assemble(
    config: &Config,
    event_repo: Arc<dyn EventRepository>,
    attendee_repo: Arc<dyn AttendeeRepository>,
    user_repo: Arc<dyn UserRepository>,
) -> Result<AppState, StartupError> {
    let state = AppState::new(config.clone(), event_repo, attendee_repo, user_repo);

    state.auth_service
        .ensure_default_admin(&config.default_admin_username, &config.default_admin_password)
        .await?;

    Ok(state)
}
