use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;
use tera::Tera;

use crate::config::Config;
use crate::domain::services::sessions::ReservationSessions;
use crate::state::AppState;
use crate::infra::email::http_email_service::HttpEmailService;
use crate::infra::payment::razorpay_gateway::RazorpayGateway;
use crate::infra::verification::http_otp_gateway::HttpOtpGateway;
use crate::infra::repositories::{
    postgres_blocked_date_repo::PostgresBlockedDateRepo, postgres_booking_repo::PostgresBookingRepo,
    postgres_resource_repo::PostgresResourceRepo,
    sqlite_blocked_date_repo::SqliteBlockedDateRepo, sqlite_booking_repo::SqliteBookingRepo,
    sqlite_resource_repo::SqliteResourceRepo,
};

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;
    let email_service = Arc::new(HttpEmailService::new(
        config.mail_service_url.clone(),
        config.mail_service_token.clone(),
    ));
    let otp_gateway = Arc::new(HttpOtpGateway::new(
        config.otp_service_url.clone(),
        config.otp_service_key.clone(),
    ));
    let payment_gateway = Arc::new(RazorpayGateway::new(
        config.razorpay_url.clone(),
        config.razorpay_key_id.clone(),
        config.razorpay_key_secret.clone(),
    ));

    let mut tera = Tera::default();
    tera.add_raw_template("invoice.html", include_str!("../templates/invoice.html"))
        .expect("Failed to load invoice template");
    let templates = Arc::new(tera);

    let sessions = Arc::new(ReservationSessions::new());

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        AppState {
            config: config.clone(),
            resource_repo: Arc::new(PostgresResourceRepo::new(pool.clone())),
            blocked_date_repo: Arc::new(PostgresBlockedDateRepo::new(pool.clone())),
            booking_repo: Arc::new(PostgresBookingRepo::new(pool.clone())),
            otp_gateway,
            payment_gateway,
            email_service,
            templates,
            sessions,
        }
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        AppState {
            config: config.clone(),
            resource_repo: Arc::new(SqliteResourceRepo::new(pool.clone())),
            blocked_date_repo: Arc::new(SqliteBlockedDateRepo::new(pool.clone())),
            booking_repo: Arc::new(SqliteBookingRepo::new(pool.clone())),
            otp_gateway,
            payment_gateway,
            email_service,
            templates,
            sessions,
        }
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
