//! Timesheet HTTP server entry-point.

mod server;

use actix_web::web;
use mockable::DefaultEnv;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use timesheet::inbound::http::health::HealthState;
use timesheet::inbound::http::session_config::{BuildMode, session_settings_from_env};
use timesheet::outbound::persistence::{DbPool, run_pending_migrations};
use timesheet::settings::AppSettings;

fn startup_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(format!("{context}: {err}"))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        AppSettings::from_env("timesheet").map_err(|e| startup_error("settings", e))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(|e| startup_error("session configuration", e))?;
    let pool_config = settings
        .pool_config()
        .map_err(|e| startup_error("database configuration", e))?;

    let applied = run_pending_migrations(pool_config.database_url())
        .await
        .map_err(|e| startup_error("database migrations", e))?;
    info!(applied, "database schema is up to date");

    let db_pool = DbPool::new(pool_config)
        .await
        .map_err(|e| startup_error("database pool", e))?;
    let mail = settings
        .mail_settings()
        .map_err(|e| startup_error("mail configuration", e))?;
    let mailer = settings
        .mailer()
        .map_err(|e| startup_error("mail transport", e))?;
    let bind_addr = settings
        .bind_addr()
        .map_err(|e| startup_error("bind address", e))?;

    let config = ServerConfig::new(session, bind_addr, db_pool, mail, mailer);
    let health_state = web::Data::new(HealthState::new());
    info!(%bind_addr, "starting HTTP server");
    create_server(health_state, config)?.await
}
