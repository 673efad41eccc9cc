//! Backend entry-point: loads settings, runs migrations and serves the API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Context, Result};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{AppSettings, ServerConfig, create_server};
use yelpcamp::inbound::http::health::HealthState;
use yelpcamp::inbound::http::session_config::{BuildMode, SessionSettings};
use yelpcamp::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().wrap_err("load configuration")?;
    let bind_addr = settings.bind_addr().wrap_err("parse bind address")?;
    let session = SessionSettings::from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .wrap_err("load session settings")?;
    info!(
        key_fingerprint = %session.fingerprint(),
        cookie_secure = session.cookie_secure,
        "session key loaded"
    );

    let mut config = ServerConfig::new(session, bind_addr, settings.clone());
    match settings.database_url.as_deref() {
        Some(url) => {
            let pool_config = PoolConfig::new(url).with_max_size(settings.db_max_connections());
            let applied = run_pending_migrations(url)
                .await
                .wrap_err_with(|| format!("migrate {}", pool_config.redacted_url()))?;
            info!(applied, "database migrations applied");
            let pool = DbPool::new(pool_config)
                .await
                .wrap_err("connect to database")?;
            config = config.with_db_pool(pool);
        }
        None => warn!("YELPCAMP_DATABASE_URL unset; using in-memory stores"),
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config).wrap_err("start HTTP server")?;
    info!(%bind_addr, "listening");
    server.await.wrap_err("HTTP server failed")
}
