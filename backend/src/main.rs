//! Backend entry-point: loads configuration, prepares the database and serves
//! the REST endpoints.

mod server;

use std::io;

use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use cities_backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
use cities_backend::outbound::password::BcryptPasswordHasher;
use cities_backend::outbound::persistence::{DbPool, PoolConfig, migrate};
use server::{ServerConfig, ServerSettings, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load_from_iter(std::env::args_os())
        .map_err(|err| io::Error::other(format!("failed to load configuration: {err}")))?;
    let database_url = settings.database_url().map_err(io::Error::other)?.to_owned();
    let bind_addr = settings.bind_addr().map_err(io::Error::other)?;

    let applied = migrate(database_url.clone())
        .await
        .map_err(io::Error::other)?;
    info!(applied, "database migrations complete");

    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(settings.pool_max_size()))
        .await
        .map_err(io::Error::other)?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(io::Error::other)?;
    let hasher = BcryptPasswordHasher::new(settings.bcrypt_cost()).map_err(io::Error::other)?;

    let config = ServerConfig::new(session, bind_addr, pool)
        .with_hasher(hasher)
        .with_session_ttl(settings.session_ttl().map_err(io::Error::other)?)
        .with_purge_interval(settings.purge_interval().map_err(io::Error::other)?);

    create_server(config)?.await
}
