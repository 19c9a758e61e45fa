//! Server construction and middleware wiring.

mod app;
mod config;
mod settings;
mod state_builders;

pub use app::{AppDependencies, build_app};
pub use config::ServerConfig;
pub use settings::ServerSettings;

use std::sync::Arc;

use actix_web::HttpServer;
use actix_web::dev::Server;
use mockable::{Clock, DefaultClock};
use tracing::info;

use cities_backend::outbound::session_reaper::spawn_session_reaper;
use state_builders::{build_http_state, build_session_store};

/// Construct an Actix HTTP server and start the session reaper.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(config: ServerConfig) -> std::io::Result<Server> {
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        db_pool,
        hasher,
        session_ttl,
        purge_interval,
    } = config;

    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let http_state = build_http_state(&db_pool, hasher);
    let (session_store, session_repository) = build_session_store(&db_pool, Arc::clone(&clock));

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            http_state: http_state.clone(),
            session_store: session_store.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
            session_ttl,
        })
    })
    .bind(bind_addr)?
    .run();

    spawn_session_reaper(session_repository, clock, purge_interval);
    info!(%bind_addr, "server listening");
    Ok(server)
}
