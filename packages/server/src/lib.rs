#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web JSON API for the dwelling fire risk dashboard.
//!
//! Serves the three dashboard analyses and the query catalog from the
//! `DuckDB` store configured by `FIRE_RISK_DB_PATH`. All handlers share one
//! caching [`Gateway`], so each catalog query hits the store at most once
//! per process until the cache is cleared through `DELETE /api/cache`.

mod handlers;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use fire_risk_database::{DuckDbStore, Gateway, QueryExecutor};

/// Executor type shared by the handlers.
pub type SharedExecutor = Arc<dyn QueryExecutor>;

/// Shared application state.
pub struct AppState {
    /// Caching gateway in front of the analytical store.
    pub gateway: Arc<Gateway<SharedExecutor>>,
}

impl AppState {
    /// Creates state with a fresh cache around `executor`.
    #[must_use]
    pub fn new(executor: SharedExecutor) -> Self {
        Self {
            gateway: Arc::new(Gateway::new(executor)),
        }
    }
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/vehicles", web::get().to(handlers::vehicles))
            .route("/locations", web::get().to(handlers::locations))
            .route("/human-cost", web::get().to(handlers::human_cost))
            .route("/queries", web::get().to(handlers::queries))
            .route("/cache", web::delete().to(handlers::clear_cache))
            .route("/cache/{name}", web::delete().to(handlers::invalidate_cache)),
    );
}

/// Starts the dashboard API server.
///
/// The store is opened per query, so a missing store file does not stop
/// the server from starting; the analysis endpoints answer 503 until it
/// exists. This is a regular async function; the caller provides the
/// runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let store = DuckDbStore::from_env();
    if store.path().is_file() {
        log::info!("Using store at {}", store.path().display());
    } else {
        log::warn!(
            "Store not found at {}; analysis endpoints will report data unavailable",
            store.path().display()
        );
    }

    let state = web::Data::new(AppState::new(Arc::new(store)));

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
