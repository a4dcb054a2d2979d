#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web dashboard server for the Noto festival map.
//!
//! Loads the area boundaries, population table and festival spreadsheet
//! once at startup (or on every request with `reload_per_request`), and
//! serves a dashboard page whose embedded map is re-rendered for each
//! change of the town and month filters.

pub mod config;
mod handlers;
pub mod html;
pub mod interactive;
pub mod pipeline;
pub mod video;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use festival_map_festival::FestivalError;
use festival_map_geography::GeoError;
use festival_map_map::MapError;
use thiserror::Error;

use crate::config::AppConfig;
use crate::pipeline::Dataset;

/// Errors that can occur while loading data or serving requests.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Area boundaries or population could not be loaded.
    #[error(transparent)]
    Geo(#[from] GeoError),

    /// The festival spreadsheet could not be loaded.
    #[error(transparent)]
    Festival(#[from] FestivalError),

    /// The map page could not be rendered.
    #[error(transparent)]
    Map(#[from] MapError),

    /// Reading a file failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// File being read or written.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The HTTP server failed to bind or run.
    #[error("Server error: {0}")]
    Http(#[from] std::io::Error),

    /// The configuration file is malformed.
    #[error("Configuration error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A blocking task was cancelled.
    #[error("Blocking task failed: {0}")]
    Blocking(#[from] actix_web::error::BlockingError),

    /// Query parameters are out of range.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

/// Shared application state.
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// Data loaded at startup.
    pub dataset: Arc<Dataset>,
}

impl AppState {
    #[must_use]
    pub fn new(config: AppConfig, dataset: Dataset) -> Self {
        Self {
            config: Arc::new(config),
            dataset: Arc::new(dataset),
        }
    }

    /// The dataset to serve a request from, reloaded from disk when the
    /// configuration asks for it.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] if reloading fails.
    pub async fn dataset(&self) -> Result<Arc<Dataset>, ServerError> {
        if !self.config.reload_per_request {
            return Ok(Arc::clone(&self.dataset));
        }

        log::debug!("Reloading dataset for request");
        let config = Arc::clone(&self.config);
        let dataset = web::block(move || pipeline::load_dataset(&config)).await??;
        Ok(Arc::new(dataset))
    }
}

/// Registers the dashboard routes.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::index))
        .route("/map", web::get().to(handlers::map))
        .service(
            web::scope("/api")
                .route("/health", web::get().to(handlers::health))
                .route("/options", web::get().to(handlers::options))
                .route("/video", web::get().to(handlers::video)),
        );
}

/// Starts the festival map server.
///
/// Loads the dataset described by `config` and serves the dashboard on
/// the configured address. The caller provides the async runtime (e.g.
/// via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns [`ServerError`] if an input file cannot be loaded or the HTTP
/// server fails to bind.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: AppConfig) -> Result<(), ServerError> {
    log::info!("Loading dataset...");
    let dataset = pipeline::load_dataset(&config)?;

    let bind_addr = config.server.bind_addr.clone();
    let port = config.server.port;
    let state = web::Data::new(AppState::new(config, dataset));

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(routes)
    })
    .bind((bind_addr, port))?
    .run()
    .await?;

    Ok(())
}
