#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web server for the crime dashboard.
//!
//! Serves the dashboard page at `/` and a REST API under `/api` for the
//! report catalog, per-report tables, rendered charts and CSV downloads.
//! Every request reads the incident store afresh; the only shared state is
//! the read-only database handle opened at startup.

mod handlers;
pub mod interactive;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use crime_dashboard_aggregator::AggregatorOptions;
use crime_dashboard_config::DashboardConfig;
use crime_dashboard_database::{DbError, db};
use switchy_database::Database;
use thiserror::Error;

/// Errors that can stop the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The incident store could not be opened.
    #[error(transparent)]
    Database(#[from] DbError),

    /// The HTTP server failed to bind or run.
    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shared application state.
pub struct AppState {
    /// Incident store connection.
    pub db: Arc<dyn Database>,
    /// Report options from the configuration.
    pub options: AggregatorOptions,
}

/// Report options taken from the dashboard configuration.
#[must_use]
pub const fn aggregator_options(config: &DashboardConfig) -> AggregatorOptions {
    AggregatorOptions {
        top_n: config.top_n,
        malformed: config.malformed_fields,
    }
}

/// Registers the page and API routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::index)).service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/overview", web::get().to(handlers::overview))
            .route("/reports", web::get().to(handlers::report_catalog))
            .route("/reports/{id}", web::get().to(handlers::report))
            .route(
                "/reports/{id}/chart.svg",
                web::get().to(handlers::report_chart),
            )
            .route("/reports/{id}/export", web::get().to(handlers::report_export)),
    );
}

/// Starts the dashboard server.
///
/// Opens the incident store named by the configuration, verifying its
/// schema, then serves until the process is stopped. The caller provides
/// the async runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns [`ServerError::Database`] if the store is missing or lacks the
/// columns the reports use, and [`ServerError::Io`] if the HTTP server
/// fails to bind or run.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: &DashboardConfig) -> Result<(), ServerError> {
    log::info!(
        "Opening incident store at {}...",
        config.database_path.display()
    );
    let db_conn = db::open(&config.database_path).await?;

    let state = web::Data::new(AppState {
        db: Arc::from(db_conn),
        options: aggregator_options(config),
    });

    let bind_addr = config.bind_addr.clone();
    let port = config.port;

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
    .await?;

    Ok(())
}
