#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Standalone entry point for the crime dashboard server.
//!
//! Reads `crime_dashboard.toml` (if present) and the `CRIME_DASHBOARD_DB`
//! override, then serves until stopped.

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let config = crime_dashboard_config::load(None)?;
    crime_dashboard_server::run_server(&config).await?;

    Ok(())
}
