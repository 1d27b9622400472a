#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Report execution for the crime dashboard.
//!
//! [`reports::run`] turns one catalog entry into a [`ReportTable`]: it runs
//! the entry's grouping query, applies its post-processing (age binning,
//! hour or year extraction), then orders and truncates the rows. Nothing is
//! cached and nothing is written; every call reads the store afresh.
//!
//! [`ReportTable`]: crime_dashboard_report_models::ReportTable

pub mod derive;
pub mod reports;

use crime_dashboard_report_models::{DEFAULT_TOP_N, MalformedFieldPolicy, ReportId};
use thiserror::Error;

/// Errors that can occur while running a report.
#[derive(Debug, Error)]
pub enum AggregatorError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] switchy_database::DatabaseError),

    /// A value could not be turned into the report's derived field.
    #[error("Malformed value {value:?} in report {report}: {reason}")]
    MalformedField {
        /// Report being computed.
        report: ReportId,
        /// Offending value.
        value: String,
        /// What was expected.
        reason: &'static str,
    },

    /// A query returned a value of an unexpected type.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}

/// Knobs applied to every report run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregatorOptions {
    /// Rows kept by top-N reports.
    pub top_n: usize,
    /// Handling of values whose derived field cannot be extracted.
    pub malformed: MalformedFieldPolicy,
}

impl Default for AggregatorOptions {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            malformed: MalformedFieldPolicy::Fail,
        }
    }
}
