#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Presentation of report tables.
//!
//! A [`ReportTable`] is presented two independent ways: as a chart
//! ([`chart::render`], drawn to SVG by [`chart::Chart::to_svg`]) and as a
//! CSV download ([`export::export`]). [`page::render_page`] assembles the
//! charts into the dashboard page. None of these transform the counts.
//!
//! [`ReportTable`]: crime_dashboard_report_models::ReportTable

pub mod chart;
pub mod export;
pub mod page;

use thiserror::Error;

/// Errors that can occur while presenting a report.
#[derive(Debug, Error)]
pub enum PresenterError {
    /// CSV serialization failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Writing an export failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Drawing a chart failed.
    #[error("Chart error: {0}")]
    Chart(String),
}

/// Escapes text for inclusion in HTML or SVG markup.
#[must_use]
pub fn escape_markup(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_markup(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
        assert_eq!(escape_markup("Delhi"), "Delhi");
    }
}
