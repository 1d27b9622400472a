#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the crime dashboard server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the report types to allow independent evolution of the API
//! contract.

use crime_dashboard_report_models::{
    CategoryCount, ChartKind, ReportDefinition, ReportId, ReportTable,
};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Overview metric shown above the reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiOverview {
    /// Number of incidents in the store.
    pub total_incidents: u64,
    /// Number of reports in the catalog.
    pub report_count: usize,
}

/// A catalog entry as listed by `GET /api/reports`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiReportSummary {
    /// Report identifier, used in report URLs.
    pub id: ReportId,
    /// Section heading.
    pub heading: String,
    /// Chart title.
    pub title: String,
    /// How the report is charted.
    pub chart: ChartKind,
    /// Export file name.
    pub export_file: String,
    /// URL of the report's JSON table.
    pub href: String,
    /// URL of the rendered chart.
    pub chart_href: String,
    /// URL of the CSV download.
    pub export_href: String,
}

impl From<&ReportDefinition> for ApiReportSummary {
    fn from(definition: &ReportDefinition) -> Self {
        let href = format!("/api/reports/{}", definition.id);
        Self {
            id: definition.id,
            heading: definition.heading.to_string(),
            title: definition.title.to_string(),
            chart: definition.chart,
            export_file: definition.export_file.to_string(),
            chart_href: format!("{href}/chart.svg"),
            export_href: format!("{href}/export"),
            href,
        }
    }
}

/// A computed report as returned by `GET /api/reports/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiReport {
    /// Report identifier.
    pub id: ReportId,
    /// Chart title.
    pub title: String,
    /// Header of the category column.
    pub category_header: String,
    /// Header of the count column.
    pub count_header: String,
    /// Sum of all row counts.
    pub total: u64,
    /// Rows in report order.
    pub rows: Vec<CategoryCount>,
}

impl From<ReportTable> for ApiReport {
    fn from(table: ReportTable) -> Self {
        let definition = table.definition();
        Self {
            id: table.report,
            title: definition.title.to_string(),
            category_header: definition.category_header.to_string(),
            count_header: definition.count_header.to_string(),
            total: table.total(),
            rows: table.rows,
        }
    }
}

/// JSON error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// What went wrong.
    pub error: String,
}

impl ApiError {
    /// Creates an error body with the given message.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Query parameters for the dashboard page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQueryParams {
    /// Color theme, `light` or `dark`.
    pub theme: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_links_to_report_endpoints() {
        let summary = ApiReportSummary::from(ReportId::TimeOfDay.definition());
        assert_eq!(summary.href, "/api/reports/time_of_day");
        assert_eq!(summary.chart_href, "/api/reports/time_of_day/chart.svg");
        assert_eq!(summary.export_href, "/api/reports/time_of_day/export");
        assert_eq!(summary.export_file, "Time_of_Day_Crime_Trend.csv");
        assert_eq!(summary.chart, ChartKind::Line);
    }

    #[test]
    fn report_carries_total_and_headers() {
        let report = ApiReport::from(ReportTable {
            report: ReportId::CityCrimes,
            rows: vec![CategoryCount::new("Delhi", 5), CategoryCount::new("Pune", 3)],
        });
        assert_eq!(report.total, 8);
        assert_eq!(report.category_header, "City");
        assert_eq!(report.count_header, "Total_Crimes");
        assert_eq!(report.rows.len(), 2);
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(ApiOverview {
            total_incidents: 3,
            report_count: 9,
        })
        .unwrap();
        assert_eq!(json["totalIncidents"], 3);
        assert_eq!(json["reportCount"], 9);

        let json = serde_json::to_value(ApiReportSummary::from(
            ReportId::CityCrimes.definition(),
        ))
        .unwrap();
        assert_eq!(json["id"], "city_crimes");
        assert_eq!(json["exportHref"], "/api/reports/city_crimes/export");
    }
}
