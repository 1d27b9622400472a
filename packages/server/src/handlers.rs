//! HTTP handler functions for the crime dashboard.

use std::str::FromStr as _;

use actix_web::{HttpResponse, web};
use crime_dashboard_aggregator::reports;
use crime_dashboard_presenter::chart::render_default;
use crime_dashboard_presenter::export::{CSV_MIME, export};
use crime_dashboard_presenter::page::{PageSection, Theme, render_page};
use crime_dashboard_report_models::{ReportId, ReportTable, catalog};
use crime_dashboard_server_models::{
    ApiError, ApiHealth, ApiOverview, ApiReport, ApiReportSummary, PageQueryParams,
};

use crate::AppState;

/// Parses a report id from a URL path segment.
fn parse_report_id(id: &str) -> Option<ReportId> {
    ReportId::from_str(id).ok()
}

fn parse_theme(theme: Option<&str>) -> Theme {
    theme
        .and_then(|t| Theme::from_str(t.trim()).ok())
        .unwrap_or_default()
}

/// Runs the report named by `id`, or returns the error response to send.
async fn load_report(state: &AppState, id: &str) -> Result<ReportTable, HttpResponse> {
    let Some(report) = parse_report_id(id) else {
        return Err(HttpResponse::NotFound().json(ApiError::new(format!("Unknown report: {id}"))));
    };

    reports::run(state.db.as_ref(), report.definition(), &state.options)
        .await
        .map_err(|e| {
            log::error!("Failed to run report {report}: {e}");
            HttpResponse::InternalServerError().json(ApiError::new(format!(
                "Failed to run report {report}: {e}"
            )))
        })
}

/// `GET /`
///
/// Renders the dashboard page. `?theme=dark` switches to the dark theme.
pub async fn index(
    state: web::Data<AppState>,
    params: web::Query<PageQueryParams>,
) -> HttpResponse {
    let theme = parse_theme(params.theme.as_deref());

    let total = match reports::total_incidents(state.db.as_ref()).await {
        Ok(total) => Some(total),
        Err(e) => {
            log::error!("Failed to count incidents: {e}");
            None
        }
    };

    let outcomes = reports::run_all(state.db.as_ref(), &state.options).await;
    let sections: Vec<PageSection<'_>> = outcomes
        .iter()
        .map(|outcome| PageSection {
            definition: outcome.definition,
            content: outcome.result.as_ref().map_err(ToString::to_string),
        })
        .collect();

    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(render_page(total, &sections, theme))
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/overview`
pub async fn overview(state: web::Data<AppState>) -> HttpResponse {
    match reports::total_incidents(state.db.as_ref()).await {
        Ok(total_incidents) => HttpResponse::Ok().json(ApiOverview {
            total_incidents,
            report_count: catalog().len(),
        }),
        Err(e) => {
            log::error!("Failed to count incidents: {e}");
            HttpResponse::InternalServerError().json(ApiError::new("Failed to count incidents"))
        }
    }
}

/// `GET /api/reports`
///
/// Lists the report catalog in page order.
pub async fn report_catalog() -> HttpResponse {
    let summaries: Vec<ApiReportSummary> = catalog().iter().map(ApiReportSummary::from).collect();
    HttpResponse::Ok().json(summaries)
}

/// `GET /api/reports/{id}`
pub async fn report(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    match load_report(&state, &path).await {
        Ok(table) => HttpResponse::Ok().json(ApiReport::from(table)),
        Err(response) => response,
    }
}

/// `GET /api/reports/{id}/chart.svg`
pub async fn report_chart(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    match load_report(&state, &path).await {
        Ok(table) => match render_default(&table).to_svg() {
            Ok(svg) => HttpResponse::Ok().content_type("image/svg+xml").body(svg),
            Err(e) => {
                log::error!("Failed to draw chart for {}: {e}", table.report);
                HttpResponse::InternalServerError().json(ApiError::new("Failed to draw chart"))
            }
        },
        Err(response) => response,
    }
}

/// `GET /api/reports/{id}/export`
///
/// Downloads the report table as CSV under the report's export file name.
pub async fn report_export(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let table = match load_report(&state, &path).await {
        Ok(table) => table,
        Err(response) => return response,
    };

    match export(&table) {
        Ok(bytes) => HttpResponse::Ok()
            .content_type(format!("{CSV_MIME}; charset=utf-8"))
            .insert_header((
                "Content-Disposition",
                format!(
                    "attachment; filename=\"{}\"",
                    table.definition().export_file
                ),
            ))
            .body(bytes),
        Err(e) => {
            log::error!("Failed to export report {}: {e}", table.report);
            HttpResponse::InternalServerError().json(ApiError::new("Failed to export report"))
        }
    }
}
