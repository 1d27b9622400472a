//! The dashboard page.

use crime_dashboard_report_models::{ReportDefinition, ReportTable};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::chart::render_default;
use crate::escape_markup;

/// Page title.
pub const PAGE_TITLE: &str = "Crime Pattern Detection Dashboard";

/// Color theme of the page.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// The other theme, linked from the page's toggle.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// One report section on the page.
#[derive(Debug)]
pub struct PageSection<'a> {
    /// Catalog entry shown in this section.
    pub definition: &'static ReportDefinition,
    /// The computed table, or the error message to show instead.
    pub content: Result<&'a ReportTable, String>,
}

const STYLE: &str = "\
:root{--bg:#ffffff;--fg:#1f2933;--card:#f5f7fa;--muted:#616e7c;--accent:#4e79a7;--error:#c81e1e}\
body.dark{--bg:#12161c;--fg:#e4e7eb;--card:#1f2630;--muted:#9aa5b1;--accent:#7aa6d8;--error:#f87171}\
body{margin:0;font-family:system-ui,sans-serif;background:var(--bg);color:var(--fg)}\
header{display:flex;justify-content:space-between;align-items:center;padding:1rem 2rem}\
header a{color:var(--accent)}\
main{max-width:960px;margin:0 auto;padding:0 2rem 2rem}\
.metric{background:var(--card);border-radius:8px;padding:1rem 1.5rem;margin-bottom:1.5rem}\
.metric .value{font-size:2.5rem;font-weight:700}\
section{background:var(--card);border-radius:8px;padding:1rem 1.5rem;margin-bottom:1.5rem}\
section svg{width:100%;height:auto;border-radius:4px}\
.download{display:inline-block;margin-top:.5rem;color:var(--accent)}\
.error{color:var(--error)}\
footer{text-align:center;color:var(--muted);padding:1rem}";

fn render_section(section: &PageSection<'_>) -> String {
    let definition = section.definition;
    let mut html = format!(
        "<section id=\"{}\"><h2>{}</h2>",
        definition.id,
        escape_markup(definition.heading)
    );

    match &section.content {
        Ok(table) => {
            match render_default(table).to_svg() {
                Ok(svg) => html.push_str(&svg),
                Err(e) => {
                    log::error!("Failed to draw chart for {}: {e}", definition.id);
                    html.push_str("<p class=\"error\">The chart could not be drawn.</p>");
                }
            }
            html.push_str(&format!(
                "<a class=\"download\" href=\"/api/reports/{}/export\" download=\"{}\">{}</a>",
                definition.id,
                escape_markup(definition.export_file),
                escape_markup(definition.download_label),
            ));
        }
        Err(message) => {
            html.push_str(&format!(
                "<p class=\"error\">This report could not be computed: {}</p>",
                escape_markup(message)
            ));
        }
    }

    html.push_str("</section>");
    html
}

/// Renders the dashboard as a complete HTML document.
///
/// `total_incidents` is the overview metric; `None` renders it as
/// unavailable. Sections appear in the order given, each with its chart and
/// download link or, for a failed report, an error notice.
#[must_use]
pub fn render_page(
    total_incidents: Option<u64>,
    sections: &[PageSection<'_>],
    theme: Theme,
) -> String {
    let total = total_incidents.map_or_else(|| "unavailable".to_string(), |n| n.to_string());
    let body_class = match theme {
        Theme::Light => "light",
        Theme::Dark => "dark",
    };

    let mut html = format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>{PAGE_TITLE}</title><style>{STYLE}</style></head>\
         <body class=\"{body_class}\"><header><h1>{PAGE_TITLE}</h1>\
         <a class=\"theme-toggle\" href=\"/?theme={}\">Switch to {} theme</a></header><main>\
         <p>Interactive analysis of reported incidents by place, type, victim, and time.</p>\
         <div class=\"metric\"><div>Total Crimes</div><div class=\"value\">{total}</div></div>",
        theme.toggled(),
        theme.toggled(),
    );

    for section in sections {
        html.push_str(&render_section(section));
    }

    html.push_str("</main><footer>Crime Pattern Detection Dashboard</footer></body></html>");
    html
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use crime_dashboard_report_models::{CategoryCount, ReportId, catalog};

    use super::*;

    fn tables() -> Vec<ReportTable> {
        catalog()
            .iter()
            .map(|definition| ReportTable {
                report: definition.id,
                rows: vec![CategoryCount::new("x", 1)],
            })
            .collect()
    }

    #[test]
    fn page_has_every_section_and_link() {
        let tables = tables();
        let sections: Vec<PageSection<'_>> = tables
            .iter()
            .map(|table| PageSection {
                definition: table.definition(),
                content: Ok(table),
            })
            .collect();

        let html = render_page(Some(42), &sections, Theme::Light);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(PAGE_TITLE));
        assert!(html.contains("<div class=\"value\">42</div>"));
        for definition in catalog() {
            assert!(html.contains(&escape_markup(definition.heading)));
            assert!(html.contains(&format!("/api/reports/{}/export", definition.id)));
            assert!(html.contains(definition.download_label));
        }
        assert_eq!(html.matches("<svg").count(), catalog().len());
    }

    #[test]
    fn failed_section_shows_notice() {
        let tables = tables();
        let sections = vec![
            PageSection {
                definition: tables[0].definition(),
                content: Ok(&tables[0]),
            },
            PageSection {
                definition: ReportId::TimeOfDay.definition(),
                content: Err("Malformed value \"late\"".to_string()),
            },
        ];

        let html = render_page(None, &sections, Theme::Light);

        assert!(html.contains("could not be computed: Malformed value &quot;late&quot;"));
        assert!(!html.contains("/api/reports/time_of_day/export"));
        assert!(html.contains("/api/reports/city_crimes/export"));
        assert!(html.contains("unavailable"));
    }

    #[test]
    fn theme_sets_body_class_and_toggle() {
        let dark = render_page(Some(0), &[], Theme::Dark);
        assert!(dark.contains("<body class=\"dark\">"));
        assert!(dark.contains("href=\"/?theme=light\""));

        let light = render_page(Some(0), &[], Theme::default());
        assert!(light.contains("<body class=\"light\">"));
        assert!(light.contains("href=\"/?theme=dark\""));
    }

    #[test]
    fn parses_theme() {
        assert_eq!(Theme::from_str("dark").unwrap(), Theme::Dark);
        assert!(Theme::from_str("blue").is_err());
    }
}
