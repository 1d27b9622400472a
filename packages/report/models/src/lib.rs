#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Report catalog and aggregated result types for the crime dashboard.
//!
//! Every section of the dashboard is described by a static
//! [`ReportDefinition`]: the grouping query to run, how to post-process and
//! order its rows, which chart to draw, and the file name its CSV export is
//! offered under. The catalog is fixed at compile time and shared by the
//! aggregator, presenter, server, and CLI.

use crime_dashboard_incident_models::IncidentColumn;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Query for the overview metric shown above the report sections.
pub const OVERVIEW_QUERY: &str = "SELECT COUNT(*) AS total FROM crimes";

/// Default number of rows kept by reports that truncate to their top entries.
pub const DEFAULT_TOP_N: usize = 10;

/// Identifier of a report in the catalog.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ReportId {
    /// Top cities by incident count.
    CityCrimes,
    /// Incident count per crime description.
    CrimeTypes,
    /// Top weapons used.
    WeaponUsage,
    /// Victims by gender.
    VictimGender,
    /// Victims by age bracket.
    VictimAge,
    /// Incidents by hour of day.
    TimeOfDay,
    /// Incidents by year.
    YearlyTrend,
    /// Closed vs. open cases.
    CaseClosure,
    /// Top crime domains.
    CrimeDomain,
}

impl ReportId {
    /// Returns all report ids in page order.
    #[must_use]
    pub fn all() -> Vec<Self> {
        CATALOG.iter().map(|def| def.id).collect()
    }

    /// Returns the catalog entry for this report.
    #[must_use]
    pub fn definition(self) -> &'static ReportDefinition {
        CATALOG
            .iter()
            .find(|def| def.id == self)
            .unwrap_or_else(|| unreachable!("every ReportId has a catalog entry"))
    }
}

/// Kind of chart a report is drawn as.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ChartKind {
    /// Vertical bars, one per category.
    Bar,
    /// Horizontal bars, one per category.
    HorizontalBar,
    /// Pie slices proportional to count.
    Pie,
    /// Line through the points in key order.
    Line,
}

/// Derived field computed from each grouped value before re-grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostProcess {
    /// Rows are used as grouped by the query.
    None,
    /// Victim ages are binned into [`crime_dashboard_incident_models::AgeGroup`]s.
    AgeBins,
    /// The hour (0-23) is taken from the first two characters of the time.
    HourOfDay,
    /// The year is parsed out of the date.
    Year,
}

/// Ordering applied to a report's rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowOrder {
    /// Highest count first; ties by ascending category text.
    CountDescending,
    /// Ascending by category text.
    KeyAscending,
    /// Ascending by the numeric value of the category (hours, years).
    NumericKeyAscending,
    /// Order produced by the post-processing step (age bracket order).
    Natural,
}

/// What to do with a value whose derived field cannot be extracted (e.g. a
/// time whose first two characters are not an hour).
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MalformedFieldPolicy {
    /// Fail the whole report.
    #[default]
    Fail,
    /// Drop the offending rows and log a warning.
    Skip,
}

/// Static description of one dashboard report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDefinition {
    /// Report identifier.
    pub id: ReportId,
    /// Section heading on the dashboard page.
    pub heading: &'static str,
    /// Chart title.
    pub title: &'static str,
    /// Column the report groups on.
    #[serde(skip)]
    pub column: IncidentColumn,
    /// Grouping query. Always yields a `category` and a `total` column.
    #[serde(skip)]
    pub query: &'static str,
    /// Post-processing applied to the grouped rows.
    pub post_process: PostProcess,
    /// Row ordering.
    pub order: RowOrder,
    /// Whether the rows are truncated to the top N after ordering.
    pub top_n: bool,
    /// Chart kind.
    pub chart: ChartKind,
    /// Header of the category column in exports and chart axes.
    pub category_header: &'static str,
    /// Header of the count column in exports and chart axes.
    pub count_header: &'static str,
    /// File name offered for the CSV export.
    pub export_file: &'static str,
    /// Label of the download action.
    pub download_label: &'static str,
}

/// All dashboard reports in page order.
pub static CATALOG: [ReportDefinition; 9] = [
    ReportDefinition {
        id: ReportId::CityCrimes,
        heading: "Top 10 Cities with Most Crimes",
        title: "City-wise Crime Count",
        column: IncidentColumn::City,
        query: "SELECT \"City\" AS category, COUNT(*) AS total \
                FROM crimes GROUP BY \"City\"",
        post_process: PostProcess::None,
        order: RowOrder::CountDescending,
        top_n: true,
        chart: ChartKind::Bar,
        category_header: "City",
        count_header: "Total_Crimes",
        export_file: "city_crimes.csv",
        download_label: "Download City-wise Data",
    },
    ReportDefinition {
        id: ReportId::CrimeTypes,
        heading: "Crime Types Distribution",
        title: "Crime Types",
        column: IncidentColumn::CrimeDescription,
        query: "SELECT \"Crime Description\" AS category, COUNT(*) AS total \
                FROM crimes GROUP BY \"Crime Description\"",
        post_process: PostProcess::None,
        order: RowOrder::CountDescending,
        top_n: false,
        chart: ChartKind::HorizontalBar,
        category_header: "Crime Description",
        count_header: "Total",
        export_file: "crime_types.csv",
        download_label: "Download Crime Type Data",
    },
    ReportDefinition {
        id: ReportId::WeaponUsage,
        heading: "Weapon Usage in Crimes",
        title: "Top 10 Weapons Used",
        column: IncidentColumn::WeaponUsed,
        query: "SELECT \"Weapon Used\" AS category, COUNT(*) AS total \
                FROM crimes \
                WHERE \"Weapon Used\" IS NOT NULL AND \"Weapon Used\" != '' \
                GROUP BY \"Weapon Used\"",
        post_process: PostProcess::None,
        order: RowOrder::CountDescending,
        top_n: true,
        chart: ChartKind::HorizontalBar,
        category_header: "Weapon",
        count_header: "Total",
        export_file: "weapon_usage.csv",
        download_label: "Download Weapon Data",
    },
    ReportDefinition {
        id: ReportId::VictimGender,
        heading: "Gender-wise Victim Distribution",
        title: "Victim Gender Distribution",
        column: IncidentColumn::VictimGender,
        query: "SELECT \"Victim Gender\" AS category, COUNT(*) AS total \
                FROM crimes GROUP BY \"Victim Gender\"",
        post_process: PostProcess::None,
        order: RowOrder::KeyAscending,
        top_n: false,
        chart: ChartKind::Pie,
        category_header: "Gender",
        count_header: "Total",
        export_file: "victim_gender.csv",
        download_label: "Download Gender-wise Data",
    },
    ReportDefinition {
        id: ReportId::VictimAge,
        heading: "Age Distribution of Victims",
        title: "Victim Age Groups",
        column: IncidentColumn::VictimAge,
        query: "SELECT CAST(CAST(\"Victim Age\" AS INTEGER) AS TEXT) AS category, \
                COUNT(*) AS total \
                FROM crimes WHERE \"Victim Age\" IS NOT NULL \
                GROUP BY CAST(\"Victim Age\" AS INTEGER)",
        post_process: PostProcess::AgeBins,
        order: RowOrder::Natural,
        top_n: false,
        chart: ChartKind::Bar,
        category_header: "Age Group",
        count_header: "Total",
        export_file: "Age-wise_Victim.csv",
        download_label: "Download Age-wise Victim Data",
    },
    ReportDefinition {
        id: ReportId::TimeOfDay,
        heading: "Crime Trend by Time of Occurrence",
        title: "Crimes by Hour of Day",
        column: IncidentColumn::TimeOfOccurrence,
        query: "SELECT \"Time of Occurrence\" AS category, COUNT(*) AS total \
                FROM crimes WHERE \"Time of Occurrence\" IS NOT NULL \
                GROUP BY \"Time of Occurrence\"",
        post_process: PostProcess::HourOfDay,
        order: RowOrder::NumericKeyAscending,
        top_n: false,
        chart: ChartKind::Line,
        category_header: "Hour",
        count_header: "Total",
        export_file: "Time_of_Day_Crime_Trend.csv",
        download_label: "Download Time of Day Crime Trend Data",
    },
    ReportDefinition {
        id: ReportId::YearlyTrend,
        heading: "Year-wise Crime Trend",
        title: "Yearly Crime Trend",
        column: IncidentColumn::DateOfOccurrence,
        query: "SELECT \"Date of Occurrence\" AS category, COUNT(*) AS total \
                FROM crimes WHERE \"Date of Occurrence\" IS NOT NULL \
                GROUP BY \"Date of Occurrence\"",
        post_process: PostProcess::Year,
        order: RowOrder::NumericKeyAscending,
        top_n: false,
        chart: ChartKind::Line,
        category_header: "Year",
        count_header: "Total",
        export_file: "Year-wise_Crime_Count.csv",
        download_label: "Download Year-wise Crime Count Data",
    },
    ReportDefinition {
        id: ReportId::CaseClosure,
        heading: "Case Closure Status",
        title: "Case Status",
        column: IncidentColumn::CaseClosed,
        query: "SELECT \"Case Closed\" AS category, COUNT(*) AS total \
                FROM crimes GROUP BY \"Case Closed\"",
        post_process: PostProcess::None,
        order: RowOrder::KeyAscending,
        top_n: false,
        chart: ChartKind::Pie,
        category_header: "Case Closed",
        count_header: "Total",
        export_file: "Case_Closure_Status.csv",
        download_label: "Download Case Closure Status Data",
    },
    ReportDefinition {
        id: ReportId::CrimeDomain,
        heading: "Crime Domain Distribution",
        title: "Top Crime Domains",
        column: IncidentColumn::CrimeDomain,
        query: "SELECT \"Crime Domain\" AS category, COUNT(*) AS total \
                FROM crimes GROUP BY \"Crime Domain\"",
        post_process: PostProcess::None,
        order: RowOrder::CountDescending,
        top_n: true,
        chart: ChartKind::HorizontalBar,
        category_header: "Crime Domain",
        count_header: "Total",
        export_file: "Crime_Domain_Distribution.csv",
        download_label: "Download Crime Domain Distribution Data",
    },
];

/// Returns the full report catalog in page order.
#[must_use]
pub fn catalog() -> &'static [ReportDefinition] {
    &CATALOG
}

/// Count of incidents in a single category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    /// Category label (city name, age bracket, hour, ...).
    pub category: String,
    /// Number of incidents.
    pub count: u64,
}

impl CategoryCount {
    /// Creates a row.
    #[must_use]
    pub fn new(category: impl Into<String>, count: u64) -> Self {
        Self {
            category: category.into(),
            count,
        }
    }
}

/// Aggregated result of running one report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportTable {
    /// Report the rows belong to.
    pub report: ReportId,
    /// Ordered rows.
    pub rows: Vec<CategoryCount>,
}

impl ReportTable {
    /// Returns the catalog entry for this table's report.
    #[must_use]
    pub fn definition(&self) -> &'static ReportDefinition {
        self.report.definition()
    }

    /// Sum of all row counts.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.rows.iter().map(|row| row.count).sum()
    }

    /// Returns `true` if the report produced no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_ids_are_unique() {
        let mut ids = ReportId::all();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), CATALOG.len());
    }

    #[test]
    fn every_id_resolves_to_its_definition() {
        for def in catalog() {
            assert_eq!(def.id.definition(), def);
        }
    }

    #[test]
    fn queries_reference_their_column() {
        for def in catalog() {
            assert!(
                def.query.contains(&def.column.quoted()),
                "{}: query does not reference {}",
                def.id,
                def.column
            );
            assert!(def.query.contains("AS category"), "{}: no category", def.id);
            assert!(def.query.contains("AS total"), "{}: no total", def.id);
        }
    }

    #[test]
    fn export_files_are_csv_and_unique() {
        let mut files: Vec<&str> = catalog().iter().map(|def| def.export_file).collect();
        assert!(files.iter().all(|f| f.ends_with(".csv")));
        files.sort_unstable();
        files.dedup();
        assert_eq!(files.len(), CATALOG.len());
    }

    #[test]
    fn truncated_reports() {
        let truncated: Vec<ReportId> = catalog()
            .iter()
            .filter(|def| def.top_n)
            .map(|def| def.id)
            .collect();
        assert_eq!(
            truncated,
            vec![
                ReportId::CityCrimes,
                ReportId::WeaponUsage,
                ReportId::CrimeDomain
            ]
        );
    }

    #[test]
    fn report_id_parses_from_snake_case() {
        assert_eq!("city_crimes".parse::<ReportId>().unwrap(), ReportId::CityCrimes);
        assert_eq!(ReportId::TimeOfDay.to_string(), "time_of_day");
        assert!("nope".parse::<ReportId>().is_err());
    }

    #[test]
    fn table_total() {
        let table = ReportTable {
            report: ReportId::CityCrimes,
            rows: vec![CategoryCount::new("Delhi", 5), CategoryCount::new("Pune", 3)],
        };
        assert_eq!(table.total(), 8);
        assert!(!table.is_empty());
        assert_eq!(table.definition().export_file, "city_crimes.csv");
    }
}
