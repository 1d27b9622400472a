//! Derived-field extraction, re-grouping, and row ordering.
//!
//! These are pure functions over the `(value, count)` pairs returned by a
//! report's grouping query, so they are tested without a database.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike as _, NaiveDate, NaiveDateTime};
use crime_dashboard_incident_models::AgeGroup;
use crime_dashboard_report_models::{
    CategoryCount, MalformedFieldPolicy, PostProcess, ReportDefinition, ReportId, RowOrder,
};

use crate::AggregatorError;

/// Date-time layouts tried, in order, when extracting a year.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%d-%m-%Y %H:%M",
    "%m/%d/%Y %H:%M",
];

/// Date-only layouts tried after [`DATETIME_FORMATS`].
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%m-%Y", "%m/%d/%Y"];

/// One row of a grouping query: the grouped value and how many incidents
/// share it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedRow {
    /// Grouped value; `None` for SQL `NULL`.
    pub value: Option<String>,
    /// Number of incidents with this value.
    pub count: u64,
}

impl GroupedRow {
    /// Creates a row.
    #[must_use]
    pub fn new(value: Option<&str>, count: u64) -> Self {
        Self {
            value: value.map(ToString::to_string),
            count,
        }
    }
}

/// Extracts the hour from a time of occurrence.
///
/// The hour is the first two characters parsed as an integer; anything
/// outside `0..=23` is rejected.
#[must_use]
pub fn extract_hour(time: &str) -> Option<u32> {
    let prefix: String = time.chars().take(2).collect();
    let hour: u32 = prefix.parse().ok()?;
    (hour <= 23).then_some(hour)
}

/// Extracts the year from a date of occurrence.
///
/// Timestamps with an offset are converted to UTC first.
#[must_use]
pub fn extract_year(date: &str) -> Option<i32> {
    let date = date.trim();

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(date, fmt).ok())
        .map(|dt| dt.year())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(date, fmt).ok())
                .map(|d| d.year())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(date)
                .ok()
                .map(|dt| dt.naive_utc().year())
        })
}

/// Tracks values rejected during post-processing according to the
/// configured policy.
struct MalformedValues {
    report: ReportId,
    policy: MalformedFieldPolicy,
    skipped: u64,
}

impl MalformedValues {
    const fn new(report: ReportId, policy: MalformedFieldPolicy) -> Self {
        Self {
            report,
            policy,
            skipped: 0,
        }
    }

    fn reject(
        &mut self,
        value: &str,
        count: u64,
        reason: &'static str,
    ) -> Result<(), AggregatorError> {
        match self.policy {
            MalformedFieldPolicy::Fail => Err(AggregatorError::MalformedField {
                report: self.report,
                value: value.to_string(),
                reason,
            }),
            MalformedFieldPolicy::Skip => {
                log::debug!("[{}] Skipping {count} rows with value {value:?}", self.report);
                self.skipped += count;
                Ok(())
            }
        }
    }

    fn finish(self) {
        if self.skipped > 0 {
            log::warn!(
                "[{}] Skipped {} incidents with malformed values",
                self.report,
                self.skipped
            );
        }
    }
}

/// Re-groups rows by a derived key. `NULL` values are dropped; values the
/// extractor rejects go through `malformed`.
fn regroup<K: Ord>(
    rows: Vec<GroupedRow>,
    malformed: &mut MalformedValues,
    reason: &'static str,
    extract: impl Fn(&str) -> Result<Option<K>, ()>,
) -> Result<BTreeMap<K, u64>, AggregatorError> {
    let mut groups: BTreeMap<K, u64> = BTreeMap::new();

    for row in rows {
        let Some(value) = row.value else {
            continue;
        };
        match extract(&value) {
            Ok(Some(key)) => *groups.entry(key).or_insert(0) += row.count,
            Ok(None) => {}
            Err(()) => malformed.reject(&value, row.count, reason)?,
        }
    }

    Ok(groups)
}

/// Applies a report's post-processing to the rows of its grouping query.
///
/// # Errors
///
/// Returns [`AggregatorError::MalformedField`] if a value cannot be
/// converted and the policy is [`MalformedFieldPolicy::Fail`].
pub fn post_process(
    definition: &ReportDefinition,
    rows: Vec<GroupedRow>,
    policy: MalformedFieldPolicy,
) -> Result<Vec<CategoryCount>, AggregatorError> {
    let mut malformed = MalformedValues::new(definition.id, policy);

    let counts: Vec<CategoryCount> = match definition.post_process {
        PostProcess::None => rows
            .into_iter()
            .map(|row| CategoryCount::new(row.value.unwrap_or_default(), row.count))
            .collect(),
        PostProcess::AgeBins => {
            let groups = regroup(rows, &mut malformed, "expected an integer age", |value| {
                value
                    .trim()
                    .parse::<i64>()
                    .map(AgeGroup::from_age)
                    .map_err(|_| ())
            })?;
            groups
                .into_iter()
                .map(|(group, count)| CategoryCount::new(group.to_string(), count))
                .collect()
        }
        PostProcess::HourOfDay => {
            let groups = regroup(
                rows,
                &mut malformed,
                "expected an hour 00-23 in the first two characters",
                |value| extract_hour(value).map(Some).ok_or(()),
            )?;
            groups
                .into_iter()
                .map(|(hour, count)| CategoryCount::new(hour.to_string(), count))
                .collect()
        }
        PostProcess::Year => {
            let groups = regroup(rows, &mut malformed, "expected a date", |value| {
                extract_year(value).map(Some).ok_or(())
            })?;
            groups
                .into_iter()
                .map(|(year, count)| CategoryCount::new(year.to_string(), count))
                .collect()
        }
    };

    malformed.finish();

    Ok(counts)
}

/// Sorts rows according to `order`.
pub fn order_rows(rows: &mut [CategoryCount], order: RowOrder) {
    match order {
        RowOrder::CountDescending => rows.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.category.cmp(&b.category))
        }),
        RowOrder::KeyAscending => rows.sort_by(|a, b| a.category.cmp(&b.category)),
        RowOrder::NumericKeyAscending => rows.sort_by(|a, b| {
            match (a.category.parse::<i64>(), b.category.parse::<i64>()) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                _ => a.category.cmp(&b.category),
            }
        }),
        RowOrder::Natural => {}
    }
}

/// Post-processes, orders, and truncates the rows of a grouping query.
///
/// # Errors
///
/// See [`post_process`].
pub fn shape_rows(
    definition: &ReportDefinition,
    rows: Vec<GroupedRow>,
    top_n: usize,
    policy: MalformedFieldPolicy,
) -> Result<Vec<CategoryCount>, AggregatorError> {
    let mut counts = post_process(definition, rows, policy)?;
    order_rows(&mut counts, definition.order);
    if definition.top_n {
        counts.truncate(top_n);
    }
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn age_rows(ages: &[Option<i64>]) -> Vec<GroupedRow> {
        ages.iter()
            .map(|age| GroupedRow {
                value: age.map(|a| a.to_string()),
                count: 1,
            })
            .collect()
    }

    #[test]
    fn extracts_hours() {
        assert_eq!(extract_hour("1430"), Some(14));
        assert_eq!(extract_hour("0900"), Some(9));
        assert_eq!(extract_hour("00:15"), Some(0));
        assert_eq!(extract_hour("2359"), Some(23));
        assert_eq!(extract_hour("7"), Some(7));
        assert_eq!(extract_hour("2400"), None);
        assert_eq!(extract_hour("9:00"), None);
        assert_eq!(extract_hour("ab12"), None);
        assert_eq!(extract_hour(""), None);
    }

    #[test]
    fn extracts_years() {
        assert_eq!(extract_year("2021-03-04"), Some(2021));
        assert_eq!(extract_year("2020-01-01 00:00:00"), Some(2020));
        assert_eq!(extract_year("01-01-2022 01:11"), Some(2022));
        assert_eq!(extract_year("12/31/2023"), Some(2023));
        assert_eq!(extract_year("yesterday"), None);
    }

    #[test]
    fn extracts_years_from_iso_timestamps() {
        assert_eq!(extract_year("2020-01-01T10:00:00"), Some(2020));
        assert_eq!(extract_year("2020-01-01 00:00:00.000"), Some(2020));
        assert_eq!(extract_year("2020-01-01T10:00:00.250"), Some(2020));
        assert_eq!(extract_year("2020-01-01T10:00"), Some(2020));
        assert_eq!(extract_year("2021-05-06T07:08:09Z"), Some(2021));
        assert_eq!(extract_year("2021-12-31T23:30:00-02:00"), Some(2022));
        assert_eq!(extract_year("2020-01-01T"), None);
    }

    #[test]
    fn bins_ages() {
        let rows = age_rows(&[Some(10), Some(12), Some(13), Some(65), None, Some(-1)]);
        let counts = post_process(
            ReportId::VictimAge.definition(),
            rows,
            MalformedFieldPolicy::Fail,
        )
        .unwrap();

        assert_eq!(
            counts,
            vec![
                CategoryCount::new("Child", 2),
                CategoryCount::new("Teen", 1),
                CategoryCount::new("Senior", 1),
            ]
        );
    }

    #[test]
    fn excludes_zero_and_over_100() {
        let rows = age_rows(&[Some(0), Some(101), Some(100)]);
        let counts = post_process(
            ReportId::VictimAge.definition(),
            rows,
            MalformedFieldPolicy::Fail,
        )
        .unwrap();
        assert_eq!(counts, vec![CategoryCount::new("Senior", 1)]);
    }

    #[test]
    fn groups_hours() {
        let rows = vec![
            GroupedRow::new(Some("0900"), 1),
            GroupedRow::new(Some("0905"), 1),
            GroupedRow::new(Some("1700"), 1),
            GroupedRow::new(None, 4),
        ];
        let counts = shape_rows(
            ReportId::TimeOfDay.definition(),
            rows,
            10,
            MalformedFieldPolicy::Fail,
        )
        .unwrap();
        assert_eq!(
            counts,
            vec![CategoryCount::new("9", 2), CategoryCount::new("17", 1)]
        );
    }

    #[test]
    fn malformed_hour_fails_by_default() {
        let rows = vec![
            GroupedRow::new(Some("0900"), 1),
            GroupedRow::new(Some("noon"), 2),
        ];
        let err = post_process(
            ReportId::TimeOfDay.definition(),
            rows,
            MalformedFieldPolicy::Fail,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AggregatorError::MalformedField {
                report: ReportId::TimeOfDay,
                ref value,
                ..
            } if value == "noon"
        ));
    }

    #[test]
    fn malformed_hour_skipped_when_configured() {
        let rows = vec![
            GroupedRow::new(Some("0900"), 1),
            GroupedRow::new(Some("noon"), 2),
        ];
        let counts = post_process(
            ReportId::TimeOfDay.definition(),
            rows,
            MalformedFieldPolicy::Skip,
        )
        .unwrap();
        assert_eq!(counts, vec![CategoryCount::new("9", 1)]);
    }

    #[test]
    fn malformed_year_fails_by_default() {
        let rows = vec![
            GroupedRow::new(Some("2021-06-01"), 2),
            GroupedRow::new(None, 4),
            GroupedRow::new(Some("yesterday"), 1),
        ];
        let err = shape_rows(
            ReportId::YearlyTrend.definition(),
            rows,
            10,
            MalformedFieldPolicy::Fail,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AggregatorError::MalformedField {
                report: ReportId::YearlyTrend,
                ref value,
                ..
            } if value == "yesterday"
        ));
    }

    #[test]
    fn null_and_malformed_years_skipped_when_configured() {
        let rows = vec![
            GroupedRow::new(Some("2021-06-01"), 2),
            GroupedRow::new(None, 4),
            GroupedRow::new(Some("yesterday"), 1),
            GroupedRow::new(Some("2021-01-01T08:00:00"), 3),
        ];
        let counts = shape_rows(
            ReportId::YearlyTrend.definition(),
            rows,
            10,
            MalformedFieldPolicy::Skip,
        )
        .unwrap();
        assert_eq!(counts, vec![CategoryCount::new("2021", 5)]);
    }

    #[test]
    fn years_sorted_numerically() {
        let rows = vec![
            GroupedRow::new(Some("2024-02-01"), 3),
            GroupedRow::new(Some("2020-05-05"), 1),
            GroupedRow::new(Some("2024-07-09"), 2),
        ];
        let counts = shape_rows(
            ReportId::YearlyTrend.definition(),
            rows,
            10,
            MalformedFieldPolicy::Fail,
        )
        .unwrap();
        assert_eq!(
            counts,
            vec![CategoryCount::new("2020", 1), CategoryCount::new("2024", 5)]
        );
    }

    #[test]
    fn count_descending_breaks_ties_lexically() {
        let mut rows = vec![
            CategoryCount::new("Pune", 3),
            CategoryCount::new("Agra", 3),
            CategoryCount::new("Delhi", 5),
        ];
        order_rows(&mut rows, RowOrder::CountDescending);
        assert_eq!(
            rows,
            vec![
                CategoryCount::new("Delhi", 5),
                CategoryCount::new("Agra", 3),
                CategoryCount::new("Pune", 3),
            ]
        );
    }

    #[test]
    fn numeric_order_beats_lexical() {
        let mut rows = vec![
            CategoryCount::new("17", 1),
            CategoryCount::new("9", 1),
            CategoryCount::new("10", 1),
        ];
        order_rows(&mut rows, RowOrder::NumericKeyAscending);
        let keys: Vec<&str> = rows.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(keys, vec!["9", "10", "17"]);
    }

    #[test]
    fn top_n_truncates() {
        let rows: Vec<GroupedRow> = (0..15u64)
            .map(|i| GroupedRow {
                value: Some(format!("City {i:02}")),
                count: i + 1,
            })
            .collect();
        let counts = shape_rows(
            ReportId::CityCrimes.definition(),
            rows,
            10,
            MalformedFieldPolicy::Fail,
        )
        .unwrap();
        assert_eq!(counts.len(), 10);
        assert_eq!(counts[0], CategoryCount::new("City 14", 15));
        assert!(counts.windows(2).all(|w| w[0].count >= w[1].count));
    }

    #[test]
    fn null_category_becomes_empty_string() {
        let rows = vec![GroupedRow::new(None, 2), GroupedRow::new(Some("F"), 1)];
        let counts = shape_rows(
            ReportId::VictimGender.definition(),
            rows,
            10,
            MalformedFieldPolicy::Fail,
        )
        .unwrap();
        assert_eq!(
            counts,
            vec![CategoryCount::new("", 2), CategoryCount::new("F", 1)]
        );
    }
}
