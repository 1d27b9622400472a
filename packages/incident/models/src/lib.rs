#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Crime incident record types and victim age groups.
//!
//! This crate defines the shape of the `crimes` table that every report is
//! computed from. Column names are the dataset's own headers (they contain
//! spaces), so SQL must always go through [`IncidentColumn::quoted`].

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Name of the table holding incident records.
pub const INCIDENTS_TABLE: &str = "crimes";

/// A column of the `crimes` table referenced by at least one report.
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
pub enum IncidentColumn {
    /// City where the crime was reported.
    #[strum(serialize = "City")]
    City,
    /// Free-text crime description (e.g. "BURGLARY").
    #[strum(serialize = "Crime Description")]
    CrimeDescription,
    /// Weapon used, empty or null when none was recorded.
    #[strum(serialize = "Weapon Used")]
    WeaponUsed,
    /// Victim gender code.
    #[strum(serialize = "Victim Gender")]
    VictimGender,
    /// Victim age in years.
    #[strum(serialize = "Victim Age")]
    VictimAge,
    /// Time of occurrence; the hour is encoded in the first two characters.
    #[strum(serialize = "Time of Occurrence")]
    TimeOfOccurrence,
    /// Date of occurrence.
    #[strum(serialize = "Date of Occurrence")]
    DateOfOccurrence,
    /// Whether the case has been closed ("Yes" / "No").
    #[strum(serialize = "Case Closed")]
    CaseClosed,
    /// Crime domain (e.g. "Violent Crime").
    #[strum(serialize = "Crime Domain")]
    CrimeDomain,
}

impl IncidentColumn {
    /// Returns all variants in table order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::City,
            Self::CrimeDescription,
            Self::WeaponUsed,
            Self::VictimGender,
            Self::VictimAge,
            Self::TimeOfOccurrence,
            Self::DateOfOccurrence,
            Self::CaseClosed,
            Self::CrimeDomain,
        ]
    }

    /// Returns the column name wrapped in SQL identifier quotes.
    #[must_use]
    pub fn quoted(self) -> String {
        format!("\"{}\"", self.as_ref())
    }

    /// Returns the SQL type used when creating the table.
    #[must_use]
    pub const fn sql_type(self) -> &'static str {
        match self {
            Self::VictimAge => "INTEGER",
            _ => "TEXT",
        }
    }
}

/// A single crime incident as loaded from the source dataset.
///
/// Field names deserialize from the dataset's CSV headers. Extra columns in
/// the source file are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentRecord {
    /// City.
    #[serde(rename = "City")]
    pub city: Option<String>,
    /// Crime description.
    #[serde(rename = "Crime Description")]
    pub crime_description: Option<String>,
    /// Weapon used.
    #[serde(rename = "Weapon Used")]
    pub weapon_used: Option<String>,
    /// Victim gender.
    #[serde(rename = "Victim Gender")]
    pub victim_gender: Option<String>,
    /// Victim age in years. May be non-positive in dirty data.
    #[serde(rename = "Victim Age")]
    pub victim_age: Option<i64>,
    /// Time of occurrence.
    #[serde(rename = "Time of Occurrence")]
    pub time_of_occurrence: Option<String>,
    /// Date of occurrence.
    #[serde(rename = "Date of Occurrence")]
    pub date_of_occurrence: Option<String>,
    /// Case closed status.
    #[serde(rename = "Case Closed")]
    pub case_closed: Option<String>,
    /// Crime domain.
    #[serde(rename = "Crime Domain")]
    pub crime_domain: Option<String>,
}

/// Victim age bracket.
///
/// Brackets are closed on the upper bound: 12 is a [`AgeGroup::Child`], 13
/// is a [`AgeGroup::Teen`].
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
pub enum AgeGroup {
    /// (0, 12]
    #[strum(serialize = "Child")]
    Child,
    /// (12, 18]
    #[strum(serialize = "Teen")]
    Teen,
    /// (18, 30]
    #[strum(serialize = "Young Adult")]
    YoungAdult,
    /// (30, 45]
    #[strum(serialize = "Adult")]
    Adult,
    /// (45, 60]
    #[strum(serialize = "Mid-age")]
    MidAge,
    /// (60, 100]
    #[strum(serialize = "Senior")]
    Senior,
}

impl AgeGroup {
    /// Returns all variants in ascending age order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Child,
            Self::Teen,
            Self::YoungAdult,
            Self::Adult,
            Self::MidAge,
            Self::Senior,
        ]
    }

    /// Inclusive upper bound of this bracket.
    #[must_use]
    pub const fn upper_bound(self) -> i64 {
        match self {
            Self::Child => 12,
            Self::Teen => 18,
            Self::YoungAdult => 30,
            Self::Adult => 45,
            Self::MidAge => 60,
            Self::Senior => 100,
        }
    }

    /// Classifies an age into its bracket.
    ///
    /// Returns `None` for ages `<= 0` or `> 100`.
    #[must_use]
    pub fn from_age(age: i64) -> Option<Self> {
        if age <= 0 {
            return None;
        }
        Self::all()
            .iter()
            .copied()
            .find(|group| age <= group.upper_bound())
    }
}
