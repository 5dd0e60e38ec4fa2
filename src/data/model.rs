use std::collections::BTreeSet;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// MissionStatus – the four canonical outcome labels
// ---------------------------------------------------------------------------

/// Canonical mission outcomes. Source rows may carry other labels; those are
/// kept verbatim on the record but never land in a status bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MissionStatus {
    Success,
    Failure,
    PartialFailure,
    PrelaunchFailure,
}

impl MissionStatus {
    /// All statuses in reporting order.
    pub const ALL: [MissionStatus; 4] = [
        MissionStatus::Success,
        MissionStatus::Failure,
        MissionStatus::PartialFailure,
        MissionStatus::PrelaunchFailure,
    ];

    /// Label as it appears in the source file.
    pub fn label(self) -> &'static str {
        match self {
            MissionStatus::Success => "Success",
            MissionStatus::Failure => "Failure",
            MissionStatus::PartialFailure => "Partial Failure",
            MissionStatus::PrelaunchFailure => "Prelaunch Failure",
        }
    }

    /// Exact, case-sensitive match against a source label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }
}

impl fmt::Display for MissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// MissionRecord – one row of the source table
// ---------------------------------------------------------------------------

/// A single launch (one row of the source CSV) after cleaning.
///
/// String columns are always present (an absent cell becomes `""`); only
/// `date`, `year` and `price` are nullable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionRecord {
    pub company: String,
    pub location: String,
    pub date: Option<NaiveDate>,
    /// Derived from `date`.
    pub year: Option<i32>,
    pub rocket: String,
    pub mission: String,
    pub rocket_status: String,
    pub mission_status: String,
    /// Launch cost in millions of USD when known.
    pub price: Option<f64>,
}

impl MissionRecord {
    /// Set `date` and keep `year` in step with it.
    pub fn with_date(mut self, date: Option<NaiveDate>) -> Self {
        self.year = date.map(|d| d.year());
        self.date = date;
        self
    }

    /// The canonical status, if the record carries one.
    pub fn status(&self) -> Option<MissionStatus> {
        MissionStatus::from_label(&self.mission_status)
    }

    pub fn is_success(&self) -> bool {
        self.status() == Some(MissionStatus::Success)
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The cleaned table, in source order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub records: Vec<MissionRecord>,
}

impl Dataset {
    pub fn from_records(records: Vec<MissionRecord>) -> Self {
        Dataset { records }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted distinct companies.
    pub fn companies(&self) -> BTreeSet<String> {
        self.distinct(|r| &r.company)
    }

    /// Sorted distinct mission-status labels, including non-canonical ones.
    pub fn mission_statuses(&self) -> BTreeSet<String> {
        self.distinct(|r| &r.mission_status)
    }

    /// Sorted distinct rocket-status labels.
    pub fn rocket_statuses(&self) -> BTreeSet<String> {
        self.distinct(|r| &r.rocket_status)
    }

    /// Smallest and largest derived year, ignoring records without a date.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        let mut years = self.records.iter().filter_map(|r| r.year);
        let first = years.next()?;
        Some(years.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y))))
    }

    fn distinct<F>(&self, field: F) -> BTreeSet<String>
    where
        F: Fn(&MissionRecord) -> &String,
    {
        self.records
            .iter()
            .map(field)
            .filter(|v| !v.is_empty())
            .cloned()
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a record for tests; `date` is `YYYY-MM-DD` or empty.
    pub(crate) fn record(company: &str, date: &str, rocket: &str, status: &str) -> MissionRecord {
        MissionRecord {
            company: company.to_string(),
            location: "Site 1/5, Baikonur Cosmodrome, Kazakhstan".to_string(),
            date: None,
            year: None,
            rocket: rocket.to_string(),
            mission: format!("{company} {date}"),
            rocket_status: "Retired".to_string(),
            mission_status: status.to_string(),
            price: None,
        }
        .with_date(NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
    }

    #[test]
    fn status_labels_round_trip_exactly() {
        for status in MissionStatus::ALL {
            assert_eq!(MissionStatus::from_label(status.label()), Some(status));
        }
        assert_eq!(MissionStatus::from_label("success"), None);
        assert_eq!(MissionStatus::from_label("Partial failure"), None);
    }

    #[test]
    fn year_follows_date() {
        let r = record("RVSN USSR", "1957-10-04", "Sputnik 8K71PS", "Success");
        assert_eq!(r.year, Some(1957));
        let r = r.with_date(None);
        assert_eq!(r.year, None);
    }

    #[test]
    fn distinct_values_and_year_bounds() {
        let ds = Dataset::from_records(vec![
            record("NASA", "1970-01-01", "Saturn V", "Success"),
            record("CASC", "", "Long March 2C", "Failure"),
            record("NASA", "1965-06-01", "", "Launch Anomaly"),
        ]);
        assert_eq!(ds.companies().into_iter().collect::<Vec<_>>(), ["CASC", "NASA"]);
        assert!(ds.mission_statuses().contains("Launch Anomaly"));
        assert_eq!(ds.year_bounds(), Some((1965, 1970)));
        assert_eq!(Dataset::default().year_bounds(), None);
    }
}
