//! The analytical queries, as pure functions over a loaded [`Dataset`].
//!
//! Arguments arrive already checked by [`crate::validate`];
//! [`crate::store::MissionStore`] does the checking and the lazy loading.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::Serialize;

use crate::data::model::{Dataset, MissionStatus};
use crate::validate;

/// Round to two decimal places, exact halves to even.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Per-status counts. All four canonical statuses are always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCounts(BTreeMap<MissionStatus, usize>);

impl StatusCounts {
    pub fn get(&self, status: MissionStatus) -> usize {
        self.0.get(&status).copied().unwrap_or(0)
    }

    /// Sum over the four buckets.
    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    /// `(label, count)` in canonical order.
    pub fn labelled(&self) -> Vec<(&'static str, usize)> {
        MissionStatus::ALL
            .iter()
            .map(|s| (s.label(), self.get(*s)))
            .collect()
    }
}

/// Number of missions flown by `company` (exact, case-sensitive, trimmed).
pub fn mission_count_by_company(ds: &Dataset, company: &str) -> usize {
    let name = validate::company_name(company);
    ds.records.iter().filter(|r| r.company == name).count()
}

/// Percentage of `company`'s missions that succeeded, to 2 dp. An unknown
/// company scores `0.0`.
pub fn success_rate(ds: &Dataset, company: &str) -> f64 {
    let name = validate::company_name(company);
    let (total, successes) = ds
        .records
        .iter()
        .filter(|r| r.company == name)
        .fold((0usize, 0usize), |(t, s), r| (t + 1, s + usize::from(r.is_success())));
    if total == 0 {
        return 0.0;
    }
    round2(successes as f64 / total as f64 * 100.0)
}

/// Mission names launched between `from` and `to` (inclusive), in ascending
/// date order. Same-day launches keep source order.
pub fn missions_by_date_range(ds: &Dataset, from: NaiveDate, to: NaiveDate) -> Vec<String> {
    let mut hits: Vec<_> = ds
        .records
        .iter()
        .filter_map(|r| r.date.filter(|d| (from..=to).contains(d)).map(|d| (d, r)))
        .collect();
    hits.sort_by_key(|(d, _)| *d);
    hits.into_iter().map(|(_, r)| r.mission.clone()).collect()
}

/// Mission counts per company, most active first, ties by name ascending.
pub fn company_counts(ds: &Dataset) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for r in &ds.records {
        *counts.entry(r.company.as_str()).or_default() += 1;
    }
    let mut ranked: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(name, n)| (name.to_string(), n))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}

/// The `n` companies with the most missions.
pub fn top_companies_by_mission_count(ds: &Dataset, n: usize) -> Vec<(String, usize)> {
    if n == 0 {
        return Vec::new();
    }
    let mut ranked = company_counts(ds);
    ranked.truncate(n);
    ranked
}

/// Counts for the four canonical statuses; other labels are not represented.
pub fn mission_status_count(ds: &Dataset) -> StatusCounts {
    let mut counts: BTreeMap<MissionStatus, usize> =
        MissionStatus::ALL.iter().map(|s| (*s, 0)).collect();
    for status in ds.records.iter().filter_map(|r| r.status()) {
        *counts.entry(status).or_default() += 1;
    }
    StatusCounts(counts)
}

/// Missions launched in `year`.
pub fn missions_by_year(ds: &Dataset, year: i32) -> usize {
    ds.records.iter().filter(|r| r.year == Some(year)).count()
}

/// The rocket flown most often, ignoring blank names. Ties go to the
/// alphabetically first name; an empty dataset yields `""`.
pub fn most_used_rocket(ds: &Dataset) -> String {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for r in ds.records.iter().filter(|r| !r.rocket.is_empty()) {
        *counts.entry(r.rocket.as_str()).or_default() += 1;
    }
    // BTreeMap iterates names ascending, so keeping the first strict maximum
    // resolves ties alphabetically.
    let mut best: Option<(&str, usize)> = None;
    for (name, n) in counts {
        if best.map_or(true, |(_, top)| n > top) {
            best = Some((name, n));
        }
    }
    best.map(|(name, _)| name.to_string()).unwrap_or_default()
}

/// Missions per year over `[start, end]`, to 2 dp.
pub fn average_missions_per_year(ds: &Dataset, start: i32, end: i32) -> f64 {
    let total = ds
        .records
        .iter()
        .filter(|r| r.year.is_some_and(|y| (start..=end).contains(&y)))
        .count();
    round2(total as f64 / f64::from(end - start + 1))
}
