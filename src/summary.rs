//! Dashboard aggregates over a (usually filtered) set of records.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::data::model::{Dataset, MissionRecord};
use crate::query::{company_counts, round2};

/// How many companies the ranking charts show.
pub const TOP_COMPANIES: usize = 15;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyRate {
    pub company: String,
    pub missions: usize,
    pub successes: usize,
    pub success_rate: f64,
}

/// Launch counts for one decade, indexed by year within the decade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecadeRow {
    /// e.g. `"1960s"`.
    pub decade: String,
    pub launches: [usize; 10],
}

/// One line of the records table, formatted for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub company: String,
    pub mission: String,
    /// `YYYY-MM-DD`, or empty when the date is unknown.
    pub date: String,
    pub rocket: String,
    pub location: String,
    pub rocket_status: String,
    /// Two decimal places, or empty when the price is unknown.
    pub price: String,
    pub mission_status: String,
}

impl From<&MissionRecord> for TableRow {
    fn from(r: &MissionRecord) -> Self {
        TableRow {
            company: r.company.clone(),
            mission: r.mission.clone(),
            date: r.date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default(),
            rocket: r.rocket.clone(),
            location: r.location.clone(),
            rocket_status: r.rocket_status.clone(),
            price: r.price.map(|p| format!("{p:.2}")).unwrap_or_default(),
            mission_status: r.mission_status.clone(),
        }
    }
}

/// Everything the dashboard renders for one filter selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub successes: usize,
    /// `None` when `total` is zero.
    pub success_rate: Option<f64>,
    pub companies: usize,
    /// Smallest and largest year among dated records.
    pub year_span: Option<(i32, i32)>,
    /// Ascending by year; undated records are not counted.
    pub launches_per_year: Vec<(i32, usize)>,
    /// Every observed status label, most frequent first, ties by label.
    pub status_breakdown: Vec<(String, usize)>,
    /// Most active companies, at most [`TOP_COMPANIES`].
    pub top_companies: Vec<(String, usize)>,
    /// Success rate for each of `top_companies`, lowest rate first.
    pub top_company_rates: Vec<CompanyRate>,
    pub decade_heatmap: Vec<DecadeRow>,
    /// The selected records in source order.
    pub rows: Vec<TableRow>,
}

impl Summary {
    pub fn compute(ds: &Dataset) -> Self {
        let total = ds.len();
        let successes = ds.records.iter().filter(|r| r.is_success()).count();
        let success_rate = (total > 0).then(|| round2(successes as f64 / total as f64 * 100.0));

        let mut per_year: BTreeMap<i32, usize> = BTreeMap::new();
        for y in ds.records.iter().filter_map(|r| r.year) {
            *per_year.entry(y).or_default() += 1;
        }
        let year_span = match (per_year.keys().next(), per_year.keys().next_back()) {
            (Some(lo), Some(hi)) => Some((*lo, *hi)),
            _ => None,
        };

        let mut statuses: HashMap<&str, usize> = HashMap::new();
        for r in &ds.records {
            *statuses.entry(r.mission_status.as_str()).or_default() += 1;
        }
        let mut status_breakdown: Vec<(String, usize)> = statuses
            .into_iter()
            .map(|(s, n)| (s.to_string(), n))
            .collect();
        status_breakdown.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let ranked = company_counts(ds);
        let companies = ranked.len();
        let top_companies: Vec<(String, usize)> = ranked.into_iter().take(TOP_COMPANIES).collect();
        let top_company_rates = company_rates(ds, &top_companies);

        Summary {
            total,
            successes,
            success_rate,
            companies,
            year_span,
            launches_per_year: per_year.into_iter().collect(),
            status_breakdown,
            top_companies,
            top_company_rates,
            decade_heatmap: decade_heatmap(ds),
            rows: ds.records.iter().map(TableRow::from).collect(),
        }
    }

    /// Row count for the table caption, e.g. `"4,630 rows"`.
    pub fn row_count_label(&self) -> String {
        let digits = self.rows.len().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }
        format!("{grouped} rows")
    }
}

fn company_rates(ds: &Dataset, top: &[(String, usize)]) -> Vec<CompanyRate> {
    let mut wins: HashMap<&str, usize> = HashMap::new();
    for r in ds.records.iter().filter(|r| r.is_success()) {
        *wins.entry(r.company.as_str()).or_default() += 1;
    }
    let mut rates: Vec<CompanyRate> = top
        .iter()
        .map(|(company, missions)| {
            let successes = wins.get(company.as_str()).copied().unwrap_or(0);
            CompanyRate {
                company: company.clone(),
                missions: *missions,
                successes,
                success_rate: round2(successes as f64 / *missions as f64 * 100.0),
            }
        })
        .collect();
    rates.sort_by(|a, b| {
        a.success_rate
            .total_cmp(&b.success_rate)
            .then_with(|| a.company.cmp(&b.company))
    });
    rates
}

fn decade_heatmap(ds: &Dataset) -> Vec<DecadeRow> {
    let mut rows: BTreeMap<i32, [usize; 10]> = BTreeMap::new();
    for y in ds.records.iter().filter_map(|r| r.year) {
        let decade = y.div_euclid(10) * 10;
        let slot = y.rem_euclid(10) as usize;
        rows.entry(decade).or_insert([0; 10])[slot] += 1;
    }
    rows.into_iter()
        .map(|(decade, launches)| DecadeRow {
            decade: format!("{decade}s"),
            launches,
        })
        .collect()
}
