use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::{info, warn};

use super::model::{Dataset, MissionRecord};
use crate::error::LoadError;

/// Columns that must be present in the header row.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "Company",
    "Location",
    "Date",
    "Rocket",
    "Mission",
    "RocketStatus",
    "MissionStatus",
];

/// Optional column, consumed when present.
pub const PRICE_COLUMN: &str = "Price";

pub const DEFAULT_PATH: &str = "space_missions.csv";

/// Names tried, in order, when the configured path does not exist.
pub const DEFAULT_FALLBACKS: [&str; 4] = [
    "space_missions 123.csv",
    "space_missions (1) 2.csv",
    "space_missions (1).csv",
    "space_missions.csv",
];

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Where to look for the source table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    pub path: PathBuf,
    pub fallbacks: Vec<PathBuf>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self::with_path(DEFAULT_PATH)
    }
}

impl LoaderConfig {
    /// A config for `path` with the default fallback list.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        LoaderConfig {
            path: path.into(),
            fallbacks: DEFAULT_FALLBACKS.iter().map(PathBuf::from).collect(),
        }
    }

    /// Drop the fallback list, so only `path` is considered.
    pub fn without_fallbacks(mut self) -> Self {
        self.fallbacks.clear();
        self
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Resolve the source file: the configured path, else the first existing
/// fallback.
pub fn locate_source(config: &LoaderConfig) -> Result<PathBuf, LoadError> {
    if config.path.exists() {
        return Ok(config.path.clone());
    }
    match config.fallbacks.iter().find(|p| p.exists()) {
        Some(alt) => {
            warn!("{:?} not found, using fallback {:?}", config.path, alt);
            Ok(alt.clone())
        }
        None => Err(LoadError::NotFound {
            requested: config.path.clone(),
            tried: config.fallbacks.clone(),
        }),
    }
}

/// Locate and parse the source table described by `config`.
pub fn load(config: &LoaderConfig) -> Result<Dataset, LoadError> {
    let path = locate_source(config)?;
    load_path(&path)
}

/// Parse a CSV file at a known path.
pub fn load_path(path: &Path) -> Result<Dataset, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = load_reader(file, path)?;
    info!("loaded {} missions from {:?}", dataset.len(), path);
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Column positions resolved from the header row.
struct Columns {
    company: usize,
    location: usize,
    date: usize,
    rocket: usize,
    mission: usize,
    rocket_status: usize,
    mission_status: usize,
    price: Option<usize>,
}

impl Columns {
    fn resolve(headers: &[String]) -> Result<Self, LoadError> {
        let present: BTreeSet<&str> = headers.iter().map(String::as_str).collect();
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|c| !present.contains(**c))
            .map(|c| c.to_string())
            .collect();
        if !missing.is_empty() {
            let mut found: Vec<String> = headers.to_vec();
            found.sort();
            return Err(LoadError::MissingColumns { missing, found });
        }

        let idx = |name: &str| headers.iter().position(|h| h == name);
        // Required columns were checked above, so the lookups succeed.
        let required = |name: &str| idx(name).unwrap_or_default();
        Ok(Columns {
            company: required("Company"),
            location: required("Location"),
            date: required("Date"),
            rocket: required("Rocket"),
            mission: required("Mission"),
            rocket_status: required("RocketStatus"),
            mission_status: required("MissionStatus"),
            price: idx(PRICE_COLUMN),
        })
    }
}

/// Parse CSV text from any reader. `origin` is only used in messages.
///
/// Cells are decoded one at a time; invalid UTF-8 is replaced with U+FFFD
/// rather than costing the whole row. Rows with more fields than the header,
/// or that the CSV reader rejects, are logged and skipped. Short rows are kept
/// with the missing cells treated as absent.
pub fn load_reader<R: Read>(reader: R, origin: &Path) -> Result<Dataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers: Vec<String> = reader
        .byte_headers()?
        .iter()
        .map(|h| String::from_utf8_lossy(h).trim().to_string())
        .collect();

    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(LoadError::Empty {
            path: origin.to_path_buf(),
        });
    }
    let cols = Columns::resolve(&headers)?;

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for (row_no, result) in reader.byte_records().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                warn!("{origin:?}: skipping CSV row {row_no}: {e}");
                skipped += 1;
                continue;
            }
        };
        if row.len() > headers.len() {
            warn!(
                "{origin:?}: skipping CSV row {row_no}: expected {} fields, saw {}",
                headers.len(),
                row.len()
            );
            skipped += 1;
            continue;
        }

        let text = |i: usize| {
            row.get(i)
                .map(|cell| String::from_utf8_lossy(cell).trim().to_string())
                .unwrap_or_default()
        };
        let record = MissionRecord {
            company: text(cols.company),
            location: text(cols.location),
            date: None,
            year: None,
            rocket: text(cols.rocket),
            mission: text(cols.mission),
            rocket_status: text(cols.rocket_status),
            mission_status: text(cols.mission_status),
            price: cols.price.and_then(|i| parse_price(&text(i))),
        }
        .with_date(parse_date(&text(cols.date)));

        records.push(record);
    }

    if skipped > 0 {
        warn!("{origin:?}: skipped {skipped} malformed rows");
    }
    Ok(Dataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Per-field parse-or-null helpers
// ---------------------------------------------------------------------------

/// Clean a price cell such as `"1,160.0"` into a number. Blank, non-numeric
/// and non-finite values are null.
pub fn parse_price(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| *c != '"' && *c != ',').collect();
    cleaned
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S UTC",
];

const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%a %b %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
];

/// Permissive date parsing for the bulk table. Any time-of-day or offset is
/// discarded; unrecognised text is null.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok().map(|dt| dt.date()))
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
        })
}
