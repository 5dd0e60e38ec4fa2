//! The dataset cache and the query entry points built on it.

use std::sync::{Arc, PoisonError, RwLock};

use log::debug;

use crate::data::loader::{self, LoaderConfig};
use crate::data::model::Dataset;
use crate::error::{LoadError, QueryError};
use crate::query::{self, StatusCounts};
use crate::validate;

// ---------------------------------------------------------------------------
// MissionStore
// ---------------------------------------------------------------------------

/// Owns the loaded table. Starts uninitialised, loads on first use and keeps
/// the result until [`MissionStore::reload`].
///
/// The cache is an `Arc` swapped under a lock, so a query always sees either
/// the table from before a reload or the one after it, never a mix.
#[derive(Debug, Default)]
pub struct MissionStore {
    config: RwLock<LoaderConfig>,
    cache: RwLock<Option<Arc<Dataset>>>,
}

impl MissionStore {
    pub fn new(config: LoaderConfig) -> Self {
        MissionStore {
            config: RwLock::new(config),
            cache: RwLock::new(None),
        }
    }

    /// A store that is already loaded, bypassing the filesystem.
    pub fn from_dataset(dataset: Dataset) -> Self {
        MissionStore {
            config: RwLock::new(LoaderConfig::default()),
            cache: RwLock::new(Some(Arc::new(dataset))),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// An owned copy of the cached table, loading it first if needed.
    pub fn load(&self) -> Result<Dataset, LoadError> {
        Ok(self.snapshot()?.as_ref().clone())
    }

    /// Drop the cache and read the source again. With `path`, the store
    /// switches to that source for this and later loads.
    pub fn reload(&self, path: Option<&str>) -> Result<Dataset, LoadError> {
        let config = {
            let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
            if let Some(path) = path {
                *config = LoaderConfig::with_path(path);
            }
            config.clone()
        };
        debug!("reloading dataset from {:?}", config.path);

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        *cache = None;
        let fresh = Arc::new(loader::load(&config)?);
        *cache = Some(Arc::clone(&fresh));
        Ok(fresh.as_ref().clone())
    }

    /// Shared handle to the cached table. Callers get read access only.
    pub fn snapshot(&self) -> Result<Arc<Dataset>, LoadError> {
        if let Some(ds) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            return Ok(Arc::clone(ds));
        }

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have loaded while we waited for the write lock.
        if let Some(ds) = cache.as_ref() {
            return Ok(Arc::clone(ds));
        }
        let config = self
            .config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let fresh = Arc::new(loader::load(&config)?);
        *cache = Some(Arc::clone(&fresh));
        Ok(fresh)
    }

    // -- queries --
    //
    // Arguments are validated before the cache is touched, so bad input
    // never triggers a load.

    pub fn mission_count_by_company(&self, company: &str) -> Result<usize, QueryError> {
        let ds = self.snapshot()?;
        Ok(query::mission_count_by_company(&ds, company))
    }

    pub fn success_rate(&self, company: &str) -> Result<f64, QueryError> {
        let ds = self.snapshot()?;
        Ok(query::success_rate(&ds, company))
    }

    pub fn missions_by_date_range(&self, start: &str, end: &str) -> Result<Vec<String>, QueryError> {
        let (from, to) = validate::date_range(start, end, "getMissionsByDateRange")?;
        let ds = self.snapshot()?;
        Ok(query::missions_by_date_range(&ds, from, to))
    }

    pub fn top_companies_by_mission_count(&self, n: i64) -> Result<Vec<(String, usize)>, QueryError> {
        let n = validate::count(n, "getTopCompaniesByMissionCount")?;
        let ds = self.snapshot()?;
        Ok(query::top_companies_by_mission_count(&ds, n))
    }

    pub fn mission_status_count(&self) -> Result<StatusCounts, QueryError> {
        let ds = self.snapshot()?;
        Ok(query::mission_status_count(&ds))
    }

    pub fn missions_by_year(&self, year: i64) -> Result<usize, QueryError> {
        let year = validate::year(year, "year", "getMissionsByYear")?;
        let ds = self.snapshot()?;
        Ok(query::missions_by_year(&ds, year))
    }

    pub fn most_used_rocket(&self) -> Result<String, QueryError> {
        let ds = self.snapshot()?;
        Ok(query::most_used_rocket(&ds))
    }

    pub fn average_missions_per_year(&self, start: i64, end: i64) -> Result<f64, QueryError> {
        let (start, end) = validate::year_range(start, end, "getAverageMissionsPerYear")?;
        let ds = self.snapshot()?;
        Ok(query::average_missions_per_year(&ds, start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "Company,Location,Date,Rocket,Mission,RocketStatus,MissionStatus\n";

    fn csv_file(rows: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{HEADER}{rows}").unwrap();
        file
    }

    fn store_for(file: &NamedTempFile) -> MissionStore {
        MissionStore::new(LoaderConfig::with_path(file.path()).without_fallbacks())
    }

    #[test]
    fn loads_lazily_and_caches() {
        let file = csv_file("NASA,KSC,1969-07-16,Saturn V,Apollo 11,Retired,Success\n");
        let store = store_for(&file);
        assert!(!store.is_loaded());
        assert_eq!(store.mission_count_by_company("NASA").unwrap(), 1);
        assert!(store.is_loaded());

        // Changes on disk are invisible until reload.
        std::fs::write(
            file.path(),
            format!("{HEADER}NASA,KSC,1969-07-16,Saturn V,Apollo 11,Retired,Success\nNASA,KSC,1972-12-07,Saturn V,Apollo 17,Retired,Success\n"),
        )
        .unwrap();
        assert_eq!(store.mission_count_by_company("NASA").unwrap(), 1);
        store.reload(None).unwrap();
        assert_eq!(store.mission_count_by_company("NASA").unwrap(), 2);
    }

    #[test]
    fn load_returns_independent_copies() {
        let file = csv_file("NASA,KSC,1969-07-16,Saturn V,Apollo 11,Retired,Success\n");
        let store = store_for(&file);
        let mut copy = store.load().unwrap();
        copy.records.clear();
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn reload_of_unchanged_source_is_identical() {
        let file = csv_file(
            "NASA,KSC,1969-07-16,Saturn V,Apollo 11,Retired,Success\n\
             CASC,Jiuquan,bad,Long March 2F,Shenzhou 5,Active,Success\n",
        );
        let store = store_for(&file);
        let first = store.load().unwrap();
        let rocket = store.most_used_rocket().unwrap();
        assert_eq!(store.reload(None).unwrap(), first);
        assert_eq!(store.most_used_rocket().unwrap(), rocket);
    }

    #[test]
    fn reload_can_switch_source() {
        let a = csv_file("NASA,KSC,1969-07-16,Saturn V,Apollo 11,Retired,Success\n");
        let b = csv_file("CASC,Jiuquan,2003-10-15,Long March 2F,Shenzhou 5,Active,Success\n");
        let store = store_for(&a);
        assert_eq!(store.most_used_rocket().unwrap(), "Saturn V");
        let path = b.path().to_string_lossy().into_owned();
        store.reload(Some(&path)).unwrap();
        assert_eq!(store.most_used_rocket().unwrap(), "Long March 2F");
    }

    #[test]
    fn missing_source_is_a_load_error() {
        let store = MissionStore::new(LoaderConfig::with_path("/nonexistent/missions.csv").without_fallbacks());
        let err = store.missions_by_year(2020).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Load);
        assert!(!store.is_loaded());
    }

    #[test]
    fn invalid_arguments_fail_before_loading() {
        let store = MissionStore::new(LoaderConfig::with_path("/nonexistent/missions.csv").without_fallbacks());
        assert_eq!(store.missions_by_year(0).unwrap_err().kind(), ErrorKind::Value);
        assert_eq!(
            store.missions_by_date_range("2020", "2020-12-31").unwrap_err().kind(),
            ErrorKind::Value
        );
        assert_eq!(store.top_companies_by_mission_count(-1).unwrap_err().kind(), ErrorKind::Value);
        assert_eq!(
            store.missions_by_date_range("2020-12-31", "2020-01-01").unwrap_err().kind(),
            ErrorKind::Value
        );
        assert_eq!(
            store.average_missions_per_year(2020, 2010).unwrap_err().kind(),
            ErrorKind::Value
        );
        assert_eq!(store.average_missions_per_year(0, 2010).unwrap_err().kind(), ErrorKind::Value);
        assert!(!store.is_loaded());
    }

    #[test]
    fn queries_answer_from_the_cached_table() {
        let file = csv_file(
            "NASA,KSC,1969-07-16,Saturn V,Apollo 11,Retired,Success\n\
             NASA,KSC,1972-12-07,Saturn V,Apollo 17,Retired,Success\n\
             CASC,Jiuquan,2003-10-15,Long March 2F,Shenzhou 5,Active,Failure\n",
        );
        let store = store_for(&file);
        assert_eq!(store.success_rate("NASA").unwrap(), 100.0);
        assert_eq!(
            store.missions_by_date_range("1969-01-01", "1972-12-31").unwrap(),
            ["Apollo 11", "Apollo 17"]
        );
        assert_eq!(
            store.top_companies_by_mission_count(1).unwrap(),
            [("NASA".to_string(), 2)]
        );
        assert_eq!(store.missions_by_year(2003).unwrap(), 1);
        assert_eq!(store.mission_status_count().unwrap().total(), 3);
        assert_eq!(store.average_missions_per_year(1969, 1972).unwrap(), 0.5);
    }
}
