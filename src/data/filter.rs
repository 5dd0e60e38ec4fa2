use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::model::{Dataset, MissionRecord};

// ---------------------------------------------------------------------------
// Filter predicate: which values are selected per dimension
// ---------------------------------------------------------------------------

/// Dashboard filter selections.
///
/// An empty set or an unset year range means "no filter" for that dimension.
/// Every active dimension must match for a record to pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionFilter {
    pub companies: BTreeSet<String>,
    pub mission_statuses: BTreeSet<String>,
    pub rocket_statuses: BTreeSet<String>,
    /// Inclusive `(from, to)`; records with no year fall outside any range.
    pub years: Option<(i32, i32)>,
}

impl MissionFilter {
    /// Whether no dimension restricts anything.
    pub fn is_unrestricted(&self) -> bool {
        self.companies.is_empty()
            && self.mission_statuses.is_empty()
            && self.rocket_statuses.is_empty()
            && self.years.is_none()
    }

    pub fn matches(&self, record: &MissionRecord) -> bool {
        fn allowed(selected: &BTreeSet<String>, value: &str) -> bool {
            selected.is_empty() || selected.contains(value)
        }

        if let Some((from, to)) = self.years {
            match record.year {
                Some(y) if (from..=to).contains(&y) => {}
                _ => return false,
            }
        }
        allowed(&self.companies, &record.company)
            && allowed(&self.mission_statuses, &record.mission_status)
            && allowed(&self.rocket_statuses, &record.rocket_status)
    }
}

/// Return indices of records that pass the filter, in source order.
pub fn filtered_indices(dataset: &Dataset, filter: &MissionFilter) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, r)| filter.matches(r))
        .map(|(i, _)| i)
        .collect()
}

/// Copy the matching records into a new dataset.
pub fn apply(dataset: &Dataset, filter: &MissionFilter) -> Dataset {
    if filter.is_unrestricted() {
        return dataset.clone();
    }
    Dataset::from_records(
        filtered_indices(dataset, filter)
            .into_iter()
            .map(|i| dataset.records[i].clone())
            .collect(),
    )
}
