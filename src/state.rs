use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;

use crate::data::filter::{self, MissionFilter};
use crate::data::model::Dataset;
use crate::summary::Summary;

// ---------------------------------------------------------------------------
// Filter dimensions
// ---------------------------------------------------------------------------

/// Multi-select filter dimensions offered by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Company,
    MissionStatus,
    RocketStatus,
}

/// Choices available for each filter widget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub companies: BTreeSet<String>,
    pub mission_statuses: BTreeSet<String>,
    pub rocket_statuses: BTreeSet<String>,
    pub years: Option<(i32, i32)>,
}

impl FilterOptions {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        FilterOptions {
            companies: dataset.companies(),
            mission_statuses: dataset.mission_statuses(),
            rocket_statuses: dataset.rocket_statuses(),
            years: dataset.year_bounds(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dashboard state
// ---------------------------------------------------------------------------

/// The dashboard's view state, independent of rendering.
pub struct DashboardState {
    /// Snapshot of the loaded table.
    pub dataset: Arc<Dataset>,

    pub options: FilterOptions,

    /// Current selections.
    pub filter: MissionFilter,

    /// Aggregates for the records passing `filter` (cached).
    pub summary: Summary,
}

impl DashboardState {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        let options = FilterOptions::from_dataset(&dataset);
        let summary = Summary::compute(&dataset);
        DashboardState {
            dataset,
            options,
            filter: MissionFilter::default(),
            summary,
        }
    }

    /// Recompute `summary` after a filter change.
    pub fn refilter(&mut self) {
        let visible = filter::apply(&self.dataset, &self.filter);
        self.summary = Summary::compute(&visible);
    }

    /// Replace every selection at once.
    pub fn set_filter(&mut self, filter: MissionFilter) {
        self.filter = filter;
        self.refilter();
    }

    /// Toggle a single value in one dimension.
    pub fn toggle_filter_value(&mut self, dimension: Dimension, value: &str) {
        let selected = self.selection_mut(dimension);
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
        self.refilter();
    }

    /// Clear one dimension, which lifts its restriction.
    pub fn clear(&mut self, dimension: Dimension) {
        self.selection_mut(dimension).clear();
        self.refilter();
    }

    /// Restrict to an inclusive year range; `None` lifts the restriction.
    pub fn set_years(&mut self, years: Option<(i32, i32)>) {
        self.filter.years = years;
        self.refilter();
    }

    /// Back to the full dataset.
    pub fn reset(&mut self) {
        self.filter = MissionFilter::default();
        self.refilter();
    }

    fn selection_mut(&mut self, dimension: Dimension) -> &mut BTreeSet<String> {
        match dimension {
            Dimension::Company => &mut self.filter.companies,
            Dimension::MissionStatus => &mut self.filter.mission_statuses,
            Dimension::RocketStatus => &mut self.filter.rocket_statuses,
        }
    }
}
