//! Query and aggregation engine over a table of space-launch records.
//!
//! [`store::MissionStore`] loads the table once and answers the queries in
//! [`query`]; [`api`] exposes the same queries to dynamically typed callers,
//! and [`state`] / [`summary`] back the dashboard views.

pub mod api;
pub mod data;
pub mod error;
pub mod query;
pub mod state;
pub mod store;
pub mod summary;
pub mod validate;

pub use data::loader::LoaderConfig;
pub use data::model::{Dataset, MissionRecord, MissionStatus};
pub use error::{ErrorKind, LoadError, QueryError};
pub use store::MissionStore;
