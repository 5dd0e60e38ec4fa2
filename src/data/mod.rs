/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  space_missions.csv (or a fallback name)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  locate file, parse rows leniently → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<MissionRecord>, typed and cleaned
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  dashboard selections → matching records
///   └──────────┘
/// ```
pub mod filter;
pub mod loader;
pub mod model;
