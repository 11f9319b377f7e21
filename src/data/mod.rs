/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + validate file → LaunchDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ LaunchDataset │  Vec<LaunchRecord>, memoized payload envelope
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  site + payload predicates, validated control state
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;
