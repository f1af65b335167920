/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RawTable
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ normalize   │  canonical column names
///   │ derive      │  year, GDP_per_capita
///   └────────────┘
///        │
///        ▼
///   ┌────────────────┐
///   │ IndicatorTable  │  Vec<IndicatorRecord>, country index
///   └────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  countries + year range → TableView
///   └──────────┘
/// ```

pub mod derive;
pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
