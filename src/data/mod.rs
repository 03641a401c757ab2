/// Data layer: raw rows, typed records, and record filters.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Vec<RawRow>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  model    │  coerce rows → Dataset (records + category set)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  category rules, year range → Vec<Record>
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
