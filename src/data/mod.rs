/// Data layer: record types, loading, imputation, cleaning, aggregation and output.
///
/// Architecture:
/// ```text
///   dirty_cafe_sales.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Vec<RawRecord>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ defaults  │  median / mean / mode over non-sentinel cells
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  clean    │  resolve sentinels, derive Corrected Total → Vec<CleanedRecord>
///   └──────────┘
///        │
///        ├──────────────▶ filter  (per-item revenue)
///        │
///        ▼
///   ┌──────────┐
///   │  writer   │  Vec<CleanedRecord> → cleaned .csv
///   └──────────┘
/// ```

pub mod clean;
pub mod defaults;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod writer;
