/// Data layer: core types, loading, windowing and correlation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  named numeric / text columns
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  window   │  first N rows × first M columns (one dataset only)
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ correlation  │  pairwise Pearson → CorrelationMatrix
///   └─────────────┘
/// ```

pub mod correlation;
pub mod loader;
pub mod model;
pub mod window;
