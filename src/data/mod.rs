/// Data layer: extract catalogue, loading, and aggregation.
///
/// Architecture:
/// ```text
///  five .csv extracts
///        │
///        ▼
///   ┌────────────┐
///   │ DataLoader │  parse files once → Datasets (cached)
///   └────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table   │  column names, typed cells
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate │  counts, sums, top-N, pivot → chart series
///   └───────────┘
/// ```

pub mod aggregate;
pub mod loader;
pub mod model;
pub mod schema;
