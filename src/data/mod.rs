/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → CompanyTable  (cached once by `cache`)
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ CompanyTable  │  Vec<Company>, continent/country index
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  continent / country / market value → CompanyView
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  extremes, top N, pie shares   (+ search, compare)
///   └───────────┘
/// ```
///
/// [`dashboard::Dashboard`] runs the whole chain for one render pass.

pub mod aggregate;
pub mod cache;
pub mod compare;
pub mod dashboard;
pub mod filter;
pub mod loader;
pub mod model;
pub mod search;
