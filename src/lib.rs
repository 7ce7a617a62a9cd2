//! Interactive explorer for the Top 2000 global companies dataset.
//!
//! The [`data`] module holds the loading, filtering and aggregation pipeline
//! and has no UI dependencies. [`app`], [`state`] and [`ui`] wire it into an
//! egui dashboard.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod state;
pub mod ui;

pub use data::model::{Company, CompanyTable, CompanyView, Metric};
pub use error::{DataLoadError, EmptyTableError, InvalidSelectionError};
