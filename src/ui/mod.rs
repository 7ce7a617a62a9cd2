//! egui adapters: each function draws one part of the dashboard from the
//! current [`crate::state::AppState`].

pub mod charts;
pub mod map;
pub mod pages;
pub mod panels;
pub mod table;

/// Shown wherever a filtered view turns out empty.
pub const NO_DATA: &str = "No companies match the current filters.";
