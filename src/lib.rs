//! Terminal dashboard for loan-request statistics.
//!
//! Fetches aggregate statistics from an HTTP endpoint, renders KPI cards,
//! six charts and a top-10 table, and lets the user cross-filter by
//! clicking chart categories. Every filter change triggers a new
//! fetch-and-render cycle with the active filters in the query string.

pub mod analytics;
pub mod cli;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod filters;
pub mod format;
pub mod stats;
pub mod view;
