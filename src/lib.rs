//! Student learning analytics dashboard.
//!
//! Loads a learning-activity CSV and a fitted completion classifier once at
//! startup, then serves three views over HTTP: dataset-wide analytics, an
//! on-demand completion prediction, and per-student trends.

pub mod analytics;
pub mod charts;
pub mod config;
pub mod context;
pub mod data;
pub mod error;
pub mod model;
pub mod prediction;
pub mod server;
pub mod views;

#[cfg(test)]
mod testing;

pub use context::AppContext;
pub use error::{DashboardError, Result};
