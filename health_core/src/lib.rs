#![forbid(unsafe_code)]

//! Core domain model and logic for the personal health log.
//!
//! This crate provides:
//! - Domain types (measurements, evaluations, log records)
//! - Health evaluation (BMI, ideal weight, judgments)
//! - Persistence (CSV log store with schema normalization)
//! - Trend window and report model for display consumers

pub mod types;
pub mod error;
pub mod schema;
pub mod evaluator;
pub mod log_store;
pub mod trend;
pub mod report;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use evaluator::{evaluate, evaluate_record};
pub use log_store::{CsvLogStore, LogStore};
pub use trend::{recent_window, weight_trend, window_label, TrendPoint};
pub use report::HealthReport;
