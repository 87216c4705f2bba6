//! Recent-history window consumed by the trend chart and the report.

use crate::{HealthLog, HealthRecord};
use chrono::NaiveDateTime;
use serde::Serialize;

/// Number of rows the chart shows unless configured otherwise
pub const DEFAULT_WINDOW: usize = 10;

/// One point of the weight trend
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TrendPoint {
    #[serde(with = "crate::types::timestamp_format")]
    pub timestamp: NaiveDateTime,
    pub weight_kg: f64,
}

/// The last `n` appended records, sorted by timestamp ascending.
///
/// The sort is stable, so records sharing a timestamp keep append order.
pub fn recent_window(log: &HealthLog, n: usize) -> Vec<&HealthRecord> {
    let mut window: Vec<&HealthRecord> = log.tail(n).iter().collect();
    window.sort_by_key(|r| r.timestamp);
    window
}

/// Weight over the recent window
pub fn weight_trend(log: &HealthLog, n: usize) -> Vec<TrendPoint> {
    recent_window(log, n)
        .into_iter()
        .map(|r| TrendPoint {
            timestamp: r.timestamp,
            weight_kg: r.weight_kg,
        })
        .collect()
}

/// Human-readable description of a window of `n` records
pub fn window_label(n: usize) -> String {
    match n {
        1 => "latest record".to_string(),
        n => format!("last {} records", n),
    }
}
