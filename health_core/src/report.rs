//! Health report built from the most recent log entry.
//!
//! Judgments in the report are always re-derived from the raw fields of the
//! latest row, never read back from storage.

use crate::trend::{weight_trend, TrendPoint};
use crate::types::timestamp_format;
use crate::{evaluator, Evaluation, HealthLog, HealthRecord, Result};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt::Write;

pub const REPORT_TITLE: &str = "Health Check Report";

/// Report document model
#[derive(Clone, Debug, Serialize)]
pub struct HealthReport {
    #[serde(with = "timestamp_format")]
    pub generated_at: NaiveDateTime,
    pub latest: HealthRecord,
    pub evaluation: Evaluation,
    pub trend: Vec<TrendPoint>,
}

impl HealthReport {
    /// Build a report from the log; `None` when there are no records yet
    pub fn from_log(
        log: &HealthLog,
        trend_window: usize,
        generated_at: NaiveDateTime,
    ) -> Result<Option<Self>> {
        let Some(latest) = log.latest() else {
            return Ok(None);
        };

        let evaluation = evaluator::evaluate_record(latest)?;
        Ok(Some(Self {
            generated_at,
            latest: latest.clone(),
            evaluation,
            trend: weight_trend(log, trend_window),
        }))
    }

    /// Render as a plain-text document
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail
        let _ = writeln!(out, "{}", REPORT_TITLE);
        let _ = writeln!(out, "{}", "=".repeat(REPORT_TITLE.len()));
        let _ = writeln!(
            out,
            "Generated: {}",
            self.generated_at.format(timestamp_format::FORMAT)
        );
        let _ = writeln!(out);

        for (name, value) in record_fields(&self.latest) {
            let _ = writeln!(out, "{}: {}", name, value);
        }
        let _ = writeln!(out);

        let eval = &self.evaluation;
        let _ = writeln!(out, "Ideal weight: {:.2} kg", eval.ideal_weight_kg);
        let _ = writeln!(out, "Weight judgment: {}", eval.weight_category);
        let _ = writeln!(out, "BMI judgment: {} ({:.2})", eval.bmi_category, eval.bmi);
        let _ = writeln!(out, "Waist judgment: {}", eval.waist_category);

        if !self.trend.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Weight trend ({})", crate::trend::window_label(self.trend.len()));
            for point in &self.trend {
                let _ = writeln!(
                    out,
                    "  {}  {:>6.1} kg",
                    point.timestamp.format(timestamp_format::FORMAT),
                    point.weight_kg
                );
            }
        }

        out
    }
}

/// `(column name, display value)` for every persisted column, in column order
pub fn record_fields(record: &HealthRecord) -> Vec<(&'static str, String)> {
    vec![
        (
            "timestamp",
            record.timestamp.format(timestamp_format::FORMAT).to_string(),
        ),
        ("height_m", record.height_m.to_string()),
        ("weight_kg", record.weight_kg.to_string()),
        ("waist_cm", record.waist_cm.to_string()),
        ("bmi", record.bmi.to_string()),
        ("gender", record.gender.to_string()),
        ("running_km", record.running_km.to_string()),
        ("cycling_km", record.cycling_km.to_string()),
        ("swimming_km", record.swimming_km.to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{schema, BmiCategory, Gender, WaistCategory, WeightCategory};
    use chrono::NaiveDate;

    fn ts(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, day)
            .unwrap()
            .and_hms_opt(8, 15, 0)
            .unwrap()
    }

    fn record(day: u32, weight_kg: f64, waist_cm: f64, stored_bmi: f64) -> HealthRecord {
        HealthRecord {
            timestamp: ts(day),
            height_m: 1.73,
            weight_kg,
            waist_cm,
            bmi: stored_bmi,
            gender: Gender::Male,
            running_km: 3.0,
            cycling_km: 0.0,
            swimming_km: 0.0,
        }
    }

    #[test]
    fn test_empty_log_has_no_report() {
        let report = HealthReport::from_log(&HealthLog::default(), 10, ts(19)).unwrap();
        assert!(report.is_none());
    }

    #[test]
    fn test_report_uses_latest_row() {
        let log = HealthLog::new(vec![
            record(1, 66.0, 83.0, 22.05),
            record(2, 90.0, 95.0, 30.07),
        ]);

        let report = HealthReport::from_log(&log, 10, ts(19)).unwrap().unwrap();
        assert_eq!(report.latest.weight_kg, 90.0);
        assert_eq!(report.evaluation.bmi_category, BmiCategory::SeverelyObese);
        assert_eq!(report.evaluation.waist_category, WaistCategory::MetabolicRisk);
        assert_eq!(report.evaluation.weight_category, WeightCategory::Overweight);
        assert_eq!(report.trend.len(), 2);
    }

    #[test]
    fn test_judgments_ignore_stored_bmi() {
        // Stored bmi disagrees with height/weight; the raw fields win
        let log = HealthLog::new(vec![record(1, 66.0, 83.0, 35.0)]);
        let report = HealthReport::from_log(&log, 10, ts(19)).unwrap().unwrap();
        assert_eq!(report.evaluation.bmi_category, BmiCategory::Normal);
    }

    #[test]
    fn test_invalid_stored_height_is_error() {
        let mut bad = record(1, 66.0, 83.0, 22.05);
        bad.height_m = 0.0;
        let log = HealthLog::new(vec![bad]);
        assert!(HealthReport::from_log(&log, 10, ts(19)).is_err());
    }

    #[test]
    fn test_render_text_contents() {
        let log = HealthLog::new(vec![record(1, 66.0, 83.0, 22.05)]);
        let text = HealthReport::from_log(&log, 10, ts(19))
            .unwrap()
            .unwrap()
            .render_text();

        assert!(text.starts_with(REPORT_TITLE));
        assert!(text.contains("Generated: 2026-10-19 08:15"));
        assert!(text.contains("timestamp: 2026-10-01 08:15"));
        assert!(text.contains("weight_kg: 66"));
        assert!(text.contains("gender: male"));
        assert!(text.contains("running_km: 3"));
        assert!(text.contains("Ideal weight: 65.84 kg"));
        assert!(text.contains("Weight judgment: normal"));
        assert!(text.contains("BMI judgment: normal (22.05)"));
        assert!(text.contains("Waist judgment: normal"));
        assert!(text.contains("Weight trend (latest record)"));
    }

    #[test]
    fn test_record_fields_follow_schema() {
        let names: Vec<&str> = record_fields(&record(1, 66.0, 83.0, 22.05))
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        let expected: Vec<&str> = schema::COLUMNS.iter().map(|c| c.name).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_report_serializes_to_json() {
        let log = HealthLog::new(vec![record(1, 66.0, 83.0, 22.05)]);
        let report = HealthReport::from_log(&log, 10, ts(19)).unwrap().unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["generated_at"], "2026-10-19 08:15");
        assert_eq!(json["latest"]["gender"], "male");
        assert_eq!(json["evaluation"]["bmi_category"], "normal");
        assert_eq!(json["trend"][0]["weight_kg"], 66.0);
    }
}
