//! Core domain types for the health log.
//!
//! This module defines:
//! - Measurement inputs (gender, body measurements, activity distances)
//! - Evaluation outputs (BMI, ideal weight, categorical judgments)
//! - The persisted row type and the in-memory log

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Input Types
// ============================================================================

/// Gender, which selects the waist-circumference threshold
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    #[serde(alias = "男性")]
    Male,
    #[serde(alias = "女性")]
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" | "男性" => Ok(Gender::Male),
            "female" | "f" | "女性" => Ok(Gender::Female),
            other => Err(crate::Error::InvalidInput(format!(
                "unknown gender '{}' (expected male or female)",
                other
            ))),
        }
    }
}

/// Optional activity distances for the day, in kilometres
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Activity {
    pub running_km: f64,
    pub cycling_km: f64,
    pub swimming_km: f64,
}

/// Raw body measurement supplied by the user
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Measurement {
    pub height_m: f64,
    pub weight_kg: f64,
    pub waist_cm: f64,
    pub gender: Gender,
    #[serde(default)]
    pub activity: Activity,
}

// ============================================================================
// Judgment Types
// ============================================================================

/// BMI band
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Normal,
    ObeseClass1,
    SeverelyObese,
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BmiCategory::Underweight => "underweight",
            BmiCategory::Normal => "normal",
            BmiCategory::ObeseClass1 => "obese (class 1)",
            BmiCategory::SeverelyObese => "severely obese",
        })
    }
}

/// Waist-circumference judgment
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WaistCategory {
    Normal,
    MetabolicRisk,
}

impl fmt::Display for WaistCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WaistCategory::Normal => "normal",
            WaistCategory::MetabolicRisk => "possible metabolic syndrome",
        })
    }
}

/// Deviation of actual weight from ideal weight
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WeightCategory {
    Underweight,
    Normal,
    Overweight,
}

impl fmt::Display for WeightCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WeightCategory::Underweight => "underweight",
            WeightCategory::Normal => "normal",
            WeightCategory::Overweight => "overweight",
        })
    }
}

/// Everything the evaluator derives from one measurement
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Evaluation {
    pub bmi: f64,
    pub ideal_weight_kg: f64,
    pub bmi_category: BmiCategory,
    pub waist_category: WaistCategory,
    pub weight_category: WeightCategory,
}

// ============================================================================
// Log Types
// ============================================================================

/// One row of the persisted log.
///
/// Field order matches the on-disk column order. Judgments are never stored;
/// they are re-derived from these fields whenever they are needed.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HealthRecord {
    #[serde(with = "timestamp_format")]
    pub timestamp: NaiveDateTime,
    pub height_m: f64,
    pub weight_kg: f64,
    pub waist_cm: f64,
    pub bmi: f64,
    pub gender: Gender,
    pub running_km: f64,
    pub cycling_km: f64,
    pub swimming_km: f64,
}

impl HealthRecord {
    /// Build a log row from a measurement and its evaluation.
    ///
    /// The timestamp is truncated to the minute and the BMI rounded to two
    /// decimals, matching what survives a trip through storage.
    pub fn new(timestamp: NaiveDateTime, measurement: &Measurement, evaluation: &Evaluation) -> Self {
        Self {
            timestamp: truncate_to_minute(timestamp),
            height_m: measurement.height_m,
            weight_kg: measurement.weight_kg,
            waist_cm: measurement.waist_cm,
            bmi: crate::evaluator::round2(evaluation.bmi),
            gender: measurement.gender,
            running_km: measurement.activity.running_km,
            cycling_km: measurement.activity.cycling_km,
            swimming_km: measurement.activity.swimming_km,
        }
    }

    /// The raw measurement this row was recorded from
    pub fn measurement(&self) -> Measurement {
        Measurement {
            height_m: self.height_m,
            weight_kg: self.weight_kg,
            waist_cm: self.waist_cm,
            gender: self.gender,
            activity: Activity {
                running_km: self.running_km,
                cycling_km: self.cycling_km,
                swimming_km: self.swimming_km,
            },
        }
    }
}

/// Drop seconds and sub-second precision
pub fn truncate_to_minute(ts: NaiveDateTime) -> NaiveDateTime {
    ts.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(ts)
}

/// `YYYY-MM-DD HH:MM` serde format for log timestamps
pub mod timestamp_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M";

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&ts.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(raw.trim(), FORMAT).map_err(serde::de::Error::custom)
    }
}

/// The append-only table of records, in append order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HealthLog {
    records: Vec<HealthRecord>,
}

impl HealthLog {
    pub fn new(records: Vec<HealthRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[HealthRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Most recently appended record
    pub fn latest(&self) -> Option<&HealthRecord> {
        self.records.last()
    }

    /// The last `n` records in append order
    pub fn tail(&self, n: usize) -> &[HealthRecord] {
        let start = self.records.len().saturating_sub(n);
        &self.records[start..]
    }

    pub(crate) fn push(&mut self, record: HealthRecord) {
        self.records.push(record);
    }
}
