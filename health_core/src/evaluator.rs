//! Health evaluation: BMI, ideal weight and the three categorical judgments.
//!
//! Each judgment is an ordered decision table. Rows are checked top to bottom
//! and the first row whose exclusive upper bound exceeds the value wins, so
//! every lower bound is inclusive.

use crate::{
    BmiCategory, Error, Evaluation, Gender, HealthRecord, Result, WaistCategory, WeightCategory,
};

/// BMI that defines "ideal" weight for a given height
pub const REFERENCE_BMI: f64 = 22.0;

/// Fraction of ideal weight within which actual weight counts as normal
pub const IDEAL_WEIGHT_TOLERANCE: f64 = 0.1;

/// `(exclusive upper bound, category)`; values at or above the last bound
/// fall through to [`BmiCategory::SeverelyObese`].
const BMI_TABLE: &[(f64, BmiCategory)] = &[
    (18.5, BmiCategory::Underweight),
    (25.0, BmiCategory::Normal),
    (30.0, BmiCategory::ObeseClass1),
];

/// Waist circumference (cm) at which metabolic risk begins
pub fn waist_threshold_cm(gender: Gender) -> f64 {
    match gender {
        Gender::Male => 85.0,
        Gender::Female => 90.0,
    }
}

/// Evaluate one measurement.
///
/// Rejects non-positive or non-finite height and weight and negative waist
/// instead of producing infinite or NaN results.
pub fn evaluate(height_m: f64, weight_kg: f64, waist_cm: f64, gender: Gender) -> Result<Evaluation> {
    if !height_m.is_finite() || height_m <= 0.0 {
        return Err(Error::InvalidInput(format!(
            "height must be positive, got {}",
            height_m
        )));
    }
    if !weight_kg.is_finite() || weight_kg <= 0.0 {
        return Err(Error::InvalidInput(format!(
            "weight must be positive, got {}",
            weight_kg
        )));
    }
    if !waist_cm.is_finite() || waist_cm < 0.0 {
        return Err(Error::InvalidInput(format!(
            "waist must not be negative, got {}",
            waist_cm
        )));
    }

    let bmi = weight_kg / height_m.powi(2);
    let ideal = ideal_weight_kg(height_m);

    Ok(Evaluation {
        bmi,
        ideal_weight_kg: ideal,
        bmi_category: classify_bmi(bmi),
        waist_category: classify_waist(waist_cm, gender),
        weight_category: classify_weight(weight_kg, ideal),
    })
}

/// Re-derive the evaluation of a stored row from its raw fields.
///
/// The stored `bmi` column is ignored; BMI is recomputed from height and
/// weight so the judgments never depend on persisted derived values.
pub fn evaluate_record(record: &HealthRecord) -> Result<Evaluation> {
    evaluate(record.height_m, record.weight_kg, record.waist_cm, record.gender)
}

pub fn ideal_weight_kg(height_m: f64) -> f64 {
    REFERENCE_BMI * height_m.powi(2)
}

pub fn classify_bmi(bmi: f64) -> BmiCategory {
    BMI_TABLE
        .iter()
        .find(|(upper, _)| bmi < *upper)
        .map(|(_, category)| *category)
        .unwrap_or(BmiCategory::SeverelyObese)
}

pub fn classify_waist(waist_cm: f64, gender: Gender) -> WaistCategory {
    if waist_cm < waist_threshold_cm(gender) {
        WaistCategory::Normal
    } else {
        WaistCategory::MetabolicRisk
    }
}

pub fn classify_weight(weight_kg: f64, ideal_weight_kg: f64) -> WeightCategory {
    let diff = weight_kg - ideal_weight_kg;
    if diff.abs() <= ideal_weight_kg * IDEAL_WEIGHT_TOLERANCE {
        WeightCategory::Normal
    } else if diff < 0.0 {
        WeightCategory::Underweight
    } else {
        WeightCategory::Overweight
    }
}

/// Round to two decimal places (the precision BMI is stored at)
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEIGHT: f64 = 1.73;

    #[test]
    fn test_bmi_boundaries() {
        assert_eq!(classify_bmi(18.49), BmiCategory::Underweight);
        assert_eq!(classify_bmi(18.5), BmiCategory::Normal);
        assert_eq!(classify_bmi(24.99), BmiCategory::Normal);
        assert_eq!(classify_bmi(25.0), BmiCategory::ObeseClass1);
        assert_eq!(classify_bmi(29.99), BmiCategory::ObeseClass1);
        assert_eq!(classify_bmi(30.0), BmiCategory::SeverelyObese);
        assert_eq!(classify_bmi(45.0), BmiCategory::SeverelyObese);
    }

    #[test]
    fn test_waist_boundaries() {
        assert_eq!(classify_waist(85.0, Gender::Male), WaistCategory::MetabolicRisk);
        assert_eq!(classify_waist(84.999, Gender::Male), WaistCategory::Normal);
        assert_eq!(classify_waist(90.0, Gender::Female), WaistCategory::MetabolicRisk);
        assert_eq!(classify_waist(89.9, Gender::Female), WaistCategory::Normal);
        // Same waist, different verdict by gender
        assert_eq!(classify_waist(87.0, Gender::Male), WaistCategory::MetabolicRisk);
        assert_eq!(classify_waist(87.0, Gender::Female), WaistCategory::Normal);
    }

    #[test]
    fn test_weight_deviation_boundaries() {
        let ideal = ideal_weight_kg(HEIGHT);
        assert!((ideal - 65.8438).abs() < 1e-9);

        // ±10% band is 59.25942..=72.42818
        assert_eq!(classify_weight(60.0, ideal), WeightCategory::Normal);
        assert_eq!(classify_weight(72.4, ideal), WeightCategory::Normal);
        assert_eq!(classify_weight(59.2, ideal), WeightCategory::Underweight);
        assert_eq!(classify_weight(72.5, ideal), WeightCategory::Overweight);
        assert_eq!(classify_weight(ideal, ideal), WeightCategory::Normal);
    }

    #[test]
    fn test_weight_deviation_edges_through_evaluate() {
        let category = |w: f64| evaluate(HEIGHT, w, 80.0, Gender::Male).unwrap().weight_category;
        let ideal = ideal_weight_kg(HEIGHT);

        assert_eq!(category(59.25), WeightCategory::Underweight);
        assert_eq!(category(59.26), WeightCategory::Normal);
        assert_eq!(category(72.42), WeightCategory::Normal);
        assert_eq!(category(72.43), WeightCategory::Overweight);

        // Exact ±10% products: the lower edge lands inside the band, the
        // upper edge rounds just outside it
        assert_eq!(category(ideal * 0.9), WeightCategory::Normal);
        assert_eq!(category(ideal * 1.1), WeightCategory::Overweight);
    }

    #[test]
    fn test_evaluate_record_recomputes_bmi_at_band_edge() {
        // 74.81 / 1.73^2 = 24.9958, stored rounded as 25.0
        let record = HealthRecord {
            timestamp: chrono::NaiveDate::from_ymd_opt(2026, 10, 1)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
            height_m: HEIGHT,
            weight_kg: 74.81,
            waist_cm: 80.0,
            bmi: 25.0,
            gender: Gender::Male,
            running_km: 0.0,
            cycling_km: 0.0,
            swimming_km: 0.0,
        };

        assert_eq!(classify_bmi(record.bmi), BmiCategory::ObeseClass1);
        let eval = evaluate_record(&record).unwrap();
        assert!(eval.bmi < 25.0);
        assert_eq!(eval.bmi_category, BmiCategory::Normal);
    }

    #[test]
    fn test_scenario_normal_male() {
        let eval = evaluate(HEIGHT, 66.0, 83.0, Gender::Male).unwrap();
        assert!((eval.bmi - 22.05).abs() < 0.01);
        assert!((eval.ideal_weight_kg - 65.84).abs() < 0.01);
        assert_eq!(eval.bmi_category, BmiCategory::Normal);
        assert_eq!(eval.waist_category, WaistCategory::Normal);
        assert_eq!(eval.weight_category, WeightCategory::Normal);
    }

    #[test]
    fn test_scenario_severely_obese_male() {
        let eval = evaluate(HEIGHT, 90.0, 95.0, Gender::Male).unwrap();
        assert!((eval.bmi - 30.07).abs() < 0.01);
        assert_eq!(eval.bmi_category, BmiCategory::SeverelyObese);
        assert_eq!(eval.waist_category, WaistCategory::MetabolicRisk);
        assert_eq!(eval.weight_category, WeightCategory::Overweight);
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        let a = evaluate(HEIGHT, 71.3, 86.2, Gender::Female).unwrap();
        let b = evaluate(HEIGHT, 71.3, 86.2, Gender::Female).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_height_rejected() {
        for height in [0.0, -1.73, f64::NAN, f64::INFINITY] {
            let err = evaluate(height, 66.0, 83.0, Gender::Male).unwrap_err();
            assert!(matches!(err, Error::InvalidInput(_)));
        }
    }

    #[test]
    fn test_invalid_weight_and_waist_rejected() {
        assert!(matches!(
            evaluate(HEIGHT, 0.0, 83.0, Gender::Male),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            evaluate(HEIGHT, 66.0, -1.0, Gender::Male),
            Err(Error::InvalidInput(_))
        ));
        // Zero waist is allowed
        assert!(evaluate(HEIGHT, 66.0, 0.0, Gender::Male).is_ok());
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(22.052_222), 22.05);
        assert_eq!(round2(30.071_2), 30.07);
        assert_eq!(round2(18.499), 18.5);
    }
}
