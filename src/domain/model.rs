use serde::{Deserialize, Serialize};

use crate::domain::schema::{feature_spec, FEATURE_COUNT, FEATURE_SCHEMA};
use crate::utils::error::{Result, WellnessError};

pub type WellnessScore = f64;

/// One survey response, one field per schema entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub age: f64,
    pub screen_time_hours: f64,
    pub work_screen_hours: f64,
    pub leisure_screen_hours: f64,
    pub sleep_hours: f64,
    pub sleep_quality_1_5: f64,
    pub stress_level_0_10: f64,
    pub productivity_0_100: f64,
    pub exercise_minutes_per_week: f64,
    pub social_hours_per_week: f64,
}

impl Default for FeatureVector {
    fn default() -> Self {
        let mut vector = FeatureVector {
            age: 0.0,
            screen_time_hours: 0.0,
            work_screen_hours: 0.0,
            leisure_screen_hours: 0.0,
            sleep_hours: 0.0,
            sleep_quality_1_5: 0.0,
            stress_level_0_10: 0.0,
            productivity_0_100: 0.0,
            exercise_minutes_per_week: 0.0,
            social_hours_per_week: 0.0,
        };
        for spec in FEATURE_SCHEMA.iter() {
            if let Some(slot) = vector.slot_mut(spec.name) {
                *slot = spec.default;
            }
        }
        vector
    }
}

impl FeatureVector {
    fn slot_mut(&mut self, name: &str) -> Option<&mut f64> {
        let slot = match name {
            "age" => &mut self.age,
            "screen_time_hours" => &mut self.screen_time_hours,
            "work_screen_hours" => &mut self.work_screen_hours,
            "leisure_screen_hours" => &mut self.leisure_screen_hours,
            "sleep_hours" => &mut self.sleep_hours,
            "sleep_quality_1_5" => &mut self.sleep_quality_1_5,
            "stress_level_0_10" => &mut self.stress_level_0_10,
            "productivity_0_100" => &mut self.productivity_0_100,
            "exercise_minutes_per_week" => &mut self.exercise_minutes_per_week,
            "social_hours_per_week" => &mut self.social_hours_per_week,
            _ => return None,
        };
        Some(slot)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        let value = match name {
            "age" => self.age,
            "screen_time_hours" => self.screen_time_hours,
            "work_screen_hours" => self.work_screen_hours,
            "leisure_screen_hours" => self.leisure_screen_hours,
            "sleep_hours" => self.sleep_hours,
            "sleep_quality_1_5" => self.sleep_quality_1_5,
            "stress_level_0_10" => self.stress_level_0_10,
            "productivity_0_100" => self.productivity_0_100,
            "exercise_minutes_per_week" => self.exercise_minutes_per_week,
            "social_hours_per_week" => self.social_hours_per_week,
            _ => return None,
        };
        Some(value)
    }

    /// Sets a field after checking it against the schema range.
    pub fn set(&mut self, name: &str, value: f64) -> Result<()> {
        let spec = feature_spec(name).ok_or_else(|| WellnessError::InvalidInputError {
            field: name.to_string(),
            reason: "unknown feature".to_string(),
        })?;
        if !spec.contains(value) {
            return Err(WellnessError::InvalidInputError {
                field: name.to_string(),
                reason: format!(
                    "{} is outside the allowed range {}..={}",
                    value, spec.min, spec.max
                ),
            });
        }
        if let Some(slot) = self.slot_mut(name) {
            *slot = value;
        }
        Ok(())
    }

    /// Name/value pairs in model order.
    pub fn named_values(&self) -> [(&'static str, f64); FEATURE_COUNT] {
        FEATURE_SCHEMA.map(|spec| (spec.name, self.get(spec.name).unwrap_or(f64::NAN)))
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in self.named_values() {
            if let Some(spec) = feature_spec(name) {
                if !spec.contains(value) {
                    return Err(WellnessError::InvalidInputError {
                        field: name.to_string(),
                        reason: format!(
                            "{} is outside the allowed range {}..={}",
                            value, spec.min, spec.max
                        ),
                    });
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Low,
    Moderate,
    High,
}

impl Band {
    pub const LOW_UPPER: f64 = 40.0;
    pub const MODERATE_UPPER: f64 = 70.0;

    pub fn from_score(score: WellnessScore) -> Self {
        match score {
            s if s < Self::LOW_UPPER => Band::Low,
            s if s < Self::MODERATE_UPPER => Band::Moderate,
            _ => Band::High,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Band::Low => "low",
            Band::Moderate => "moderate",
            Band::High => "high",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Band::Low => {
                "This score indicates low wellness. Stress management or lifestyle changes may help."
            }
            Band::Moderate => {
                "This score indicates moderate wellness. There is room for improvement."
            }
            Band::High => "This score indicates high wellness! Keep up the good habits.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    pub score: WellnessScore,
    pub band: Band,
    /// `None` when the reference distribution is empty.
    pub percentile: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries() {
        assert_eq!(Band::from_score(39.999), Band::Low);
        assert_eq!(Band::from_score(40.0), Band::Moderate);
        assert_eq!(Band::from_score(69.999), Band::Moderate);
        assert_eq!(Band::from_score(70.0), Band::High);
    }

    #[test]
    fn test_band_outside_conventional_range() {
        assert_eq!(Band::from_score(-5.0), Band::Low);
        assert_eq!(Band::from_score(0.0), Band::Low);
        assert_eq!(Band::from_score(100.0), Band::High);
        assert_eq!(Band::from_score(123.4), Band::High);
    }

    #[test]
    fn test_band_sweep() {
        let mut s = -10.0;
        while s < 110.0 {
            let expected = if s < 40.0 {
                Band::Low
            } else if s < 70.0 {
                Band::Moderate
            } else {
                Band::High
            };
            assert_eq!(Band::from_score(s), expected, "score {}", s);
            s += 0.25;
        }
    }

    #[test]
    fn test_default_vector_uses_schema_defaults() {
        let v = FeatureVector::default();
        assert_eq!(v.age, 30.0);
        assert_eq!(v.screen_time_hours, 6.0);
        assert_eq!(v.work_screen_hours, 5.0);
        assert_eq!(v.leisure_screen_hours, 2.0);
        assert_eq!(v.sleep_hours, 7.0);
        assert_eq!(v.sleep_quality_1_5, 3.0);
        assert_eq!(v.stress_level_0_10, 5.0);
        assert_eq!(v.productivity_0_100, 70.0);
        assert_eq!(v.exercise_minutes_per_week, 120.0);
        assert_eq!(v.social_hours_per_week, 10.0);
        assert!(v.validate().is_ok());
    }

    #[test]
    fn test_set_rejects_out_of_range_and_keeps_value() {
        let mut v = FeatureVector::default();
        assert!(v.set("sleep_quality_1_5", 6.0).is_err());
        assert!(v.set("sleep_quality_1_5", 0.0).is_err());
        assert_eq!(v.sleep_quality_1_5, 3.0);
        v.set("sleep_quality_1_5", 5.0).unwrap();
        assert_eq!(v.sleep_quality_1_5, 5.0);
    }

    #[test]
    fn test_set_rejects_unknown_field() {
        let mut v = FeatureVector::default();
        let err = v.set("bmi", 22.0).unwrap_err();
        assert!(matches!(err, WellnessError::InvalidInputError { .. }));
    }

    #[test]
    fn test_screen_hours_need_not_add_up() {
        let mut v = FeatureVector::default();
        v.set("screen_time_hours", 2.0).unwrap();
        v.set("work_screen_hours", 10.0).unwrap();
        v.set("leisure_screen_hours", 10.0).unwrap();
        assert!(v.validate().is_ok());
    }

    #[test]
    fn test_named_values_in_model_order() {
        let v = FeatureVector::default();
        let values = v.named_values();
        assert_eq!(values[0], ("age", 30.0));
        assert_eq!(values[9], ("social_hours_per_week", 10.0));
    }
}
