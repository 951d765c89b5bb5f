//! The named feature schema shared by the survey form and the model store.
//!
//! `FEATURE_SCHEMA` is listed in model order. The form groups the same
//! entries by [`Section`] for display.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Section {
    Lifestyle,
    WorkAndScreenTime,
    Sleep,
    SocialAndStress,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Lifestyle,
        Section::WorkAndScreenTime,
        Section::Sleep,
        Section::SocialAndStress,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Section::Lifestyle => "Lifestyle",
            Section::WorkAndScreenTime => "Work & Screen Time",
            Section::Sleep => "Sleep",
            Section::SocialAndStress => "Social & Stress",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub section: Section,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub step: f64,
}

impl FeatureSpec {
    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }
}

pub const FEATURE_COUNT: usize = 10;

pub const FEATURE_SCHEMA: [FeatureSpec; FEATURE_COUNT] = [
    FeatureSpec {
        name: "age",
        label: "Age",
        section: Section::Lifestyle,
        min: 10.0,
        max: 100.0,
        default: 30.0,
        step: 1.0,
    },
    FeatureSpec {
        name: "screen_time_hours",
        label: "Total screen time per day (hours)",
        section: Section::WorkAndScreenTime,
        min: 0.0,
        max: 24.0,
        default: 6.0,
        step: 1.0,
    },
    FeatureSpec {
        name: "work_screen_hours",
        label: "Work screen time per day (hours)",
        section: Section::WorkAndScreenTime,
        min: 0.0,
        max: 24.0,
        default: 5.0,
        step: 1.0,
    },
    FeatureSpec {
        name: "leisure_screen_hours",
        label: "Leisure screen time per day (hours)",
        section: Section::WorkAndScreenTime,
        min: 0.0,
        max: 24.0,
        default: 2.0,
        step: 1.0,
    },
    FeatureSpec {
        name: "sleep_hours",
        label: "Sleep hours per night",
        section: Section::Sleep,
        min: 0.0,
        max: 24.0,
        default: 7.0,
        step: 1.0,
    },
    FeatureSpec {
        name: "sleep_quality_1_5",
        label: "Sleep quality (1-5)",
        section: Section::Sleep,
        min: 1.0,
        max: 5.0,
        default: 3.0,
        step: 1.0,
    },
    FeatureSpec {
        name: "stress_level_0_10",
        label: "Stress level (0-10)",
        section: Section::SocialAndStress,
        min: 0.0,
        max: 10.0,
        default: 5.0,
        step: 1.0,
    },
    FeatureSpec {
        name: "productivity_0_100",
        label: "Productivity (0-100)",
        section: Section::WorkAndScreenTime,
        min: 0.0,
        max: 100.0,
        default: 70.0,
        step: 1.0,
    },
    FeatureSpec {
        name: "exercise_minutes_per_week",
        label: "Exercise minutes per week",
        section: Section::Lifestyle,
        min: 0.0,
        max: 1000.0,
        default: 120.0,
        step: 10.0,
    },
    FeatureSpec {
        name: "social_hours_per_week",
        label: "Social hours per week",
        section: Section::SocialAndStress,
        min: 0.0,
        max: 100.0,
        default: 10.0,
        step: 1.0,
    },
];

pub fn feature_names() -> [&'static str; FEATURE_COUNT] {
    FEATURE_SCHEMA.map(|spec| spec.name)
}

pub fn feature_spec(name: &str) -> Option<&'static FeatureSpec> {
    FEATURE_SCHEMA.iter().find(|spec| spec.name == name)
}

/// Schema entries belonging to `section`, in model order.
pub fn section_features(section: Section) -> impl Iterator<Item = &'static FeatureSpec> {
    FEATURE_SCHEMA
        .iter()
        .filter(move |spec| spec.section == section)
}
