//! Artifact checks run by the `wellness-check` binary before deployment.

use std::io::Write;
use std::path::Path;

use crate::config::toml_config::AppConfig;
use crate::core::model_store::ModelStore;
use crate::core::prediction::check_schema;
use crate::core::reference::{CsvSource, ReferenceDistribution};
use crate::domain::model::FeatureVector;
use crate::domain::ports::{ReferenceScores, WellnessModel};
use crate::utils::error::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct CheckOutcome {
    pub name: &'static str,
    pub passed: bool,
    pub detail: String,
}

impl CheckOutcome {
    fn pass(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            passed: true,
            detail: detail.into(),
        }
    }

    fn fail(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            passed: false,
            detail: detail.into(),
        }
    }

    fn skipped(name: &'static str, because: &str) -> Self {
        Self::fail(name, format!("not run: {} failed", because))
    }
}

#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    pub outcomes: Vec<CheckOutcome>,
}

impl CheckReport {
    pub fn all_passed(&self) -> bool {
        self.outcomes.iter().all(|o| o.passed)
    }

    pub fn exit_code(&self) -> i32 {
        if self.all_passed() {
            0
        } else {
            1
        }
    }

    pub fn render<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        for outcome in &self.outcomes {
            let status = if outcome.passed { "PASS" } else { "FAIL" };
            writeln!(out, "[{}] {}: {}", status, outcome.name, outcome.detail)?;
        }
        let passed = self.outcomes.iter().filter(|o| o.passed).count();
        writeln!(out, "{} of {} checks passed", passed, self.outcomes.len())?;
        Ok(())
    }
}

/// Answers used for the model smoke prediction.
pub fn sample_features() -> Result<FeatureVector> {
    let mut features = FeatureVector::default();
    for (name, value) in [
        ("age", 30.0),
        ("screen_time_hours", 8.0),
        ("work_screen_hours", 5.0),
        ("leisure_screen_hours", 3.0),
        ("sleep_hours", 7.0),
        ("sleep_quality_1_5", 4.0),
        ("stress_level_0_10", 5.0),
        ("productivity_0_100", 75.0),
        ("exercise_minutes_per_week", 150.0),
        ("social_hours_per_week", 10.0),
    ] {
        features.set(name, value)?;
    }
    Ok(features)
}

fn read_headers(path: &Path, delimiter: u8) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_path(path)?;
    Ok(reader.headers()?.iter().map(|h| h.trim().to_string()).collect())
}

fn check_data(config: &AppConfig, delimiter: u8, outcomes: &mut Vec<CheckOutcome>) {
    let path = Path::new(&config.reference.path);
    let column = config.reference.score_column.as_str();
    let source = CsvSource::new(path)
        .with_score_column(column)
        .with_delimiter(delimiter);

    match read_headers(path, delimiter) {
        Ok(headers) => {
            let missing: Vec<&str> = ["age", column]
                .into_iter()
                .filter(|required| !headers.iter().any(|h| h == required))
                .collect();
            if missing.is_empty() {
                outcomes.push(CheckOutcome::pass(
                    "required_columns",
                    format!("found age and {}", column),
                ));
            } else {
                outcomes.push(CheckOutcome::fail(
                    "required_columns",
                    format!("missing column(s): {}", missing.join(", ")),
                ));
            }
        }
        Err(e) => outcomes.push(CheckOutcome::fail("required_columns", e.to_string())),
    }

    let distribution = match ReferenceDistribution::load(&source) {
        Ok(d) if d.is_empty() => {
            outcomes.push(CheckOutcome::fail("data_loads", "no valid scores in file"));
            outcomes.push(CheckOutcome::skipped("wellness_range", "data_loads"));
            return;
        }
        Ok(d) => {
            outcomes.push(CheckOutcome::pass(
                "data_loads",
                format!("{} scores ({} rows dropped)", d.len(), d.dropped()),
            ));
            d
        }
        Err(e) => {
            outcomes.push(CheckOutcome::fail("data_loads", e.to_string()));
            outcomes.push(CheckOutcome::skipped("wellness_range", "data_loads"));
            return;
        }
    };

    let out_of_range = distribution
        .scores()
        .iter()
        .filter(|s| !(0.0..=100.0).contains(*s))
        .count();
    if out_of_range == 0 {
        outcomes.push(CheckOutcome::pass("wellness_range", "all scores within 0..=100"));
    } else {
        outcomes.push(CheckOutcome::fail(
            "wellness_range",
            format!("{} scores outside 0..=100", out_of_range),
        ));
    }
}

fn check_model(config: &AppConfig, outcomes: &mut Vec<CheckOutcome>) {
    let model = match ModelStore::load(&config.model.path) {
        Ok(model) => {
            outcomes.push(CheckOutcome::pass(
                "model_loads",
                format!("{} model from {}", model.kind(), config.model.path),
            ));
            model
        }
        Err(e) => {
            outcomes.push(CheckOutcome::fail("model_loads", e.to_string()));
            outcomes.push(CheckOutcome::skipped("model_schema", "model_loads"));
            outcomes.push(CheckOutcome::skipped("model_prediction", "model_loads"));
            return;
        }
    };

    if let Err(e) = check_schema(model.feature_names()) {
        outcomes.push(CheckOutcome::fail("model_schema", e.to_string()));
        outcomes.push(CheckOutcome::skipped("model_prediction", "model_schema"));
        return;
    }
    outcomes.push(CheckOutcome::pass(
        "model_schema",
        "model accepts the survey feature schema",
    ));

    let prediction = sample_features().and_then(|features| model.predict(&features));
    match prediction {
        Ok(score) if (0.0..=100.0).contains(&score) => outcomes.push(CheckOutcome::pass(
            "model_prediction",
            format!("sample prediction {:.2}", score),
        )),
        Ok(score) => outcomes.push(CheckOutcome::fail(
            "model_prediction",
            format!("sample prediction {:.2} outside 0..=100", score),
        )),
        Err(e) => outcomes.push(CheckOutcome::fail("model_prediction", e.to_string())),
    }
}

pub fn run_checks(config: &AppConfig) -> CheckReport {
    let mut outcomes = Vec::new();

    match config.delimiter_byte() {
        Ok(delimiter) => check_data(config, delimiter, &mut outcomes),
        Err(e) => outcomes.push(CheckOutcome::fail("data_loads", e.to_string())),
    }
    check_model(config, &mut outcomes);

    let report = CheckReport { outcomes };
    for failed in report.outcomes.iter().filter(|o| !o.passed) {
        tracing::warn!("Check {} failed: {}", failed.name, failed.detail);
    }
    report
}
