pub mod config;
pub mod core;
pub mod domain;
pub mod report;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::AppConfig;

pub use core::{
    collector::FeatureCollector, model_store::ModelStore, prediction::PredictionService,
    reference::{CsvSource, ReferenceDistribution},
};
pub use domain::model::{Band, FeatureVector, PredictionResult};
pub use utils::error::{Result, WellnessError};
