pub mod checks;
pub mod collector;
pub mod model_store;
pub mod prediction;
pub mod reference;

pub use crate::domain::model::{Band, FeatureVector, PredictionResult, WellnessScore};
pub use crate::domain::ports::{ReferenceScores, WellnessModel};
pub use crate::utils::error::Result;
