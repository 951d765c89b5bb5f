use crate::domain::model::{FeatureVector, WellnessScore};
use crate::utils::error::Result;

/// A loaded regression model.
pub trait WellnessModel {
    /// Input columns the model was trained on, in training order.
    fn feature_names(&self) -> &[String];

    fn predict(&self, features: &FeatureVector) -> Result<WellnessScore>;
}

/// Historical scores used for population comparison.
pub trait ReferenceScores {
    fn scores(&self) -> &[WellnessScore];

    /// Share of reference scores strictly below `score`, scaled to 0..=100.
    /// `None` when there is nothing to compare against.
    fn percentile(&self, score: WellnessScore) -> Option<f64>;
}
