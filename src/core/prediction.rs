use crate::domain::model::{Band, FeatureVector, PredictionResult};
use crate::domain::ports::{ReferenceScores, WellnessModel};
use crate::domain::schema::feature_names;
use crate::utils::error::{Result, WellnessError};

/// Orchestrates one prediction: model score, band, population percentile.
///
/// The model and reference data are built by the caller and handed in, so
/// tests can substitute fixed implementations of either port.
pub struct PredictionService<M: WellnessModel, R: ReferenceScores> {
    model: M,
    reference: R,
}

impl<M: WellnessModel, R: ReferenceScores> PredictionService<M, R> {
    /// Fails with a schema mismatch if the model was not trained on the
    /// survey's feature schema, so version skew surfaces at startup.
    pub fn new(model: M, reference: R) -> Result<Self> {
        check_schema(model.feature_names())?;
        Ok(Self { model, reference })
    }

    pub fn run(&self, features: &FeatureVector) -> Result<PredictionResult> {
        let score = self.model.predict(features)?;
        if !score.is_finite() {
            return Err(WellnessError::PredictionError {
                reason: format!("score is {}", score),
            });
        }
        let band = Band::from_score(score);
        let percentile = self.reference.percentile(score);

        tracing::debug!(
            "Prediction: score={:.4}, band={}, percentile={:?}",
            score,
            band.as_str(),
            percentile
        );

        Ok(PredictionResult {
            score,
            band,
            percentile,
        })
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn reference(&self) -> &R {
        &self.reference
    }
}

pub fn check_schema(model_features: &[String]) -> Result<()> {
    let schema = feature_names();
    let matches = model_features.len() == schema.len()
        && model_features
            .iter()
            .zip(schema.iter())
            .all(|(model, expected)| model == expected);
    if !matches {
        return Err(WellnessError::schema_mismatch(model_features, &schema[..]));
    }
    Ok(())
}
