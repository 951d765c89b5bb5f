use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::prediction::check_schema;
use crate::domain::model::{FeatureVector, WellnessScore};
use crate::domain::ports::WellnessModel;
use crate::utils::error::{Result, WellnessError};

/// On-disk model artifact. The estimator body is selected by the `kind` tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    pub feature_names: Vec<String>,
    #[serde(flatten)]
    pub estimator: Estimator,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Estimator {
    LinearRegression(LinearRegression),
    TreeEnsemble(TreeEnsemble),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegression {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default)]
    pub scaler: Option<StandardScaler>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEnsemble {
    pub trees: Vec<RegressionTree>,
    #[serde(default)]
    pub aggregation: Aggregation,
    #[serde(default)]
    pub base_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Random-forest style average of tree outputs.
    #[default]
    Mean,
    /// Boosting style sum of tree outputs.
    Sum,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

impl LinearRegression {
    fn check(&self, n_features: usize) -> std::result::Result<(), String> {
        if self.coefficients.len() != n_features {
            return Err(format!(
                "{} coefficients for {} features",
                self.coefficients.len(),
                n_features
            ));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|w| !w.is_finite()) {
            return Err("non-finite coefficient or intercept".to_string());
        }
        if let Some(scaler) = &self.scaler {
            if scaler.mean.len() != n_features || scaler.scale.len() != n_features {
                return Err(format!(
                    "scaler has {} means and {} scales for {} features",
                    scaler.mean.len(),
                    scaler.scale.len(),
                    n_features
                ));
            }
            if let Some(idx) = scaler.scale.iter().position(|s| *s == 0.0) {
                return Err(format!("scaler scale for feature {} is zero", idx));
            }
        }
        Ok(())
    }

    fn predict_row(&self, row: &[f64]) -> f64 {
        let mut acc = self.intercept;
        for (i, (x, w)) in row.iter().zip(&self.coefficients).enumerate() {
            let x = match &self.scaler {
                Some(scaler) => (x - scaler.mean[i]) / scaler.scale[i],
                None => *x,
            };
            acc += x * w;
        }
        acc
    }
}

impl RegressionTree {
    fn check(&self, n_features: usize) -> std::result::Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Leaf { value } if !value.is_finite() => {
                    return Err(format!("leaf {} has a non-finite value", idx));
                }
                TreeNode::Leaf { .. } => {}
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if !threshold.is_finite() {
                        return Err(format!("node {} has a non-finite threshold", idx));
                    }
                    if *feature >= n_features {
                        return Err(format!("node {} splits on unknown feature {}", idx, feature));
                    }
                    // children must come after their parent so traversal always terminates
                    for child in [left, right] {
                        if *child <= idx || *child >= self.nodes.len() {
                            return Err(format!("node {} has invalid child {}", idx, child));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn predict_row(&self, row: &[f64]) -> f64 {
        let mut idx = 0usize;
        loop {
            match &self.nodes[idx] {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

impl TreeEnsemble {
    fn check(&self, n_features: usize) -> std::result::Result<(), String> {
        if self.trees.is_empty() {
            return Err("ensemble has no trees".to_string());
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.check(n_features).map_err(|e| format!("tree {}: {}", i, e))?;
        }
        Ok(())
    }

    fn predict_row(&self, row: &[f64]) -> f64 {
        let total: f64 = self.trees.iter().map(|t| t.predict_row(row)).sum();
        match self.aggregation {
            Aggregation::Mean => self.base_score + total / self.trees.len() as f64,
            Aggregation::Sum => self.base_score + total,
        }
    }
}

impl Estimator {
    pub fn kind(&self) -> &'static str {
        match self {
            Estimator::LinearRegression(_) => "linear_regression",
            Estimator::TreeEnsemble(_) => "tree_ensemble",
        }
    }

    fn check(&self, n_features: usize) -> std::result::Result<(), String> {
        match self {
            Estimator::LinearRegression(m) => m.check(n_features),
            Estimator::TreeEnsemble(m) => m.check(n_features),
        }
    }

    fn predict_row(&self, row: &[f64]) -> f64 {
        match self {
            Estimator::LinearRegression(m) => m.predict_row(row),
            Estimator::TreeEnsemble(m) => m.predict_row(row),
        }
    }
}

/// A model artifact loaded once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct ModelStore {
    artifact: ModelArtifact,
    source: PathBuf,
}

impl ModelStore {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();
        tracing::debug!("Reading model artifact from {}", path_str);

        let content = std::fs::read_to_string(path)
            .map_err(|e| WellnessError::model_load(&path_str, e.to_string()))?;
        let store = Self::from_json_str(&content, path)?;

        tracing::info!(
            "Loaded {} model with {} features from {}",
            store.kind(),
            store.artifact.feature_names.len(),
            path_str
        );
        Ok(store)
    }

    pub fn from_json_str(content: &str, source: impl AsRef<Path>) -> Result<Self> {
        let source = source.as_ref().to_path_buf();
        let path_str = source.display().to_string();

        let artifact: ModelArtifact = serde_json::from_str(content)
            .map_err(|e| WellnessError::model_load(&path_str, format!("invalid artifact: {}", e)))?;
        Self::from_artifact(artifact, source)
    }

    pub fn from_artifact(artifact: ModelArtifact, source: impl AsRef<Path>) -> Result<Self> {
        let source = source.as_ref().to_path_buf();
        let path_str = source.display().to_string();

        if artifact.feature_names.is_empty() {
            return Err(WellnessError::model_load(&path_str, "artifact declares no features"));
        }
        artifact
            .estimator
            .check(artifact.feature_names.len())
            .map_err(|reason| WellnessError::model_load(&path_str, reason))?;

        Ok(Self { artifact, source })
    }

    pub fn kind(&self) -> &'static str {
        self.artifact.estimator.kind()
    }

    pub fn target(&self) -> Option<&str> {
        self.artifact.target.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.artifact.version.as_deref()
    }

    pub fn source(&self) -> &Path {
        &self.source
    }
}

impl WellnessModel for ModelStore {
    fn feature_names(&self) -> &[String] {
        &self.artifact.feature_names
    }

    fn predict(&self, features: &FeatureVector) -> Result<WellnessScore> {
        check_schema(&self.artifact.feature_names)?;

        let row: Vec<f64> = features.named_values().iter().map(|(_, v)| *v).collect();
        let score = self.artifact.estimator.predict_row(&row);
        tracing::debug!("Model {} predicted {}", self.kind(), score);
        Ok(score)
    }
}
