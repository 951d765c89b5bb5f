pub mod json;
pub mod text;

use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::core::model_store::ModelStore;
use crate::core::reference::ReferenceDistribution;
use crate::domain::model::{FeatureVector, PredictionResult};
use crate::utils::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl ReportFormat {
    pub const NAMES: [&'static str; 2] = ["text", "json"];

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub kind: String,
    pub target: Option<String>,
    pub version: Option<String>,
    pub source: String,
}

impl From<&ModelStore> for ModelInfo {
    fn from(store: &ModelStore) -> Self {
        Self {
            kind: store.kind().to_string(),
            target: store.target().map(str::to_string),
            version: store.version().map(str::to_string),
            source: store.source().display().to_string(),
        }
    }
}

/// Everything one rendered prediction needs. Pure projection, no logic.
pub struct Report<'a> {
    pub features: &'a FeatureVector,
    pub result: &'a PredictionResult,
    pub reference: &'a ReferenceDistribution,
    pub model: ModelInfo,
    pub histogram_bins: usize,
    pub histogram_width: usize,
}

pub fn render<W: Write>(report: &Report<'_>, format: ReportFormat, out: &mut W) -> Result<()> {
    match format {
        ReportFormat::Text => text::render(report, out)?,
        ReportFormat::Json => json::render(report, out)?,
    }
    Ok(())
}
