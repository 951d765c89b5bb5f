use serde::Serialize;
use std::io::Write;

use crate::core::reference::{Histogram, ReferenceSummary};
use crate::domain::model::{Band, FeatureVector, WellnessScore};
use crate::report::{ModelInfo, Report};
use crate::utils::error::Result;

#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub generated_at: String,
    pub tool_version: &'static str,
    pub inputs: &'a FeatureVector,
    pub score: WellnessScore,
    pub band: Band,
    pub message: &'static str,
    /// `null` when the reference dataset is empty.
    pub percentile: Option<f64>,
    pub reference: Option<ReferenceSummary>,
    pub histogram: Option<Histogram>,
    pub model: &'a ModelInfo,
}

impl<'a> JsonReport<'a> {
    pub fn from_report(report: &'a Report<'a>) -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            tool_version: env!("CARGO_PKG_VERSION"),
            inputs: report.features,
            score: report.result.score,
            band: report.result.band,
            message: report.result.band.message(),
            percentile: report.result.percentile,
            reference: report.reference.summary(),
            histogram: report.reference.histogram(report.histogram_bins),
            model: &report.model,
        }
    }
}

pub fn render<W: Write>(report: &Report<'_>, out: &mut W) -> Result<()> {
    let document = JsonReport::from_report(report);
    serde_json::to_writer_pretty(&mut *out, &document)?;
    writeln!(out)?;
    Ok(())
}
