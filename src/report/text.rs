use std::io::{self, Write};

use crate::core::reference::Histogram;
use crate::domain::model::Band;
use crate::report::Report;

const MARKER: &str = "<-- your score";

fn band_tag(band: Band) -> &'static str {
    match band {
        Band::Low => "[LOW]",
        Band::Moderate => "[MODERATE]",
        Band::High => "[HIGH]",
    }
}

pub fn percentile_sentence(percentile: Option<f64>) -> String {
    match percentile {
        Some(p) => format!(
            "Your wellness score is better than {:.1}% of people in the dataset.",
            p
        ),
        None => "Insufficient data: the reference dataset has no valid scores to compare against."
            .to_string(),
    }
}

/// One line per bin, bars scaled to `width` columns, marker on the bin
/// containing `score`.
pub fn histogram_lines(histogram: &Histogram, score: f64, width: usize) -> Vec<String> {
    let peak = histogram.counts.iter().copied().max().unwrap_or(0).max(1);
    let marked = histogram.bin_of(score);

    let mut lines = Vec::with_capacity(histogram.bins() + 1);
    for (idx, count) in histogram.counts.iter().enumerate() {
        let start = histogram.lower + histogram.bin_width * idx as f64;
        let end = if idx + 1 == histogram.bins() {
            histogram.upper
        } else {
            start + histogram.bin_width
        };
        let bar_len = (count * width).div_ceil(peak);
        let mut line = format!(
            "{:>7.2} - {:>7.2} | {:<width$} {:>5}",
            start,
            end,
            "#".repeat(bar_len),
            count,
            width = width
        );
        if marked == Some(idx) {
            line.push(' ');
            line.push_str(MARKER);
        }
        lines.push(line);
    }

    if marked.is_none() {
        let side = if score < histogram.lower { "below" } else { "above" };
        lines.push(format!(
            "Your score ({:.2}) lies {} the reference range.",
            score, side
        ));
    }
    lines
}

pub fn render<W: Write>(report: &Report<'_>, out: &mut W) -> io::Result<()> {
    let result = report.result;

    writeln!(
        out,
        "Predicted Mental Wellness Index: {:.2} / 100",
        result.score
    )?;
    writeln!(out, "{} {}", band_tag(result.band), result.band.message())?;
    writeln!(out)?;

    writeln!(out, "How do you compare with others?")?;
    writeln!(out, "{}", percentile_sentence(result.percentile))?;

    if let Some(histogram) = report.reference.histogram(report.histogram_bins) {
        writeln!(out)?;
        writeln!(
            out,
            "Distribution of Mental Wellness Scores (n={})",
            report.reference.len()
        )?;
        for line in histogram_lines(&histogram, result.score, report.histogram_width) {
            writeln!(out, "{}", line)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reference::ReferenceDistribution;
    use crate::domain::model::{FeatureVector, PredictionResult};
    use crate::report::ModelInfo;

    fn model_info() -> ModelInfo {
        ModelInfo {
            kind: "linear_regression".to_string(),
            target: None,
            version: None,
            source: "model.json".to_string(),
        }
    }

    fn render_to_string(result: &PredictionResult, reference: &ReferenceDistribution) -> String {
        let features = FeatureVector::default();
        let report = Report {
            features: &features,
            result,
            reference,
            model: model_info(),
            histogram_bins: 4,
            histogram_width: 20,
        };
        let mut out = Vec::new();
        render(&report, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_text_report_shows_score_band_and_percentile() {
        let reference = ReferenceDistribution::from_scores(vec![10.0, 20.0, 30.0, 40.0, 50.0]);
        let result = PredictionResult {
            score: 35.0,
            band: Band::Low,
            percentile: Some(60.0),
        };
        let text = render_to_string(&result, &reference);
        assert!(text.contains("Predicted Mental Wellness Index: 35.00 / 100"));
        assert!(text.contains("[LOW] This score indicates low wellness."));
        assert!(text.contains("better than 60.0% of people"));
        assert!(text.contains("(n=5)"));
        assert_eq!(text.matches(MARKER).count(), 1);
    }

    #[test]
    fn test_text_report_without_reference_data() {
        let reference = ReferenceDistribution::from_scores(vec![]);
        let result = PredictionResult {
            score: 71.257,
            band: Band::High,
            percentile: None,
        };
        let text = render_to_string(&result, &reference);
        assert!(text.contains("71.26 / 100"));
        assert!(text.contains("Insufficient data"));
        assert!(!text.contains("Distribution"));
    }

    #[test]
    fn test_histogram_marker_on_score_bin() {
        let reference = ReferenceDistribution::from_scores(vec![0.0, 10.0, 25.0, 50.0, 75.0, 100.0]);
        let histogram = reference.histogram(4).unwrap();
        let lines = histogram_lines(&histogram, 60.0, 10);
        assert_eq!(lines.len(), 4);
        assert!(lines[2].ends_with(MARKER));
        assert!(!lines[0].contains(MARKER));
        // tallest bin fills the full width
        assert!(lines[0].contains(&"#".repeat(10)));
    }

    #[test]
    fn test_histogram_score_outside_range() {
        let reference = ReferenceDistribution::from_scores(vec![20.0, 30.0, 40.0]);
        let histogram = reference.histogram(2).unwrap();
        let lines = histogram_lines(&histogram, 95.0, 10);
        assert_eq!(lines.len(), 3);
        assert!(lines[2].contains("above the reference range"));
        let lines = histogram_lines(&histogram, 5.0, 10);
        assert!(lines[2].contains("below the reference range"));
    }
}
