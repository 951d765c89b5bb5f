use serde::Serialize;
use std::path::Path;

use crate::domain::model::WellnessScore;
use crate::domain::ports::ReferenceScores;
use crate::utils::error::{Result, WellnessError};

pub const DEFAULT_SCORE_COLUMN: &str = "mental_wellness_index_0_100";

const MISSING_MARKERS: [&str; 5] = ["", "na", "nan", "null", "none"];

/// Historical wellness scores, sorted ascending once at load.
#[derive(Debug, Clone)]
pub struct ReferenceDistribution {
    scores: Vec<WellnessScore>,
    dropped: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReferenceSummary {
    pub count: usize,
    pub dropped: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub lower: f64,
    pub upper: f64,
    pub bin_width: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    /// Bin holding `value`, or `None` when it falls outside the histogram.
    pub fn bin_of(&self, value: f64) -> Option<usize> {
        let last = self.counts.len().checked_sub(1)?;
        if !value.is_finite() || value < self.lower || value > self.upper {
            return None;
        }
        let idx = ((value - self.lower) / self.bin_width).floor() as usize;
        Some(idx.min(last))
    }
}

pub struct CsvSource<'a> {
    pub path: &'a Path,
    pub score_column: &'a str,
    pub delimiter: u8,
}

impl<'a> CsvSource<'a> {
    pub fn new(path: &'a Path) -> Self {
        Self {
            path,
            score_column: DEFAULT_SCORE_COLUMN,
            delimiter: b',',
        }
    }

    pub fn with_score_column(mut self, column: &'a str) -> Self {
        self.score_column = column;
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

fn parse_score(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if MISSING_MARKERS.contains(&trimmed.to_ascii_lowercase().as_str()) {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

impl ReferenceDistribution {
    pub fn load(source: &CsvSource<'_>) -> Result<Self> {
        let path_str = source.path.display().to_string();
        tracing::debug!(
            "Reading reference scores from {} (column '{}')",
            path_str,
            source.score_column
        );

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(source.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_path(source.path)
            .map_err(|e| WellnessError::data_load(&path_str, e.to_string()))?;

        let headers = reader
            .headers()
            .map_err(|e| WellnessError::data_load(&path_str, e.to_string()))?
            .clone();
        let column = headers
            .iter()
            .position(|h| h.trim() == source.score_column)
            .ok_or_else(|| {
                WellnessError::data_load(
                    &path_str,
                    format!("required column '{}' not found", source.score_column),
                )
            })?;

        let mut scores = Vec::new();
        let mut dropped = 0usize;
        for record in reader.records() {
            let record = record.map_err(|e| WellnessError::data_load(&path_str, e.to_string()))?;
            match record.get(column).and_then(parse_score) {
                Some(score) => scores.push(score),
                None => dropped += 1,
            }
        }

        if dropped > 0 {
            tracing::warn!(
                "Dropped {} rows with a missing '{}' value from {}",
                dropped,
                source.score_column,
                path_str
            );
        }

        let mut distribution = Self::from_scores(scores);
        distribution.dropped = dropped;
        tracing::info!(
            "Loaded {} reference scores from {}",
            distribution.len(),
            path_str
        );
        Ok(distribution)
    }

    pub fn from_scores(mut scores: Vec<WellnessScore>) -> Self {
        scores.retain(|s| s.is_finite());
        scores.sort_by(|a, b| a.total_cmp(b));
        Self { scores, dropped: 0 }
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn summary(&self) -> Option<ReferenceSummary> {
        let (first, last) = (self.scores.first()?, self.scores.last()?);
        let sum: f64 = self.scores.iter().sum();
        Some(ReferenceSummary {
            count: self.scores.len(),
            dropped: self.dropped,
            min: *first,
            max: *last,
            mean: sum / self.scores.len() as f64,
        })
    }

    /// Equal-width bins over the observed range; the last bin is closed.
    pub fn histogram(&self, bins: usize) -> Option<Histogram> {
        if bins == 0 {
            return None;
        }
        let summary = self.summary()?;
        let (lower, upper) = if summary.min == summary.max {
            (summary.min - 0.5, summary.max + 0.5)
        } else {
            (summary.min, summary.max)
        };
        let bin_width = (upper - lower) / bins as f64;

        let mut histogram = Histogram {
            lower,
            upper,
            bin_width,
            counts: vec![0; bins],
        };
        for score in &self.scores {
            if let Some(idx) = histogram.bin_of(*score) {
                histogram.counts[idx] += 1;
            }
        }
        Some(histogram)
    }
}

impl ReferenceScores for ReferenceDistribution {
    fn scores(&self) -> &[WellnessScore] {
        &self.scores
    }

    fn percentile(&self, score: WellnessScore) -> Option<f64> {
        if self.scores.is_empty() {
            return None;
        }
        let below = self.scores.partition_point(|v| *v < score);
        Some(100.0 * below as f64 / self.scores.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_percentile_scenario() {
        let dist = ReferenceDistribution::from_scores(vec![10.0, 20.0, 30.0, 40.0, 50.0]);
        assert_eq!(dist.percentile(35.0), Some(60.0));
    }

    #[test]
    fn test_percentile_extremes() {
        let dist = ReferenceDistribution::from_scores(vec![50.0, 10.0, 30.0, 20.0, 40.0]);
        assert_eq!(dist.percentile(10.0), Some(0.0));
        assert_eq!(dist.percentile(50.0001), Some(100.0));
        assert_eq!(dist.percentile(50.0), Some(80.0));
    }

    #[test]
    fn test_percentile_counts_strictly_less_with_ties() {
        let dist = ReferenceDistribution::from_scores(vec![20.0, 20.0, 20.0, 60.0]);
        assert_eq!(dist.percentile(20.0), Some(0.0));
        assert_eq!(dist.percentile(20.5), Some(75.0));
    }

    #[test]
    fn test_percentile_monotonic() {
        let dist = ReferenceDistribution::from_scores(vec![
            55.0, 12.5, 73.0, 40.0, 40.0, 91.0, 3.0, 66.6, 28.0, 50.0,
        ]);
        let mut previous = 0.0;
        let mut s = -5.0;
        while s <= 105.0 {
            let p = dist.percentile(s).unwrap();
            assert!(p >= previous, "percentile decreased at {}", s);
            assert!((0.0..=100.0).contains(&p));
            previous = p;
            s += 0.5;
        }
    }

    #[test]
    fn test_empty_distribution_has_no_percentile() {
        let dist = ReferenceDistribution::from_scores(vec![]);
        assert_eq!(dist.percentile(50.0), None);
        assert!(dist.summary().is_none());
        assert!(dist.histogram(30).is_none());
    }

    #[test]
    fn test_load_drops_missing_scores() {
        let file = csv_file(
            "age,mental_wellness_index_0_100\n\
             30,55.5\n\
             41,\n\
             22,NA\n\
             35,nan\n\
             50,72\n\
             60,abc\n",
        );
        let dist = ReferenceDistribution::load(&CsvSource::new(file.path())).unwrap();
        assert_eq!(dist.len(), 2);
        assert_eq!(dist.dropped(), 4);
        assert_eq!(dist.scores(), &[55.5, 72.0]);
    }

    #[test]
    fn test_load_short_rows_treated_as_missing() {
        let file = csv_file("mental_wellness_index_0_100,age\n40,1\n\n50,2\n");
        let dist = ReferenceDistribution::load(&CsvSource::new(file.path())).unwrap();
        assert_eq!(dist.scores(), &[40.0, 50.0]);

        let file = csv_file("age,mental_wellness_index_0_100\n30\n31,45\n");
        let dist = ReferenceDistribution::load(&CsvSource::new(file.path())).unwrap();
        assert_eq!(dist.scores(), &[45.0]);
        assert_eq!(dist.dropped(), 1);
    }

    #[test]
    fn test_load_all_missing_yields_empty_distribution() {
        let file = csv_file("age,mental_wellness_index_0_100\n30,\n40,NA\n");
        let dist = ReferenceDistribution::load(&CsvSource::new(file.path())).unwrap();
        assert!(dist.is_empty());
        assert_eq!(dist.percentile(42.0), None);
    }

    #[test]
    fn test_missing_column_is_data_load_error() {
        let file = csv_file("age,wellness\n30,55\n");
        let err = ReferenceDistribution::load(&CsvSource::new(file.path())).unwrap_err();
        assert!(matches!(err, WellnessError::DataLoadError { .. }));
        assert!(err.to_string().contains("mental_wellness_index_0_100"));
    }

    #[test]
    fn test_missing_file_is_data_load_error() {
        let err = ReferenceDistribution::load(&CsvSource::new(Path::new(
            "/nonexistent/dir/data.csv",
        )))
        .unwrap_err();
        assert!(matches!(err, WellnessError::DataLoadError { .. }));
    }

    #[test]
    fn test_custom_column_and_delimiter() {
        let file = csv_file("id;score\n1;12\n2;88\n");
        let source = CsvSource::new(file.path())
            .with_score_column("score")
            .with_delimiter(b';');
        let dist = ReferenceDistribution::load(&source).unwrap();
        assert_eq!(dist.scores(), &[12.0, 88.0]);
    }

    #[test]
    fn test_reload_is_deterministic() {
        let file = csv_file(
            "mental_wellness_index_0_100\n61.2\n18.0\n44.4\n90.1\n44.4\n",
        );
        let first = ReferenceDistribution::load(&CsvSource::new(file.path())).unwrap();
        let second = ReferenceDistribution::load(&CsvSource::new(file.path())).unwrap();
        assert_eq!(first.scores(), second.scores());
        for probe in [0.0, 18.0, 30.0, 44.4, 50.0, 90.1, 100.0] {
            assert_eq!(first.percentile(probe), second.percentile(probe));
        }
    }

    #[test]
    fn test_summary() {
        let dist = ReferenceDistribution::from_scores(vec![10.0, 20.0, 30.0, 40.0, 50.0]);
        let summary = dist.summary().unwrap();
        assert_eq!(summary.count, 5);
        assert_eq!(summary.min, 10.0);
        assert_eq!(summary.max, 50.0);
        assert_eq!(summary.mean, 30.0);
    }

    #[test]
    fn test_histogram_counts_every_score() {
        let dist = ReferenceDistribution::from_scores(vec![0.0, 10.0, 25.0, 50.0, 75.0, 100.0]);
        let hist = dist.histogram(4).unwrap();
        assert_eq!(hist.bins(), 4);
        assert_eq!(hist.lower, 0.0);
        assert_eq!(hist.bin_width, 25.0);
        assert_eq!(hist.counts, vec![2, 1, 1, 2]);
        assert_eq!(hist.bin_of(100.0), Some(3));
        assert_eq!(hist.bin_of(-1.0), None);
        assert_eq!(hist.bin_of(101.0), None);
    }

    #[test]
    fn test_histogram_single_value() {
        let dist = ReferenceDistribution::from_scores(vec![42.0, 42.0]);
        let hist = dist.histogram(3).unwrap();
        assert_eq!(hist.counts.iter().sum::<usize>(), 2);
        assert!(hist.bin_of(42.0).is_some());
    }

    #[test]
    fn test_bin_of_on_empty_histogram() {
        let hist = Histogram {
            lower: 0.0,
            upper: 10.0,
            bin_width: 1.0,
            counts: Vec::new(),
        };
        assert_eq!(hist.bins(), 0);
        assert_eq!(hist.bin_of(5.0), None);
    }
}
