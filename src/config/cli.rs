use crate::report::ReportFormat;
use crate::utils::error::Result;
use crate::utils::validation::{validate_one_of, Validate};
use clap::Parser;
use crate::config::toml_config::AppConfig;

#[derive(Debug, Clone, Parser)]
#[command(name = "wellness")]
#[command(about = "Predict a mental wellness index from lifestyle survey answers")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Model artifact (JSON); overrides [model].path
    #[arg(long)]
    pub model: Option<String>,

    /// Reference scores (CSV); overrides [reference].path
    #[arg(long)]
    pub data: Option<String>,

    /// Score column in the reference data
    #[arg(long)]
    pub score_column: Option<String>,

    /// Survey answer as name=value, repeatable
    #[arg(long = "set", value_name = "NAME=VALUE")]
    pub overrides: Vec<String>,

    /// Open the terminal form instead of predicting once
    #[arg(short, long)]
    pub interactive: bool,

    /// Output format: text or json
    #[arg(long)]
    pub format: Option<String>,

    /// Number of histogram bins
    #[arg(long)]
    pub bins: Option<usize>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// Loads the TOML file if given, then layers command-line flags on top.
    pub fn resolve(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("Loading configuration from: {}", path);
                AppConfig::from_file(path)?
            }
            None => AppConfig::default(),
        };

        if let Some(model) = &self.model {
            config.model.path = model.clone();
        }
        if let Some(data) = &self.data {
            config.reference.path = data.clone();
        }
        if let Some(column) = &self.score_column {
            config.reference.score_column = column.clone();
        }
        if let Some(format) = &self.format {
            validate_one_of("format", format, &ReportFormat::NAMES)?;
            if let Some(parsed) = ReportFormat::parse(format) {
                config.report.format = parsed;
            }
        }
        if let Some(bins) = self.bins {
            config.report.histogram_bins = bins;
        }

        config.validate()?;
        Ok(config)
    }
}
