use crate::report::ReportFormat;
use crate::utils::error::{Result, WellnessError};
use crate::utils::validation::{
    validate_delimiter, validate_non_empty_string, validate_path, validate_range, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_MODEL_PATH: &str = "mental_wellness_model.json";
pub const DEFAULT_DATA_PATH: &str = "data.csv";
pub const DEFAULT_HISTOGRAM_BINS: usize = 30;
pub const DEFAULT_HISTOGRAM_WIDTH: usize = 40;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub reference: ReferenceConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub path: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_MODEL_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceConfig {
    pub path: String,
    #[serde(default = "default_score_column")]
    pub score_column: String,
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

fn default_score_column() -> String {
    crate::core::reference::DEFAULT_SCORE_COLUMN.to_string()
}

fn default_delimiter() -> String {
    ",".to_string()
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_DATA_PATH.to_string(),
            score_column: default_score_column(),
            delimiter: default_delimiter(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub format: ReportFormat,
    #[serde(default = "default_histogram_bins")]
    pub histogram_bins: usize,
    #[serde(default = "default_histogram_width")]
    pub histogram_width: usize,
}

fn default_histogram_bins() -> usize {
    DEFAULT_HISTOGRAM_BINS
}

fn default_histogram_width() -> usize {
    DEFAULT_HISTOGRAM_WIDTH
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: ReportFormat::default(),
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            histogram_width: DEFAULT_HISTOGRAM_WIDTH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

impl AppConfig {
    /// 從檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            WellnessError::ConfigError {
                message: format!(
                    "Failed to read config file '{}': {}",
                    path.as_ref().display(),
                    e
                ),
            }
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);
        toml::from_str(&processed_content).map_err(|e| WellnessError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${WELLNESS_DATA})，未設定者保留原文
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::OnceLock;

        static PATTERN: OnceLock<Regex> = OnceLock::new();
        let re = PATTERN.get_or_init(|| {
            Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("static pattern compiles")
        });

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn delimiter_byte(&self) -> Result<u8> {
        validate_delimiter("reference.delimiter", &self.reference.delimiter)
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_path("model.path", &self.model.path)?;
        validate_path("reference.path", &self.reference.path)?;
        validate_non_empty_string("reference.score_column", &self.reference.score_column)?;
        self.delimiter_byte()?;
        validate_range("report.histogram_bins", self.report.histogram_bins, 1, 200)?;
        validate_range("report.histogram_width", self.report.histogram_width, 10, 200)?;
        Ok(())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
