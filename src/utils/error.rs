use thiserror::Error;

#[derive(Error, Debug)]
pub enum WellnessError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to load model from '{path}': {reason}")]
    ModelLoadError { path: String, reason: String },

    #[error("Feature schema mismatch: model expects [{expected}], got [{found}]")]
    SchemaMismatchError { expected: String, found: String },

    #[error("Model produced an unusable score: {reason}")]
    PredictionError { reason: String },

    #[error("Failed to load reference data from '{path}': {reason}")]
    DataLoadError { path: String, reason: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid input for '{field}': {reason}")]
    InvalidInputError { field: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Artifact,
    Schema,
    Configuration,
    Input,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl WellnessError {
    pub fn model_load(path: impl Into<String>, reason: impl Into<String>) -> Self {
        WellnessError::ModelLoadError {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn data_load(path: impl Into<String>, reason: impl Into<String>) -> Self {
        WellnessError::DataLoadError {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn schema_mismatch<A, B>(expected: &[A], found: &[B]) -> Self
    where
        A: AsRef<str>,
        B: AsRef<str>,
    {
        let join = |names: Vec<&str>| names.join(", ");
        WellnessError::SchemaMismatchError {
            expected: join(expected.iter().map(|s| s.as_ref()).collect()),
            found: join(found.iter().map(|s| s.as_ref()).collect()),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            WellnessError::ModelLoadError { .. }
            | WellnessError::PredictionError { .. }
            | WellnessError::DataLoadError { .. }
            | WellnessError::CsvError(_)
            | WellnessError::SerializationError(_) => ErrorCategory::Artifact,
            WellnessError::SchemaMismatchError { .. } => ErrorCategory::Schema,
            WellnessError::ConfigError { .. }
            | WellnessError::ConfigValidationError { .. }
            | WellnessError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            WellnessError::InvalidInputError { .. } => ErrorCategory::Input,
            WellnessError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Low,
            ErrorCategory::Configuration => ErrorSeverity::Medium,
            ErrorCategory::Artifact => ErrorSeverity::High,
            ErrorCategory::Schema | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            WellnessError::ModelLoadError { .. } => {
                "Check that the model artifact exists and is a valid JSON model file"
            }
            WellnessError::PredictionError { .. } => {
                "Retrain or re-export the model; its weights overflow on valid survey answers"
            }
            WellnessError::DataLoadError { .. } | WellnessError::CsvError(_) => {
                "Check that the reference CSV exists and contains the score column"
            }
            WellnessError::SchemaMismatchError { .. } => {
                "The model was trained on a different feature set; deploy a matching model artifact"
            }
            WellnessError::SerializationError(_) => "Verify the JSON document is well formed",
            WellnessError::ConfigError { .. }
            | WellnessError::ConfigValidationError { .. }
            | WellnessError::InvalidConfigValueError { .. } => {
                "Review the configuration file and command-line flags"
            }
            WellnessError::InvalidInputError { .. } => {
                "Enter a numeric value within the allowed range"
            }
            WellnessError::IoError(_) => "Check file permissions and available disk space",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            WellnessError::ModelLoadError { path, .. } => {
                format!("Could not load the prediction model from {}", path)
            }
            WellnessError::DataLoadError { path, .. } => {
                format!("Could not load the reference scores from {}", path)
            }
            WellnessError::SchemaMismatchError { .. } => {
                "The model does not accept the survey's feature set".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, WellnessError>;
