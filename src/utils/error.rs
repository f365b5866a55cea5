use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnrichError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid input for {field}: {value}")]
    InvalidInput { field: String, value: String },

    #[error("Missing input: {message}")]
    MissingInput { message: String },

    #[error("Validation failed: {reason}")]
    ValidationFailed { score: u8, reason: String },

    #[error("Extraction failed: {message}")]
    ExtractionFailed { message: String },

    #[error("Interrupted by user")]
    Interrupted,
}

impl EnrichError {
    pub fn extraction(message: impl Into<String>) -> Self {
        Self::ExtractionFailed {
            message: message.into(),
        }
    }

    /// Exit code used by the binary when this error reaches `main`.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Interrupted => 130,
            Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::TomlError(_) => 1,
            _ => 2,
        }
    }
}

pub type Result<T> = std::result::Result<T, EnrichError>;
