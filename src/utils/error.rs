use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Failed to fetch {url} after {attempts} attempt(s): {reason}")]
    TransportFailure {
        url: String,
        attempts: u32,
        reason: String,
    },

    #[error("Failed to parse {dataset} data: {message}")]
    ParseFailure { dataset: String, message: String },

    #[error("Insufficient data for trend fit: need at least {required} distinct periods, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration value: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::TransportFailure { .. } | EtlError::ApiError(_) => ErrorCategory::Network,
            EtlError::ParseFailure { .. }
            | EtlError::InsufficientData { .. }
            | EtlError::CsvError(_)
            | EtlError::ProcessingError { .. } => ErrorCategory::Data,
            EtlError::IoError(_) => ErrorCategory::Storage,
            EtlError::ConfigError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    /// Transport and parse failures are normally absorbed by the fallback
    /// path, so when they do surface they are only worth a retry.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EtlError::TransportFailure { .. } | EtlError::ApiError(_) => ErrorSeverity::Medium,
            EtlError::ParseFailure { .. }
            | EtlError::InsufficientData { .. }
            | EtlError::CsvError(_)
            | EtlError::ProcessingError { .. } => ErrorSeverity::High,
            EtlError::ConfigError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            EtlError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => {
                "Check network connectivity or rerun with --offline to use synthesized data"
            }
            ErrorCategory::Data => "Verify the source dataset format or remove the local CSV files",
            ErrorCategory::Storage => {
                "Make sure the output directory exists and is writable by the current user"
            }
            ErrorCategory::Configuration => "Review the command line flags or the TOML config file",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::TransportFailure { url, .. } => {
                format!("Could not download data from {}", url)
            }
            EtlError::ParseFailure { dataset, .. } => {
                format!("The {} dataset could not be read", dataset)
            }
            EtlError::InsufficientData { .. } => {
                "Not enough data points to estimate a trend".to_string()
            }
            EtlError::IoError(e) => format!("File system error: {}", e),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
