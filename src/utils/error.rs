use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrmError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration parse error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("CSV file is empty or could not be parsed")]
    EmptyCsv,

    #[error("Contact store error: {message}")]
    StoreError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

pub type Result<T> = std::result::Result<T, CrmError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Storage,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CrmError {
    pub fn store(message: impl Into<String>) -> Self {
        CrmError::StoreError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            CrmError::CsvError(_) | CrmError::EmptyCsv | CrmError::ValidationError { .. } => {
                ErrorCategory::Input
            }
            CrmError::ConfigError { .. }
            | CrmError::ConfigValidationError { .. }
            | CrmError::MissingConfigError { .. }
            | CrmError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            CrmError::StoreError { .. } | CrmError::SerializationError(_) => {
                ErrorCategory::Storage
            }
            CrmError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CrmError::EmptyCsv => ErrorSeverity::Low,
            CrmError::StoreError { .. } => ErrorSeverity::Medium,
            CrmError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => {
                "Check the CSV file: it needs a header row plus at least one data row"
            }
            ErrorCategory::Configuration => {
                "Review the TOML configuration file and command line flags"
            }
            ErrorCategory::Storage => {
                "Verify the contact snapshot file is readable and valid JSON, then retry"
            }
            ErrorCategory::System => "Check file paths and permissions",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CrmError::EmptyCsv => "The CSV file has no rows to import".to_string(),
            CrmError::IoError(e) => format!("Could not access a file: {}", e),
            CrmError::StoreError { message } => {
                format!("The contact store rejected the request: {}", message)
            }
            other => other.to_string(),
        }
    }
}
