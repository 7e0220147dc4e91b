use thiserror::Error;

/// Failures while reading the delimited source into a raw table.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("File not found: {path}")]
    NotFound { path: String },

    #[error("Invalid file format for '{path}'. Please provide a CSV file.")]
    InvalidExtension { path: String },

    #[error("Cannot read '{path}': {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Missing required columns: {}", missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    #[error("Invalid value {value:?} in column '{column}' at line {line}: {reason}")]
    InvalidValue {
        line: u64,
        column: &'static str,
        value: String,
        reason: String,
    },

    #[error("Row at line {line} has {found} fields, the header has {expected}")]
    TooManyFields {
        line: u64,
        expected: usize,
        found: usize,
    },
}

/// Failures while turning raw records into cleaned sales records.
#[derive(Error, Debug, PartialEq)]
pub enum ParseError {
    #[error("Unparsable date {value:?} at line {line}")]
    InvalidDate { line: u64, value: String },

    #[error("Total sales out of range at line {line}")]
    Overflow { line: u64 },
}

#[derive(Error, Debug, PartialEq)]
pub enum MetricsError {
    #[error("Cannot compute {metric} over an empty table (division by zero)")]
    EmptyTable { metric: &'static str },

    #[error("Sum overflowed while computing {metric}")]
    Overflow { metric: &'static str },
}

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error(transparent)]
    LoadError(#[from] LoadError),

    #[error(transparent)]
    ParseError(#[from] ParseError),

    #[error(transparent)]
    MetricsError(#[from] MetricsError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Data,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AnalysisError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AnalysisError::LoadError(_) => ErrorCategory::Input,
            AnalysisError::ParseError(_) | AnalysisError::MetricsError(_) => ErrorCategory::Data,
            AnalysisError::ConfigError { .. }
            | AnalysisError::InvalidConfigValueError { .. }
            | AnalysisError::MissingConfigError { .. } => ErrorCategory::Configuration,
            AnalysisError::IoError(_) | AnalysisError::SerializationError(_) => {
                ErrorCategory::System
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 空資料表：流程本身正常，只是沒有可計算的資料
            AnalysisError::MetricsError(_) => ErrorSeverity::Medium,
            AnalysisError::LoadError(LoadError::Unreadable { .. }) => ErrorSeverity::Critical,
            AnalysisError::IoError(_) | AnalysisError::SerializationError(_) => {
                ErrorSeverity::Critical
            }
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            AnalysisError::LoadError(LoadError::NotFound { .. }) => {
                "Check that the path is correct and the file exists"
            }
            AnalysisError::LoadError(LoadError::InvalidExtension { .. }) => {
                "Provide a file with a .csv extension"
            }
            AnalysisError::LoadError(LoadError::MissingColumns { .. }) => {
                "The header row must contain Date, Product, Category, Price and Quantity Sold"
            }
            AnalysisError::LoadError(LoadError::TooManyFields { .. }) => {
                "Quote cells that contain commas, or remove the extra fields"
            }
            AnalysisError::LoadError(LoadError::InvalidValue { .. }) => {
                "Price must be a non-negative number and Quantity Sold a non-negative integer"
            }
            AnalysisError::LoadError(_) => "Make sure the file is readable, well-formed CSV",
            AnalysisError::ParseError(ParseError::InvalidDate { .. }) => {
                "Fix the date value or pass its layout with --date-format"
            }
            AnalysisError::ParseError(ParseError::Overflow { .. })
            | AnalysisError::MetricsError(MetricsError::Overflow { .. }) => {
                "Check Price and Quantity Sold for implausibly large values"
            }
            AnalysisError::MetricsError(MetricsError::EmptyTable { .. }) => {
                "The file has no complete rows; check for missing values"
            }
            AnalysisError::ConfigError { .. }
            | AnalysisError::InvalidConfigValueError { .. }
            | AnalysisError::MissingConfigError { .. } => {
                "Review the configuration file and command line arguments"
            }
            AnalysisError::IoError(_) | AnalysisError::SerializationError(_) => {
                "Check file permissions and available disk space"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            AnalysisError::LoadError(LoadError::NotFound { .. }) => "File not found.".to_string(),
            AnalysisError::LoadError(LoadError::InvalidExtension { .. }) => {
                "Invalid file format. Please provide a CSV file.".to_string()
            }
            AnalysisError::MetricsError(MetricsError::EmptyTable { .. }) => {
                "No data available to compute metrics.".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
