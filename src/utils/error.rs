use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Failed to read workbook: {0}")]
    WorkbookReadError(#[from] calamine::XlsxError),

    #[error("Failed to write workbook: {0}")]
    WorkbookWriteError(#[from] rust_xlsxwriter::XlsxError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Workbook has no sheet named '{sheet}'")]
    MissingSheetError { sheet: String },

    #[error("Sheet '{sheet}' has no column named '{column}'")]
    MissingColumnError { sheet: String, column: String },

    #[error("Sheet '{sheet}' does not define any domain")]
    EmptyCatalogError { sheet: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    InputShape,
    Network,
    Storage,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ClassifierError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ClassifierError::ConfigError { .. }
            | ClassifierError::InvalidConfigValueError { .. }
            | ClassifierError::MissingConfigError { .. } => ErrorCategory::Configuration,
            ClassifierError::MissingSheetError { .. }
            | ClassifierError::MissingColumnError { .. }
            | ClassifierError::EmptyCatalogError { .. }
            | ClassifierError::WorkbookReadError(_) => ErrorCategory::InputShape,
            ClassifierError::HttpError(_) => ErrorCategory::Network,
            ClassifierError::IoError(_) | ClassifierError::WorkbookWriteError(_) => {
                ErrorCategory::Storage
            }
            ClassifierError::CsvError(_)
            | ClassifierError::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::InputShape => ErrorSeverity::High,
            ErrorCategory::Processing => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            ClassifierError::MissingSheetError { sheet } => format!(
                "Add a sheet named '{}' to the workbook (names are case-sensitive)",
                sheet
            ),
            ClassifierError::MissingColumnError { sheet, column } => format!(
                "Make sure the first row of sheet '{}' contains a '{}' header",
                sheet, column
            ),
            ClassifierError::EmptyCatalogError { sheet } => format!(
                "Fill at least one domain name in sheet '{}'",
                sheet
            ),
            ClassifierError::MissingConfigError { field } => {
                format!("Provide '{}' on the command line, in the TOML file or in .env", field)
            }
            ClassifierError::InvalidConfigValueError { field, .. } => {
                format!("Check the value given for '{}'", field)
            }
            ClassifierError::ConfigError { .. } => {
                "Check the configuration file syntax".to_string()
            }
            ClassifierError::WorkbookReadError(_) => {
                "Make sure the input is a valid .xlsx workbook".to_string()
            }
            ClassifierError::HttpError(_) => {
                "Check network connectivity and the API base URL".to_string()
            }
            ClassifierError::IoError(_) | ClassifierError::WorkbookWriteError(_) => {
                "Check that the paths exist and are writable".to_string()
            }
            ClassifierError::CsvError(_)
            | ClassifierError::ProcessingError { .. } => {
                "Run again with --verbose for details".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::InputShape => format!("Input workbook problem: {}", self),
            ErrorCategory::Network => format!("Network problem: {}", self),
            ErrorCategory::Storage => format!("File system problem: {}", self),
            ErrorCategory::Processing => format!("Processing failed: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClassifierError>;
