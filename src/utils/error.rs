use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Input document not found: {path}")]
    DocumentNotFound { path: String },

    #[error("Render failed: {message}")]
    Render { message: String },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Session configuration error: {message}")]
    Configuration { message: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Odoo RPC error: {message}")]
    RpcError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

pub type Result<T> = std::result::Result<T, ReportError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Render,
    Output,
    Session,
    Network,
    Config,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ReportError {
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn rpc(message: impl Into<String>) -> Self {
        Self::RpcError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::DocumentNotFound { .. } => ErrorCategory::Input,
            Self::Render { .. } => ErrorCategory::Render,
            Self::Write { .. } | Self::CsvError(_) | Self::ZipError(_) => ErrorCategory::Output,
            Self::Configuration { .. } => ErrorCategory::Session,
            Self::ApiError(_) | Self::RpcError { .. } => ErrorCategory::Network,
            Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigValidationError { .. } => ErrorCategory::Config,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // Transient network failures are worth a manual retry.
            Self::ApiError(_) | Self::RpcError { .. } => ErrorSeverity::Medium,
            Self::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::DocumentNotFound { path } => {
                format!(
                    "Check that '{}' exists and the path is spelled correctly",
                    path
                )
            }
            Self::Render { .. } => {
                "Verify the input is a well-formed HTML document and the fonts are installed"
                    .to_string()
            }
            Self::Write { path, .. } => {
                format!("Check that '{}' is writable and the directory exists", path)
            }
            Self::Configuration { .. } => {
                "Configure the page exactly once, before any rendering call".to_string()
            }
            Self::ApiError(_) => "Check the network connection and the Odoo endpoint".to_string(),
            Self::RpcError { .. } => "Check the Odoo database name, uid and API key".to_string(),
            Self::MissingConfigError { field } => {
                format!("Set '{}' in the configuration file or environment", field)
            }
            Self::InvalidConfigValueError { field, .. }
            | Self::ConfigValidationError { field, .. } => {
                format!("Fix the value of '{}' in the configuration file", field)
            }
            _ => "See the log output for details".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::DocumentNotFound { path } => format!("Input document '{}' was not found", path),
            Self::Render { message } => format!("The document could not be rendered: {}", message),
            Self::Write { path, .. } => format!("The output file '{}' could not be written", path),
            Self::Configuration { message } => {
                format!("Dashboard configuration error: {}", message)
            }
            Self::ApiError(_) => "The Odoo server could not be reached".to_string(),
            Self::RpcError { message } => format!("Odoo rejected the request: {}", message),
            other => other.to_string(),
        }
    }
}

impl From<genpdf::error::Error> for ReportError {
    fn from(err: genpdf::error::Error) -> Self {
        Self::Render {
            message: err.to_string(),
        }
    }
}

impl From<lopdf::Error> for ReportError {
    fn from(err: lopdf::Error) -> Self {
        Self::Render {
            message: format!("post-render inspection failed: {}", err),
        }
    }
}
