use thiserror::Error;

#[derive(Error, Debug)]
pub enum BoardError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Template error: {0}")]
    TemplateError(#[from] minijinja::Error),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Relay error: {message}")]
    RelayError { message: String },

    #[error("Server error: {message}")]
    ServerError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Data,
    Network,
    Configuration,
    Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BoardError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BoardError::IoError(_) => ErrorCategory::Io,
            BoardError::SerializationError(_) | BoardError::TemplateError(_) => {
                ErrorCategory::Data
            }
            BoardError::HttpError(_)
            | BoardError::RelayError { .. }
            | BoardError::ServerError { .. } => ErrorCategory::Network,
            BoardError::ConfigError { .. }
            | BoardError::InvalidConfigValueError { .. }
            | BoardError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            BoardError::ValidationError { .. } => ErrorCategory::Input,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            BoardError::ValidationError { .. } => ErrorSeverity::Low,
            BoardError::RelayError { .. } | BoardError::HttpError(_) => ErrorSeverity::Medium,
            BoardError::SerializationError(_)
            | BoardError::TemplateError(_)
            | BoardError::ConfigError { .. }
            | BoardError::InvalidConfigValueError { .. }
            | BoardError::ConfigValidationError { .. } => ErrorSeverity::High,
            BoardError::IoError(_) | BoardError::ServerError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            BoardError::IoError(_) => {
                "Check that the working directory exists and is writable".to_string()
            }
            BoardError::SerializationError(_) => {
                "Inspect or remove the message data file; it will be recreated".to_string()
            }
            BoardError::TemplateError(_) => {
                "Check the template syntax under the templates directory".to_string()
            }
            BoardError::HttpError(_) => "Make sure the HTTP server is running".to_string(),
            BoardError::RelayError { .. } => {
                "Make sure the WebSocket server is reachable at the relay URL".to_string()
            }
            BoardError::ServerError { .. } => {
                "Check that the ports are free and the host address is valid".to_string()
            }
            BoardError::ConfigError { .. } | BoardError::ConfigValidationError { .. } => {
                "Review the configuration file syntax".to_string()
            }
            BoardError::InvalidConfigValueError { field, .. } => {
                format!("Correct the value of '{}'", field)
            }
            BoardError::ValidationError { .. } => {
                "Fill in both the username and the message".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            BoardError::ValidationError { message } => message.clone(),
            BoardError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
            BoardError::ServerError { message } => format!("Server could not run: {}", message),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BoardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_is_low_severity() {
        let err = BoardError::ValidationError {
            message: "Invalid form data".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.user_friendly_message(), "Invalid form data");
    }

    #[test]
    fn test_config_errors_are_fatal() {
        let err = BoardError::InvalidConfigValueError {
            field: "server.http_port".to_string(),
            value: "0".to_string(),
            reason: "Port must be non-zero".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert!(err.severity() >= ErrorSeverity::High);
        assert!(err.recovery_suggestion().contains("server.http_port"));
    }
}
