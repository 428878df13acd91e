//! Error handling for the lead relay and bandwidth tester

use thiserror::Error;

/// Custom error types for the application
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors (missing credentials, bad env values)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Outbound mail transport errors
    #[error("Mail transport error: {0}")]
    Mail(String),

    /// Network connectivity errors
    #[error("Network error: {0}")]
    Network(String),

    /// HTTP request errors
    #[error("HTTP request error: {0}")]
    HttpRequest(String),

    /// Timeout errors
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// I/O errors (socket binding, file operations)
    #[error("I/O error: {0}")]
    Io(String),

    /// Parsing errors (URLs, JSON, addresses)
    #[error("Parsing error: {0}")]
    Parse(String),

    /// Speed test execution errors
    #[error("Test execution error: {0}")]
    TestExecution(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    /// Create a new mail transport error
    pub fn mail<S: Into<String>>(message: S) -> Self {
        Self::Mail(message.into())
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network(message.into())
    }

    /// Create a new HTTP request error
    pub fn http_request<S: Into<String>>(message: S) -> Self {
        Self::HttpRequest(message.into())
    }

    /// Create a new timeout error
    pub fn timeout<S: Into<String>>(message: S) -> Self {
        Self::Timeout(message.into())
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io(message.into())
    }

    /// Create a new parsing error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse(message.into())
    }

    /// Create a new test execution error
    pub fn test_execution<S: Into<String>>(message: S) -> Self {
        Self::TestExecution(message.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Get error category for logging and reporting
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG",
            Self::Validation(_) => "VALIDATION",
            Self::Mail(_) => "MAIL",
            Self::Network(_) => "NETWORK",
            Self::HttpRequest(_) => "HTTP",
            Self::Timeout(_) => "TIMEOUT",
            Self::Io(_) => "IO",
            Self::Parse(_) => "PARSE",
            Self::TestExecution(_) => "TEST",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Whether the error was caused by the caller rather than the infrastructure
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Parse(_))
    }

    /// Get user-friendly error message with suggestions
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Config(msg) => {
                format!("Configuration problem: {}\n\nSuggestion: Check your .env file or command line arguments.", msg)
            }
            Self::Validation(msg) => {
                format!("Invalid input: {}\n\nSuggestion: Check the submitted fields and try again.", msg)
            }
            Self::Mail(msg) => {
                format!("Could not deliver mail: {}\n\nSuggestion: Verify SMTP_USERNAME, SMTP_PASSWORD and the SMTP relay host.", msg)
            }
            Self::Network(msg) => {
                format!("Network connectivity issue: {}\n\nSuggestion: Check that the speed test server is reachable.", msg)
            }
            Self::HttpRequest(msg) => {
                format!("HTTP request failed: {}\n\nSuggestion: The server may be down or returned an error status.", msg)
            }
            Self::Timeout(msg) => {
                format!("Request timed out: {}\n\nSuggestion: Check your network connection and try again.", msg)
            }
            Self::Io(msg) => {
                format!("I/O operation failed: {}\n\nSuggestion: Check that the port is free and file permissions are correct.", msg)
            }
            Self::Parse(msg) => {
                format!("Failed to parse data: {}\n\nSuggestion: Check the format of your input data or configuration values.", msg)
            }
            Self::TestExecution(msg) => {
                format!("Speed test failed: {}\n\nSuggestion: Wait for the running test to finish, then start again.", msg)
            }
            Self::Internal(msg) => {
                format!("Internal error: {}\n\nThis is likely a bug. Please report this issue with the error details.", msg)
            }
        }
    }

    /// Get exit code for this error type
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Validation(_) | Self::Parse(_) => 1,
            Self::Network(_) | Self::HttpRequest(_) => 2,
            Self::Timeout(_) => 3,
            Self::Mail(_) => 4,
            Self::Io(_) => 5,
            Self::TestExecution(_) => 6,
            Self::Internal(_) => 99,
        }
    }

    /// Format error for console display with color coding
    pub fn format_for_console(&self, use_color: bool) -> String {
        let category = self.category();
        let message = self.to_string();

        if use_color {
            use colored::Colorize;
            match self {
                Self::Config(_) | Self::Validation(_) | Self::Parse(_) => {
                    format!("[{}] {}", category.red().bold(), message.red())
                }
                Self::Network(_) | Self::HttpRequest(_) => {
                    format!("[{}] {}", category.yellow().bold(), message.yellow())
                }
                Self::Timeout(_) => {
                    format!("[{}] {}", category.blue().bold(), message.blue())
                }
                Self::Mail(_) => {
                    format!("[{}] {}", category.magenta().bold(), message.magenta())
                }
                Self::Io(_) | Self::TestExecution(_) => {
                    format!("[{}] {}", category.cyan().bold(), message.cyan())
                }
                Self::Internal(_) => {
                    format!("[{}] {}", category.bright_red().bold(), message.bright_red())
                }
            }
        } else {
            format!("[{}] {}", category, message)
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<url::ParseError> for AppError {
    fn from(error: url::ParseError) -> Self {
        Self::parse(format!("URL parse error: {}", error))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::parse(format!("JSON parse error: {}", error))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::timeout(error.to_string())
        } else if error.is_connect() || error.is_request() {
            Self::network(error.to_string())
        } else {
            Self::http_request(error.to_string())
        }
    }
}

impl From<dotenv::Error> for AppError {
    fn from(error: dotenv::Error) -> Self {
        Self::config(format!("Environment file error: {}", error))
    }
}

impl From<lettre::transport::smtp::Error> for AppError {
    fn from(error: lettre::transport::smtp::Error) -> Self {
        Self::mail(error.to_string())
    }
}

impl From<lettre::error::Error> for AppError {
    fn from(error: lettre::error::Error) -> Self {
        Self::mail(format!("Failed to build message: {}", error))
    }
}

impl From<lettre::address::AddressError> for AppError {
    fn from(error: lettre::address::AddressError) -> Self {
        Self::parse(format!("Invalid mail address: {}", error))
    }
}

impl From<std::num::ParseIntError> for AppError {
    fn from(error: std::num::ParseIntError) -> Self {
        Self::parse(format!("Integer parse error: {}", error))
    }
}

impl From<std::str::ParseBoolError> for AppError {
    fn from(error: std::str::ParseBoolError) -> Self {
        Self::parse(format!("Boolean parse error: {}", error))
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(AppError::config("x").category(), "CONFIG");
        assert_eq!(AppError::validation("x").category(), "VALIDATION");
        assert_eq!(AppError::mail("x").category(), "MAIL");
        assert_eq!(AppError::network("x").category(), "NETWORK");
        assert_eq!(AppError::test_execution("x").category(), "TEST");
        assert_eq!(AppError::internal("x").category(), "INTERNAL");
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(AppError::config("x").exit_code(), 1);
        assert_eq!(AppError::network("x").exit_code(), 2);
        assert_eq!(AppError::timeout("x").exit_code(), 3);
        assert_eq!(AppError::mail("x").exit_code(), 4);
        assert_eq!(AppError::io("x").exit_code(), 5);
        assert_eq!(AppError::test_execution("x").exit_code(), 6);
        assert_eq!(AppError::internal("x").exit_code(), 99);
    }

    #[test]
    fn test_user_correctable() {
        assert!(AppError::validation("bad email").is_user_correctable());
        assert!(AppError::parse("bad json").is_user_correctable());
        assert!(!AppError::mail("smtp down").is_user_correctable());
        assert!(!AppError::config("missing").is_user_correctable());
    }

    #[test]
    fn test_display_includes_message() {
        let error = AppError::mail("connection refused");
        assert_eq!(error.to_string(), "Mail transport error: connection refused");
    }

    #[test]
    fn test_format_for_console_plain() {
        let error = AppError::config("SMTP_USERNAME missing");
        let formatted = error.format_for_console(false);
        assert_eq!(formatted, "[CONFIG] Configuration error: SMTP_USERNAME missing");
    }

    #[test]
    fn test_user_friendly_message_has_suggestion() {
        let message = AppError::mail("auth failed").user_friendly_message();
        assert!(message.contains("auth failed"));
        assert!(message.contains("Suggestion"));
    }

    #[test]
    fn test_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::AddrInUse, "address in use");
        let error: AppError = io_error.into();
        assert!(matches!(error, AppError::Io(_)));
    }

    #[test]
    fn test_from_json_error() {
        let json_error = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let error: AppError = json_error.into();
        assert!(matches!(error, AppError::Parse(_)));
    }
}
