use thiserror::Error;

#[derive(Error, Debug)]
pub enum PredictorError {
    #[error("Invalid input for '{field}': {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Model not loaded: {reason}")]
    ModelUnavailable { reason: String },

    #[error("Classifier error: {message}")]
    ClassifierError { message: String },

    #[error("Failed to load model from '{path}': {reason}")]
    ModelLoadError { path: String, reason: String },

    #[error("Request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

/// 錯誤分類，HTTP 層與 CLI 依此決定狀態碼與退出碼
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    ModelUnavailable,
    Config,
    Internal,
}

impl PredictorError {
    pub fn invalid_input(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput { .. } | Self::PayloadTooLarge { .. } => ErrorKind::InvalidInput,
            Self::ModelUnavailable { .. } | Self::ModelLoadError { .. } => {
                ErrorKind::ModelUnavailable
            }
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => ErrorKind::Config,
            Self::ClassifierError { .. }
            | Self::IoError(_)
            | Self::SerializationError(_)
            | Self::CsvError(_) => ErrorKind::Internal,
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::PayloadTooLarge { .. } => 413,
            _ => match self.kind() {
                ErrorKind::InvalidInput => 400,
                _ => 500,
            },
        }
    }

    /// 給終端使用者看的訊息，不洩漏內部細節
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::InvalidInput { reason, .. } => reason.clone(),
            Self::ModelUnavailable { .. } | Self::ModelLoadError { .. } => {
                "Model not loaded".to_string()
            }
            Self::PayloadTooLarge { limit } => format!("Request body exceeds {} bytes", limit),
            Self::ConfigError { message } => format!("Configuration problem: {}", message),
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration value '{}' is invalid: {}", field, reason)
            }
            Self::ClassifierError { .. }
            | Self::IoError(_)
            | Self::SerializationError(_)
            | Self::CsvError(_) => "Internal server error".to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.kind() {
            ErrorKind::InvalidInput => {
                "Provide numeric cgpa (0-10) and iq (50-200) values"
            }
            ErrorKind::ModelUnavailable => {
                "Check that the model artifact exists and is valid JSON, or switch to the rules backend"
            }
            ErrorKind::Config => "Review the configuration file and command-line overrides",
            ErrorKind::Internal => "Re-run with --verbose and inspect the logs",
        }
    }
}

pub type Result<T> = std::result::Result<T, PredictorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_follow_error_kind() {
        assert_eq!(PredictorError::invalid_input("cgpa", "bad").status_code(), 400);
        assert_eq!(
            PredictorError::ModelUnavailable {
                reason: "missing".to_string()
            }
            .status_code(),
            500
        );
        assert_eq!(PredictorError::PayloadTooLarge { limit: 10 }.status_code(), 413);
        assert_eq!(
            PredictorError::ClassifierError {
                message: "label 7".to_string()
            }
            .status_code(),
            500
        );
    }

    #[test]
    fn test_user_friendly_message_hides_internals() {
        let err = PredictorError::ModelLoadError {
            path: "/secret/model.json".to_string(),
            reason: "permission denied".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::ModelUnavailable);
        assert!(!err.user_friendly_message().contains("/secret"));

        let err = PredictorError::invalid_input("iq", "iq must be a number");
        assert_eq!(err.user_friendly_message(), "iq must be a number");
    }
}
