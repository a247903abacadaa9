use super::types::ReviewError;

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    /// Process exit code used by the binary.
    pub exit_code: i32,
}

impl ReviewError {
    /// Classify this error to determine its type and the exit code it maps to.
    pub fn classify(&self) -> ErrorClassification {
        match self {
            ReviewError::Config(_) | ReviewError::Yaml(_) => ErrorClassification {
                error_type: "ConfigError",
                exit_code: 2,
            },
            ReviewError::Transport(_) => ErrorClassification {
                error_type: "TransportError",
                exit_code: 3,
            },
            ReviewError::Api(_) => ErrorClassification {
                error_type: "ApiError",
                exit_code: 4,
            },
            ReviewError::InvalidInput(_) => ErrorClassification {
                error_type: "InvalidInputError",
                exit_code: 5,
            },
            ReviewError::Io(_) => ErrorClassification {
                error_type: "IoError",
                exit_code: 1,
            },
            ReviewError::Json(_) => ErrorClassification {
                error_type: "JsonError",
                exit_code: 1,
            },
            ReviewError::Template(_) => ErrorClassification {
                error_type: "TemplateError",
                exit_code: 1,
            },
        }
    }
}
