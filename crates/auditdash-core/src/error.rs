//! Error types for auditdash

use thiserror::Error;

/// Result type alias using auditdash's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Auditdash error types with helpful messages and suggestions
#[derive(Error, Debug)]
pub enum Error {
    // Network errors (E100-E199)
    #[error("Network error: {0}. Check that the auditability service is running.")]
    Network(#[from] reqwest::Error),

    #[error("Failed to fetch {context}: {status} {reason}. Body: {body}")]
    Http {
        context: String,
        status: u16,
        reason: String,
        body: String,
    },

    #[error("Failed to decode {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0} not found")]
    NotFound(String),

    // Config errors (E600-E699)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // Input errors (E800-E899)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build an HTTP error from a non-success response.
    pub fn http(
        context: impl Into<String>,
        status: u16,
        reason: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self::Http {
            context: context.into(),
            status,
            reason: reason.into(),
            body: body.into(),
        }
    }

    pub fn decode(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            context: context.into(),
            source,
        }
    }

    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            Self::Network(_) => "E100",
            Self::Http { .. } => "E101",
            Self::Decode { .. } => "E102",
            Self::NotFound(_) => "E103",
            Self::ConfigError(_) => "E600",
            Self::InvalidInput(_) => "E800",
            Self::Io(_) => "E9999",
        }
    }

    /// Get suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Network(_) => Some("auditdash config get api.base_url".to_string()),
            Self::Http { status: 404, .. } | Self::NotFound(_) => {
                Some("auditdash runs".to_string())
            }
            Self::ConfigError(_) => Some("auditdash config list".to_string()),
            _ => None,
        }
    }

    /// Whether the error came from the transport layer rather than local input
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Http { .. } | Self::Decode { .. } | Self::NotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_message() {
        let err = Error::http("run data", 404, "Not Found", "{\"message\":\"missing\"}");
        assert_eq!(
            err.to_string(),
            "Failed to fetch run data: 404 Not Found. Body: {\"message\":\"missing\"}"
        );
        assert_eq!(err.code(), "E101");
        assert_eq!(err.suggestion().as_deref(), Some("auditdash runs"));
    }

    #[test]
    fn test_http_error_without_suggestion() {
        let err = Error::http("benchmark data", 500, "Internal Server Error", "");
        assert!(err.suggestion().is_none());
        assert!(err.is_transport());
    }

    #[test]
    fn test_decode_error() {
        let source = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = Error::decode("run data", source);
        assert!(err.to_string().starts_with("Failed to decode run data"));
        assert_eq!(err.code(), "E102");
    }

    #[test]
    fn test_local_errors_are_not_transport() {
        assert!(!Error::ConfigError("bad".into()).is_transport());
        assert!(!Error::InvalidInput("bad".into()).is_transport());
        assert_eq!(Error::InvalidInput("bad".into()).code(), "E800");
    }
}
