//! # Error Handling
//!
//! Error taxonomy for the Azure Key Vault jobs, defined with `thiserror`.
//!
//! Every variant displays only its own message. Underlying causes are attached
//! through `#[source]` so that [`flatten_error_chain`] can render the whole
//! chain as `"outer - inner - innermost"` without repeating text.

use std::error::Error as StdError;

/// Boxed cause attached to an [`AkvError`].
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Custom result type for Key Vault job operations
pub type Result<T> = std::result::Result<T, AkvError>;

/// Main error type for the Key Vault jobs
#[derive(thiserror::Error, Debug)]
pub enum AkvError {
    /// OAuth token acquisition failed
    #[error("{message}")]
    Auth {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Azure returned a non-success status, malformed JSON, or the request never completed
    #[error("{message}")]
    Api {
        message: String,
        status: Option<u16>,
        #[source]
        source: Option<BoxError>,
    },

    /// Missing or invalid job configuration
    #[error("{message}")]
    Config {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// The server answered, but not with what the operation requires
    #[error("{message}")]
    Validation { message: String },

    /// Adds a job-level message in front of a lower-level failure
    #[error("{message}")]
    Context {
        message: String,
        #[source]
        source: BoxError,
    },
}

impl AkvError {
    /// Create an authentication error
    pub fn auth<S: Into<String>>(message: S) -> Self {
        Self::Auth { message: message.into(), source: None }
    }

    /// Create an authentication error with source
    pub fn auth_with_source<S: Into<String>>(message: S, source: impl Into<BoxError>) -> Self {
        Self::Auth { message: message.into(), source: Some(source.into()) }
    }

    /// Create an API error
    pub fn api<S: Into<String>>(message: S, status: Option<u16>) -> Self {
        Self::Api { message: message.into(), status, source: None }
    }

    /// Create an API error with source
    pub fn api_with_source<S: Into<String>>(
        message: S,
        status: Option<u16>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::Api { message: message.into(), status, source: Some(source.into()) }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into(), source: None }
    }

    /// Create a configuration error with source
    pub fn config_with_source<S: Into<String>>(message: S, source: impl Into<BoxError>) -> Self {
        Self::Config { message: message.into(), source: Some(source.into()) }
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation { message: message.into() }
    }

    /// Wrap an error with a job-level message
    pub fn context<S: Into<String>>(message: S, source: impl Into<BoxError>) -> Self {
        Self::Context { message: message.into(), source: source.into() }
    }

    /// HTTP status reported by Azure, if this error came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            AkvError::Api { status, .. } => *status,
            _ => None,
        }
    }

    /// Short name of the error category, used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            AkvError::Auth { .. } => "auth",
            AkvError::Api { .. } => "api",
            AkvError::Config { .. } => "config",
            AkvError::Validation { .. } => "validation",
            AkvError::Context { .. } => "context",
        }
    }
}

impl From<validator::ValidationErrors> for AkvError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .iter()
            .map(|(field, field_errors)| {
                let reasons: Vec<String> = field_errors
                    .iter()
                    .map(|e| {
                        e.message.as_ref().map(|m| m.to_string()).unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                format!("{}: {}", field, reasons.join(", "))
            })
            .collect();
        messages.sort();
        Self::config(format!("Invalid configuration: {}", messages.join("; ")))
    }
}

/// Render an error and every `source()` beneath it as one line, joined by `" - "`.
pub fn flatten_error_chain(error: &(dyn StdError + 'static)) -> String {
    let mut message = error.to_string();
    let mut current = error.source();
    while let Some(cause) = current {
        message.push_str(" - ");
        message.push_str(&cause.to_string());
        current = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_display_is_own_message_only() {
        let err = AkvError::api_with_source("outer", Some(500), AkvError::validation("inner"));
        assert_eq!(err.to_string(), "outer");
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.kind(), "api");
    }

    #[test]
    fn test_flatten_three_levels() {
        let err =
            AkvError::context("A", AkvError::context("B", AkvError::validation("C")));
        assert_eq!(flatten_error_chain(&err), "A - B - C");
    }

    #[test]
    fn test_flatten_single_error() {
        let err = AkvError::config("missing alias");
        assert_eq!(flatten_error_chain(&err), "missing alias");
    }

    #[test]
    fn test_flatten_through_foreign_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "socket closed");
        let err = AkvError::auth_with_source("token request failed", io);
        assert_eq!(flatten_error_chain(&err), "token request failed - socket closed");
    }

    proptest! {
        #[test]
        fn flatten_joins_every_level(parts in proptest::collection::vec("[a-z]{1,8}", 1..40)) {
            let mut iter = parts.iter().rev();
            let innermost = iter.next().expect("at least one part");
            let mut err = AkvError::validation(innermost.clone());
            for part in iter {
                err = AkvError::context(part.clone(), err);
            }
            prop_assert_eq!(flatten_error_chain(&err), parts.join(" - "));
        }
    }
}
