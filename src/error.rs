//! Error types for the Slack client

use std::fmt;

use thiserror::Error;

use crate::resolver::ResolveError;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when calling the Slack Web API
#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON decoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error(transparent)]
    Api(#[from] SlackError),

    #[error("Unknown property {0}")]
    MissingField(String),

    #[error("Property {field} is not {expected}")]
    UnexpectedType { field: String, expected: &'static str },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),
}

impl Error {
    /// The Slack error code, when the API itself rejected the call.
    pub fn slack_code(&self) -> Option<&str> {
        match self {
            Error::Api(e) => Some(e.code()),
            _ => None,
        }
    }
}

impl From<ResolveError<Error>> for Error {
    fn from(err: ResolveError<Error>) -> Self {
        match err {
            ResolveError::InvalidLimit(limit) => {
                Error::InvalidArgument(format!("concurrency limit must be positive, got {limit}"))
            }
            ResolveError::Fetch(e) => e,
        }
    }
}

/// An error code returned by Slack in a response envelope with `ok: false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlackError {
    code: String,
}

/// Codes that come with a hand written explanation instead of the generated one.
const KNOWN_CODES: &[(&str, &str)] = &[(
    "invalid_post_type",
    "The method was called via a POST request, but the specified Content-Type was invalid. \
     Valid types are: application/json application/x-www-form-urlencoded multipart/form-data \
     text/plain.",
)];

impl SlackError {
    pub const UNKNOWN: &'static str = "unknown_error";

    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Human readable message for the code.
    ///
    /// Unknown codes are turned into a sentence: `channel_not_found` reads "Channel not found".
    pub fn message(&self) -> String {
        if let Some((_, message)) = KNOWN_CODES.iter().find(|(code, _)| *code == self.code) {
            return (*message).to_owned();
        }
        let spaced = self.code.replace('_', " ");
        let mut chars = spaced.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => spaced,
        }
    }
}

impl fmt::Display for SlackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message(), self.code)
    }
}

impl std::error::Error for SlackError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_message() {
        let error = SlackError::new("channel_not_found");
        assert_eq!(error.message(), "Channel not found");
        assert_eq!(error.to_string(), "Channel not found (channel_not_found)");
    }

    #[test]
    fn test_known_code_message() {
        let error = SlackError::new("invalid_post_type");
        assert!(error.message().starts_with("The method was called via a POST request"));
    }

    #[test]
    fn test_empty_code() {
        assert_eq!(SlackError::new("").message(), "");
    }

    #[test]
    fn test_slack_code_accessor() {
        let error = Error::from(SlackError::new("not_authed"));
        assert_eq!(error.slack_code(), Some("not_authed"));
        assert_eq!(Error::MissingField("id".to_owned()).slack_code(), None);
    }

    #[test]
    fn test_resolve_error_conversion() {
        let error = Error::from(ResolveError::<Error>::InvalidLimit(0));
        assert!(matches!(error, Error::InvalidArgument(_)));

        let not_found = Error::from(SlackError::new("user_not_found"));
        let error = Error::from(ResolveError::Fetch(not_found));
        assert_eq!(error.slack_code(), Some("user_not_found"));
    }
}
