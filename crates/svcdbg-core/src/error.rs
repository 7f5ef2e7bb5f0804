//! Application error types with rich context

use thiserror::Error;

use crate::codec::FieldParseError;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types organized by layer/domain
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // Terminal/TUI Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Terminal error: {message}")]
    Terminal { message: String },

    // ─────────────────────────────────────────────────────────────
    // Gateway Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Authentication required for {url}")]
    AuthRequired { url: String },

    #[error("Request to {url} failed: {status} {status_text}")]
    HttpStatus {
        url: String,
        status: u16,
        status_text: String,
        body: String,
    },

    #[error("Request to {url} failed: {message}")]
    Transport {
        url: String,
        message: String,
        timed_out: bool,
    },

    #[error("Unexpected gateway response from {url}: {message}")]
    Protocol { url: String, message: String },

    #[error("Invalid gateway URL: {message}")]
    InvalidUrl { message: String },

    // ─────────────────────────────────────────────────────────────
    // Editing Errors
    // ─────────────────────────────────────────────────────────────
    #[error(transparent)]
    FieldParse(#[from] FieldParseError),

    #[error(transparent)]
    SyncParse(#[from] SyncParseError),

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Error raised when committing the raw text view back into a value tree.
///
/// `path` is empty when the text is not valid JSON at all; otherwise it names the
/// value path that does not fit the schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}{message}", path_prefix(.path))]
pub struct SyncParseError {
    pub path: String,
    pub message: String,
}

fn path_prefix(path: &str) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!("{path}: ")
    }
}

impl SyncParseError {
    pub fn syntax(message: impl Into<String>) -> Self {
        Self {
            path: String::new(),
            message: message.into(),
        }
    }

    pub fn at(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A failed gateway call, in the shape shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkFailure {
    pub url: String,
    /// `None` for transport failures that never produced a response.
    pub status: Option<u16>,
    pub status_text: String,
    pub body: String,
}

impl NetworkFailure {
    /// True when the gateway answered 401.
    pub fn is_auth_required(&self) -> bool {
        self.status == Some(401)
    }

    /// One-line summary, e.g. `500 Internal Server Error`.
    pub fn summary(&self) -> String {
        match self.status {
            Some(status) => format!("{status} {}", self.status_text),
            None => self.status_text.clone(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn terminal(message: impl Into<String>) -> Self {
        Self::Terminal {
            message: message.into(),
        }
    }

    pub fn auth_required(url: impl Into<String>) -> Self {
        Self::AuthRequired { url: url.into() }
    }

    pub fn http_status(
        url: impl Into<String>,
        status: u16,
        status_text: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
            status_text: status_text.into(),
            body: body.into(),
        }
    }

    pub fn transport(url: impl Into<String>, message: impl Into<String>, timed_out: bool) -> Self {
        Self::Transport {
            url: url.into(),
            message: message.into(),
            timed_out,
        }
    }

    pub fn protocol(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Protocol {
            url: url.into(),
            message: message.into(),
        }
    }

    pub fn invalid_url(message: impl Into<String>) -> Self {
        Self::InvalidUrl {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// True for the 401 case, which prompts for credentials instead of notifying.
    pub fn is_auth_required(&self) -> bool {
        matches!(self, Error::AuthRequired { .. })
    }

    /// Convert a gateway failure into the payload pushed to the notification queue.
    ///
    /// Errors that never reached the gateway are reported without URL or status.
    pub fn network_failure(&self) -> NetworkFailure {
        match self {
            Error::AuthRequired { url } => NetworkFailure {
                url: url.clone(),
                status: Some(401),
                status_text: "Unauthorized".to_string(),
                body: String::new(),
            },
            Error::HttpStatus {
                url,
                status,
                status_text,
                body,
            } => NetworkFailure {
                url: url.clone(),
                status: Some(*status),
                status_text: status_text.clone(),
                body: body.clone(),
            },
            Error::Transport {
                url,
                message,
                timed_out,
            } => NetworkFailure {
                url: url.clone(),
                status: None,
                status_text: if *timed_out {
                    "Timeout".to_string()
                } else {
                    "Network Error".to_string()
                },
                body: message.clone(),
            },
            Error::Protocol { url, message } => NetworkFailure {
                url: url.clone(),
                status: None,
                status_text: "Bad Response".to_string(),
                body: message.clone(),
            },
            other => NetworkFailure {
                url: String::new(),
                status: None,
                status_text: "Error".to_string(),
                body: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = Error::http_status("http://gw/api/service/list", 500, "Internal Server Error", "");
        assert_eq!(
            err.to_string(),
            "Request to http://gw/api/service/list failed: 500 Internal Server Error"
        );

        let err = Error::auth_required("http://gw/api/service/rpc");
        assert!(err.to_string().contains("Authentication required"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_network_failure_from_http_status() {
        let err = Error::http_status("http://gw/api/service/invoke", 502, "Bad Gateway", "upstream");
        let failure = err.network_failure();
        assert_eq!(failure.url, "http://gw/api/service/invoke");
        assert_eq!(failure.status, Some(502));
        assert_eq!(failure.status_text, "Bad Gateway");
        assert_eq!(failure.body, "upstream");
    }

    #[test]
    fn test_network_failure_from_timeout_has_no_status() {
        let failure = Error::transport("http://gw/api/x", "operation timed out", true).network_failure();
        assert_eq!(failure.status, None);
        assert_eq!(failure.status_text, "Timeout");
    }

    #[test]
    fn test_sync_parse_error_display() {
        assert_eq!(
            SyncParseError::syntax("expected value at line 1 column 1").to_string(),
            "expected value at line 1 column 1"
        );
        assert_eq!(
            SyncParseError::at("/age", "expected a number").to_string(),
            "/age: expected a number"
        );
    }

    #[test]
    fn test_is_auth_required() {
        assert!(Error::auth_required("u").is_auth_required());
        assert!(!Error::config("bad").is_auth_required());
    }
}
