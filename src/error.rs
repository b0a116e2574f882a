//! Error types for playlistbot.
//!
//! Headline parse failures are kept separate from collaborator errors: a
//! [`ParseError`] only ever skips one post, while an [`Error`] aborts the run.

use thiserror::Error;

/// Why a headline could not be split into artist and track.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No dash-like separator between two word segments.
    #[error("no separator found in title")]
    NoSeparatorFound,
}

/// Run-aborting errors raised by the forum or catalog collaborators and by
/// the setup layer (config, credentials).
#[derive(Error, Debug)]
pub enum Error {
    /// Non-success HTTP status from a remote API
    #[error("{service} returned HTTP {status}: {body}")]
    Http {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// Connection, DNS or TLS failure
    #[error("{service} transport error: {message}")]
    Transport {
        service: &'static str,
        message: String,
    },

    /// Token request rejected or token missing from the response
    #[error("{service} authentication failed: {message}")]
    Auth {
        service: &'static str,
        message: String,
    },

    /// Response body did not have the expected shape
    #[error("{service} sent a malformed response: {message}")]
    MalformedResponse {
        service: &'static str,
        message: String,
    },

    /// Request accepted at the HTTP level but refused in the response body
    /// (e.g. Reddit's `json.errors` list)
    #[error("{service} rejected the request: {message}")]
    Rejected {
        service: &'static str,
        message: String,
        throttled: bool,
    },

    /// Missing or invalid configuration / credentials
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML decoding errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Map a ureq error onto the taxonomy, keeping the response body for
    /// status errors so API messages reach the log.
    pub(crate) fn from_ureq(service: &'static str, err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(status, response) => {
                let body = response.into_string().unwrap_or_default();
                Error::Http { service, status, body }
            }
            ureq::Error::Transport(t) => Error::Transport {
                service,
                message: t.to_string(),
            },
        }
    }

    pub(crate) fn malformed(service: &'static str, err: impl std::fmt::Display) -> Self {
        Error::MalformedResponse {
            service,
            message: err.to_string(),
        }
    }

    /// True for HTTP 429 or a body-level throttling rejection, used to back
    /// off the request pacing.
    pub fn is_rate_limited(&self) -> bool {
        matches!(
            self,
            Error::Http { status: 429, .. } | Error::Rejected { throttled: true, .. }
        )
    }
}

/// Convenience Result type using the playlistbot [`Error`]
pub type Result<T> = std::result::Result<T, Error>;
