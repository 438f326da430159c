use thiserror::Error;

/// Top-level error type for the `skola-api` crate.
///
/// The gateway is expected to put human-readable detail in the response
/// body of failed calls, so [`Error::Api`] carries the raw body verbatim --
/// integration scenarios assert on substrings of it ("could not find
/// invitation" and friends), which makes the message part of the contract,
/// not just the status code.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    /// Never carries an HTTP status -- the request did not complete.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A request option could not be applied (bad header name/value).
    #[error("Invalid header {name}: {reason}")]
    InvalidHeader { name: String, reason: String },

    // ── Gateway responses ───────────────────────────────────────────
    /// Any response with a status outside [200, 400). The message is the
    /// raw response body, untouched.
    #[error("Error {status}: {message}")]
    Api { status: u16, message: String },

    /// A success response whose body did not match the expected shape.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// A request body that could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // ── Authentication ──────────────────────────────────────────────
    /// Login or context-switch failure that is not itself an HTTP
    /// response (HTTP-level auth failures stay [`Error::Api`] so callers
    /// can branch on the status code).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Polling ─────────────────────────────────────────────────────
    /// A polled job never reached a terminal status. Only produced when
    /// [`PollOptions::fail_on_timeout`](crate::PollOptions) is set; the
    /// default contract returns the last observed job instead.
    #[error("Job not terminal after {attempts} attempts")]
    PollTimeout { attempts: u32 },
}

impl Error {
    /// The HTTP status code, if this error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns `true` if this is a "bad request" error.
    pub fn is_bad_request(&self) -> bool {
        self.status() == Some(400)
    }

    /// Returns `true` if this is a conflict error.
    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }
}
