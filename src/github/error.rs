//! Error types exposed by the code-forge lookup layer.

use thiserror::Error;

/// Errors surfaced while resolving a reference against GitHub.
///
/// A reference that names nothing is not an error: lookups report it as
/// `Ok(None)` so callers can log it and move on.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    /// The captured reference cannot identify an entity.
    #[error("invalid reference: {message}")]
    InvalidReference {
        /// Why the reference was rejected.
        message: String,
    },

    /// The credential file did not contain a token.
    #[error("personal access token is required")]
    MissingToken,

    /// The authentication token was rejected by GitHub.
    #[error("GitHub rejected the token: {message}")]
    Authentication {
        /// GitHub error message returned with the 401/403 response.
        message: String,
    },

    /// GitHub answered, but reported a failure other than authentication.
    #[error("GitHub API error: {message}")]
    Api {
        /// Response body or GraphQL error list describing the failure.
        message: String,
    },

    /// The response did not have the shape of an entity lookup.
    #[error("malformed GitHub response: {message}")]
    MalformedResponse {
        /// Which part of the response failed to decode.
        message: String,
    },

    /// Networking failed or timed out while calling GitHub.
    #[error("network error talking to GitHub: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },

    /// The gateway could not be configured.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },
}
