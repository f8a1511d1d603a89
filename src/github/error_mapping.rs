//! Error mapping helpers for the Octocrab GitHub gateway.

use http::StatusCode;

use super::error::LookupError;

/// Checks if a GitHub error status indicates an authentication failure.
pub(super) const fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

/// Checks if an octocrab error represents a network/transport issue.
pub(super) const fn is_network_error(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::Http { .. }
            | octocrab::Error::Hyper { .. }
            | octocrab::Error::Service { .. }
    )
}

/// Checks whether a GitHub error is a rate limit rather than a rejected
/// credential. GitHub reports both as 403, so the message and documentation
/// link decide.
pub(super) fn is_rate_limit_error(source: &octocrab::GitHubError) -> bool {
    let limited_status = matches!(
        source.status_code,
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
    );
    let mentions_rate_limit = source.message.to_lowercase().contains("rate limit")
        || source
            .documentation_url
            .as_deref()
            .is_some_and(|url| url.contains("rate-limit"));

    limited_status && mentions_rate_limit
}

pub(super) fn map_octocrab_error(operation: &str, error: &octocrab::Error) -> LookupError {
    if let octocrab::Error::GitHub { source, .. } = error {
        return if is_rate_limit_error(source) {
            LookupError::Api {
                message: format!(
                    "{operation} was rate limited ({status}): {message}",
                    status = source.status_code,
                    message = source.message
                ),
            }
        } else if is_auth_failure(source.status_code) {
            LookupError::Authentication {
                message: format!(
                    "{operation} failed: GitHub returned {status} {message}",
                    status = source.status_code,
                    message = source.message
                ),
            }
        } else {
            LookupError::Api {
                message: format!(
                    "{operation} failed with status {status}: {message}",
                    status = source.status_code,
                    message = source.message
                ),
            }
        };
    }

    if is_network_error(error) {
        return LookupError::Network {
            message: format!("{operation} failed: {error}"),
        };
    }

    LookupError::Api {
        message: format!("{operation} failed: {error}"),
    }
}

pub(super) fn map_decode_error(operation: &str, error: &serde_json::Error) -> LookupError {
    LookupError::MalformedResponse {
        message: format!("{operation} response deserialisation failed: {error}"),
    }
}
