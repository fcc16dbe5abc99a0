// ── Core error types ──
//
// User-facing errors from qrgate-core. Consumers never see HTTP statuses or
// JSON parse failures directly; `From<qrgate_api::Error>` translates
// transport-layer errors into domain variants. Remote messages are kept
// verbatim so they can be shown to the agent as-is.

use thiserror::Error;

use crate::decode::DecodeError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Local validation ─────────────────────────────────────────────
    /// Input rejected before any network call.
    #[error("{message}")]
    Validation { message: String },

    /// The selected code is not available for assignment.
    #[error("{message}")]
    NotAssignable { message: String },

    // ── Decoding / camera ────────────────────────────────────────────
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("Camera unavailable: {reason}")]
    CameraUnavailable { reason: String },

    #[error("Scan session closed before a code was decoded")]
    ScanClosed,

    #[error("Illegal scan state transition: {from} -> {to}")]
    IllegalTransition { from: String, to: String },

    // ── Remote ───────────────────────────────────────────────────────
    #[error("QR code not found: {code}")]
    QrNotFound { code: String },

    /// The backend answered but reported an application-level failure.
    #[error("{message}")]
    Rejected { message: String },

    /// Request failed or the backend returned a GraphQL error.
    #[error("{message}")]
    Remote {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    #[error("Cannot reach backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    Timeout,

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal ─────────────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub(crate) fn rejected(message: Option<String>, fallback: &str) -> Self {
        Self::Rejected {
            message: message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| fallback.to_owned()),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<qrgate_api::Error> for CoreError {
    fn from(err: qrgate_api::Error) -> Self {
        if err.is_unauthorized() {
            return CoreError::AuthenticationFailed {
                message: err.to_string(),
            };
        }

        match err {
            qrgate_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Remote {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            qrgate_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            qrgate_api::Error::ClientBuild(message) => CoreError::Config { message },
            qrgate_api::Error::Http { status } => CoreError::Remote {
                message: format!("GraphQL request failed ({status})"),
                status: Some(status),
            },
            qrgate_api::Error::GraphQl { message } => CoreError::Remote {
                message,
                status: None,
            },
            qrgate_api::Error::MissingData => CoreError::Remote {
                message: "GraphQL response missing data".into(),
                status: None,
            },
            qrgate_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graphql_message_is_verbatim() {
        let err: CoreError = qrgate_api::Error::GraphQl {
            message: "QR code already retired".into(),
        }
        .into();
        assert_eq!(err.to_string(), "QR code already retired");
    }

    #[test]
    fn forbidden_maps_to_auth() {
        let err: CoreError = qrgate_api::Error::Http { status: 403 }.into();
        assert!(matches!(err, CoreError::AuthenticationFailed { .. }));
    }

    #[test]
    fn rejected_falls_back_on_blank_message() {
        let err = CoreError::rejected(Some("  ".into()), "OTP verification failed");
        assert_eq!(err.to_string(), "OTP verification failed");
        let err = CoreError::rejected(Some("Invalid OTP".into()), "OTP verification failed");
        assert_eq!(err.to_string(), "Invalid OTP");
    }
}
