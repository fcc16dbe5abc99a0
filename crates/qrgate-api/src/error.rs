use thiserror::Error;

/// Top-level error type for the `qrgate-api` crate.
///
/// Covers transport failures, non-success HTTP statuses, and the GraphQL
/// `errors` envelope. `qrgate-core` maps these into domain errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    /// The backend answered with a non-2xx status.
    #[error("GraphQL request failed ({status})")]
    Http { status: u16 },

    // ── GraphQL envelope ────────────────────────────────────────────
    /// First entry of the response `errors` array.
    #[error("{message}")]
    GraphQl { message: String },

    /// The response had neither `errors` nor `data`.
    #[error("GraphQL response missing data")]
    MissingData,

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the backend rejected our credentials.
    pub fn is_unauthorized(&self) -> bool {
        match self {
            Self::Http { status } => *status == 401 || *status == 403,
            Self::Transport(e) => matches!(
                e.status(),
                Some(reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN)
            ),
            _ => false,
        }
    }

    /// Returns `true` if this is a transient error a user may want to retry.
    ///
    /// Nothing in this crate retries on its own; this only informs messaging.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Http { status } => *status >= 500,
            _ => false,
        }
    }
}
