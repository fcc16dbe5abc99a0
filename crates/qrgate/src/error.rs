//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use qrgate_core::{CoreError, DecodeError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const CAMERA: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the QR backend at {url}")]
    #[diagnostic(
        code(qrgate::connection_failed),
        help(
            "Check your network and the endpoint URL.\n\
             URL: {url}\n\
             Try: qrgate config show"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(qrgate::auth_failed),
        help(
            "Your session token is missing or expired.\n\
             Run: qrgate login --phone <number>"
        )
    )]
    AuthFailed { message: String },

    // ── QR codes ─────────────────────────────────────────────────────
    #[error("QR code '{code}' not found")]
    #[diagnostic(
        code(qrgate::not_found),
        help("Check the sticker, or run: qrgate unassigned")
    )]
    QrNotFound { code: String },

    #[error("{message}")]
    #[diagnostic(
        code(qrgate::not_assignable),
        help("Pick another code. Free codes: qrgate unassigned")
    )]
    NotAssignable { message: String },

    #[error("No QR code found in {source_name}")]
    #[diagnostic(
        code(qrgate::no_code),
        help("Try a sharper, closer photo with the whole sticker in frame.")
    )]
    NoCodeFound { source_name: String },

    #[error(transparent)]
    #[diagnostic(code(qrgate::decode))]
    Decode(#[from] DecodeError),

    // ── Camera ───────────────────────────────────────────────────────
    #[error("Camera unavailable: {reason}")]
    #[diagnostic(
        code(qrgate::camera_unavailable),
        help("Check the frame directory exists and contains images.")
    )]
    CameraUnavailable { reason: String },

    #[error("Scan stopped before a code was decoded")]
    #[diagnostic(code(qrgate::scan_closed))]
    ScanClosed,

    // ── Remote ───────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(qrgate::rejected))]
    Rejected { message: String },

    #[error("{message}")]
    #[diagnostic(code(qrgate::api_error))]
    ApiError { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(qrgate::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(qrgate::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: qrgate config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No backend endpoint configured")]
    #[diagnostic(
        code(qrgate::no_config),
        help(
            "Create a profile with: qrgate config init\n\
             Or pass --endpoint / set QRGATE_ENDPOINT.\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(qrgate::config))]
    Config(Box<figment::Error>),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("'{action}' requires confirmation")]
    #[diagnostic(
        code(qrgate::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Request timed out")]
    #[diagnostic(
        code(qrgate::timeout),
        help("Increase timeout with --timeout or try again later.")
    )]
    Timeout,

    #[error("No QR code decoded within {seconds}s")]
    #[diagnostic(
        code(qrgate::scan_timeout),
        help("Increase --max-wait or check the frames contain a readable code.")
    )]
    ScanTimeout { seconds: u64 },

    // ── Internal ─────────────────────────────────────────────────────
    #[error("Internal error: {0}")]
    #[diagnostic(code(qrgate::internal))]
    Internal(String),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::QrNotFound { .. } | Self::NoCodeFound { .. } => exit_code::NOT_FOUND,
            Self::NotAssignable { .. } => exit_code::CONFLICT,
            Self::CameraUnavailable { .. } | Self::ScanClosed => exit_code::CAMERA,
            Self::Timeout | Self::ScanTimeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. }
            | Self::NonInteractiveRequiresYes { .. }
            | Self::ProfileNotFound { .. }
            | Self::NoConfig { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::NotAssignable { message } => CliError::NotAssignable { message },

            CoreError::Decode(e) => CliError::Decode(e),

            CoreError::CameraUnavailable { reason } => CliError::CameraUnavailable { reason },

            CoreError::ScanClosed => CliError::ScanClosed,

            CoreError::QrNotFound { code } => CliError::QrNotFound { code },

            CoreError::Rejected { message } => CliError::Rejected { message },

            CoreError::Remote { message, status: _ } => CliError::ApiError { message },

            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::Timeout => CliError::Timeout,

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::IllegalTransition { .. } | CoreError::Internal(_) => {
                CliError::Internal(err.to_string())
            }
        }
    }
}
