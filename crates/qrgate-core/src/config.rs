// ── Runtime service configuration ──
//
// Describes *how* to reach the QR backend and how fast to poll the camera.
// Never touches disk: the CLI builds a `ServiceConfig` and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// Default poll interval for live frame decoding.
pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_millis(300);

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default page size when listing unassigned codes.
pub const DEFAULT_UNASSIGNED_LIMIT: u32 = 100;

/// Configuration for talking to one backend.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// GraphQL endpoint (e.g., `https://api.example.com/graphql`).
    pub endpoint: Url,
    /// Agent session token, if logged in.
    pub auth_token: Option<SecretString>,
    /// Request timeout.
    pub timeout: Duration,
    /// Interval between camera frame decode attempts.
    pub scan_interval: Duration,
    /// Page size for `unassigned_codes` when the caller passes none.
    pub unassigned_limit: u32,
}

impl ServiceConfig {
    /// Config with defaults for everything but the endpoint.
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            auth_token: None,
            timeout: DEFAULT_TIMEOUT,
            scan_interval: DEFAULT_SCAN_INTERVAL,
            unassigned_limit: DEFAULT_UNASSIGNED_LIMIT,
        }
    }
}
