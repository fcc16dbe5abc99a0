//! QR resolution for RME agents, between `qrgate-api` and the CLI.
//!
//! - **[`normalize`](normalize::normalize)** reduces typed, pasted or decoded
//!   input to a [`QrCandidate`], unwrapping `/qr/code/{code}` landing URLs.
//!
//! - **[`decode`]** turns still images and camera frames into payloads
//!   through a [`DecodeStrategy`] chosen once by
//!   [`select_strategy`](decode::select_strategy): a platform detector when
//!   the host has one, rqrr otherwise.
//!
//! - **[`Scanner`]** owns at most one camera session. Its [`ScanState`]
//!   (`Closed → Requesting → Streaming → Decoded | Closed`) is published on a
//!   `watch` channel and the stream is released on every exit path.
//!
//! - **[`QrResolver`]** validates candidates against the backend and gates
//!   assignment, discarding any lookup response overtaken by a newer lookup.
//!
//! - **[`BusinessVerifier`]** runs the GSTIN → details → owner-OTP workflow
//!   that yields a [`VerifiedBusiness`].
//!
//! - **[`admin`]** covers the SUPER_ADMIN tools: field agent accounts and
//!   printable [`QrBatch`]es.

pub mod admin;
pub mod config;
pub mod decode;
pub mod error;
pub mod model;
pub mod normalize;
pub mod resolver;
pub mod scan;
pub mod service;
pub mod verification;

mod convert;

// ── Primary re-exports ──────────────────────────────────────────────
pub use admin::{Agent, BatchCode, QrBatch};
pub use config::ServiceConfig;
pub use decode::{DecodeError, DecodeStrategy};
pub use error::CoreError;
pub use model::{
    BusinessDetails, Category, GstinProfile, PendingBusiness, QrAssignment, QrCandidate,
    QrLookupResult, QrStatus, UnassignedCode, VerifiedBusiness,
};
pub use normalize::normalize;
pub use resolver::{QrResolver, Selection};
pub use scan::{
    CameraProvider, Facing, FrameDirectoryCamera, ScanState, ScanStatus, Scanner, StreamConstraints,
};
pub use service::QrService;
pub use verification::BusinessVerifier;

pub use qrgate_api::auth::AdminRole;
