// ── Domain model ──
//
// Canonical types consumed by the CLI. Wire types from `qrgate-api` are
// converted into these in `convert.rs`.

use std::fmt;

use serde::Serialize;
use strum::{Display, EnumString};

// ── QrCandidate ──────────────────────────────────────────────────────

/// A normalized string believed to be a QR payload, prior to validation.
///
/// Only [`normalize`](crate::normalize::normalize) builds one, so a candidate
/// is always trimmed and free of `/qr/code/` URL wrapping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct QrCandidate(String);

impl QrCandidate {
    pub(crate) fn new(code: String) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for QrCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Lookup ───────────────────────────────────────────────────────────

/// Assignment status reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum QrStatus {
    Unassigned,
    Assigned,
    Retired,
    /// Any status this client does not know about. Never assignable.
    Unknown,
}

/// Generic gate message when no business name is available.
pub const ALREADY_ASSIGNED_OR_RETIRED: &str = "QR code is already assigned or retired.";

/// Outcome of validating a candidate against the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QrLookupResult {
    pub code: String,
    pub status: QrStatus,
    /// Only kept when `status` is `Assigned`.
    pub assigned_business_name: Option<String>,
}

impl QrLookupResult {
    pub fn is_assignable(&self) -> bool {
        self.status == QrStatus::Unassigned
    }

    /// Message explaining why the code cannot be assigned, or `None` if it can.
    pub fn gate_message(&self) -> Option<String> {
        if self.is_assignable() {
            return None;
        }
        Some(match self.assigned_business_name.as_deref() {
            Some(name) => format!("QR code already assigned to {name}."),
            None => ALREADY_ASSIGNED_OR_RETIRED.to_owned(),
        })
    }
}

/// Result of a successful assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QrAssignment {
    pub id: String,
    pub code: String,
    pub status: QrStatus,
}

/// A code available for assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnassignedCode {
    pub id: String,
    pub code: String,
}

// ── Businesses ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Business record returned by a successful GSTIN check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GstinProfile {
    pub business_id: String,
    pub gstin: Option<String>,
    pub business_name: Option<String>,
    pub trade_name: Option<String>,
    pub display_name: Option<String>,
    pub category: Option<i64>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub already_exists: bool,
}

impl GstinProfile {
    /// Display name suggestion: explicit display name, else legal name.
    pub fn suggested_display_name(&self) -> Option<&str> {
        self.display_name
            .as_deref()
            .or(self.business_name.as_deref())
            .filter(|s| !s.is_empty())
    }
}

/// Details the agent confirms before the owner OTP is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessDetails {
    pub display_name: String,
    pub category: i64,
    pub phone_number: String,
    pub business_email: String,
}

/// Business awaiting owner OTP confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingBusiness {
    pub business_id: String,
    pub phone_number: String,
}

/// A business whose owner completed GSTIN + OTP verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifiedBusiness {
    business_id: String,
}

impl VerifiedBusiness {
    pub(crate) fn new(business_id: String) -> Self {
        Self { business_id }
    }

    /// Wrap a business id that was verified in an earlier session.
    pub fn previously_verified(business_id: impl Into<String>) -> Self {
        Self {
            business_id: business_id.into(),
        }
    }

    pub fn business_id(&self) -> &str {
        &self.business_id
    }
}
