// ── API-to-domain type conversions ──
//
// Bridges raw `qrgate_api` wire types into canonical `qrgate_core::model`
// types. Unknown status strings map to `QrStatus::Unknown` rather than
// failing, so a new server-side status never breaks lookups.

use qrgate_api::types::{
    AssignQrCodeResponse, CategoryResponse, GstinResponse, QrCodeLookupResponse, UnassignedQrCode,
};

use crate::model::{Category, GstinProfile, QrAssignment, QrLookupResult, QrStatus, UnassignedCode};

fn parse_status(raw: &str) -> QrStatus {
    raw.trim().to_ascii_uppercase().parse().unwrap_or(QrStatus::Unknown)
}

impl From<QrCodeLookupResponse> for QrLookupResult {
    fn from(r: QrCodeLookupResponse) -> Self {
        let status = parse_status(&r.status);
        let assigned_business_name = match status {
            QrStatus::Assigned => r.assigned_business_name.filter(|n| !n.trim().is_empty()),
            _ => None,
        };
        Self {
            code: r.code,
            status,
            assigned_business_name,
        }
    }
}

impl From<AssignQrCodeResponse> for QrAssignment {
    fn from(r: AssignQrCodeResponse) -> Self {
        Self {
            status: parse_status(&r.status),
            id: r.id,
            code: r.code,
        }
    }
}

impl From<UnassignedQrCode> for UnassignedCode {
    fn from(r: UnassignedQrCode) -> Self {
        Self {
            id: r.id,
            code: r.code,
        }
    }
}

impl From<CategoryResponse> for Category {
    fn from(r: CategoryResponse) -> Self {
        Self {
            id: r.id,
            name: r.name,
        }
    }
}

/// Converts a successful GSTIN response. Returns `None` without a business id.
pub(crate) fn gstin_profile(r: GstinResponse) -> Option<GstinProfile> {
    let business_id = r.business_id.filter(|id| !id.is_empty())?;
    Some(GstinProfile {
        business_id,
        gstin: r.gstin,
        business_name: r.business_name,
        trade_name: r.trade_name,
        display_name: r.display_name,
        category: r.category,
        phone_number: r.phone_number,
        email: r.email,
        address: r.address,
        city: r.city,
        state: r.state,
        pincode: r.pincode,
        already_exists: r.already_exists.unwrap_or(false),
    })
}
