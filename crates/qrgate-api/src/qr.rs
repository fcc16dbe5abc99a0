// QR code operations: lookup, assignment, unassigned listing.

use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::client::GraphqlClient;
use crate::error::Error;
use crate::queries;
use crate::types::{AssignQrCodeInput, AssignQrCodeResponse, QrCodeLookupResponse, UnassignedQrCode};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupData {
    qr_code_lookup: Option<QrCodeLookupResponse>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssignData {
    assign_qr_code_to_business: AssignQrCodeResponse,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UnassignedData {
    #[serde(default)]
    unassigned_qr_codes: Option<Vec<UnassignedQrCode>>,
}

impl GraphqlClient {
    /// Resolve a code's assignment status without mutating it.
    ///
    /// Returns `None` when the backend does not know the code.
    pub async fn qr_code_lookup(&self, code: &str) -> Result<Option<QrCodeLookupResponse>, Error> {
        debug!(code, "looking up QR code");
        let data: LookupData = self
            .execute("QrCodeLookup", queries::QR_CODE_LOOKUP, Some(&json!({ "code": code })))
            .await?;
        Ok(data.qr_code_lookup)
    }

    /// Bind a code to a verified business.
    pub async fn assign_qr_code(&self, input: &AssignQrCodeInput) -> Result<AssignQrCodeResponse, Error> {
        debug!(code = %input.code, business_id = %input.business_id, "assigning QR code");
        let data: AssignData = self
            .execute(
                "AssignQrCodeToBusiness",
                queries::ASSIGN_QR_CODE,
                Some(&json!({ "input": input })),
            )
            .await?;
        Ok(data.assign_qr_code_to_business)
    }

    /// List up to `limit` codes that are not bound to any business.
    pub async fn unassigned_qr_codes(&self, limit: u32) -> Result<Vec<UnassignedQrCode>, Error> {
        debug!(limit, "listing unassigned QR codes");
        let data: UnassignedData = self
            .execute(
                "UnassignedQrCodes",
                queries::UNASSIGNED_QR_CODES,
                Some(&json!({ "limit": limit })),
            )
            .await?;
        Ok(data.unassigned_qr_codes.unwrap_or_default())
    }
}
