//! Wire types for the QR-assignment GraphQL schema.
//!
//! Field names follow the schema exactly. Most fields are camelCase, but a
//! few (`business_id`) are snake_case on the server, so renames are explicit
//! where they differ.

use serde::{Deserialize, Serialize};

// ── QR codes ─────────────────────────────────────────────────────────

/// Result of `qrCodeLookup(code)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrCodeLookupResponse {
    pub code: String,
    /// One of: `UNASSIGNED`, `ASSIGNED`, `RETIRED`.
    pub status: String,
    /// Present only when `status` is `ASSIGNED`.
    pub assigned_business_name: Option<String>,
}

/// `AssignQrCodeInput`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignQrCodeInput {
    pub code: String,
    pub business_id: String,
}

/// Result of `assignQrCodeToBusiness(input)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignQrCodeResponse {
    pub id: String,
    pub code: String,
    pub status: String,
}

/// Entry of `unassignedQrCodes(limit)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnassignedQrCode {
    pub id: String,
    pub code: String,
}

// ── Business verification ────────────────────────────────────────────

/// Entry of `categories`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
}

/// `VerifyGstinInput`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyGstinInput {
    pub gstin: String,
}

/// Result of `verifyGstin(input)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GstinResponse {
    pub success: bool,
    #[serde(rename = "business_id")]
    pub business_id: Option<String>,
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
    pub error_message: Option<String>,
    pub already_exists: Option<bool>,
}

/// `SubmitBusinessDetailsInput`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitBusinessDetailsInput {
    #[serde(rename = "business_id")]
    pub business_id: String,
    pub display_name: String,
    pub category: i64,
    pub phone_number: String,
    pub business_email: String,
}

/// `{ success, message }` payload shared by details submission and OTP checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessMessage {
    pub success: bool,
    pub message: Option<String>,
}

// ── Agent login ──────────────────────────────────────────────────────

/// Result of `sendLoginOtp(input)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendLoginOtpResponse {
    pub success: bool,
    pub error_message: Option<String>,
}

/// Result of `verifyLoginOtp(input)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyLoginOtpResponse {
    pub verified: bool,
    pub token: Option<String>,
    pub error_message: Option<String>,
}

// ── Administration ───────────────────────────────────────────────────

/// Entry of `agents`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentResponse {
    pub id: String,
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
}

/// `CreateAgentInput`. `email` is sent as `null` when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAgentInput {
    pub phone_number: String,
    pub name: String,
    pub email: Option<String>,
}

/// `{ id }` payload returned by agent mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdPayload {
    pub id: String,
}

/// `GenerateQrBatchInput`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateQrBatchInput {
    pub count: u32,
    /// Origin tag recorded on every generated code, e.g. `ADM`.
    pub source: String,
}

/// Result of `generateQrCodeBatch(input)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrBatchResponse {
    pub batch_month: String,
    pub batch_number: u32,
    #[serde(default)]
    pub items: Vec<QrBatchItem>,
}

/// One generated code with its rendered image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrBatchItem {
    /// `data:image/png;base64,...`
    pub data_url: String,
    pub qr_code: BatchQrCode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchQrCode {
    pub id: String,
    pub code: String,
    pub batch_month: Option<String>,
    pub batch_number: Option<u32>,
    pub batch_sequence: Option<u32>,
}
