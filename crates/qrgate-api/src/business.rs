// Business verification operations: categories, GSTIN check, details
// submission, and owner OTP verification.
//
// These return the raw `success` payloads; turning `success: false` into an
// error is left to the caller so the server message is not lost.

use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::client::GraphqlClient;
use crate::error::Error;
use crate::queries;
use crate::types::{
    CategoryResponse, GstinResponse, SubmitBusinessDetailsInput, SuccessMessage, VerifyGstinInput,
};

#[derive(Deserialize)]
struct CategoriesData {
    #[serde(default)]
    categories: Option<Vec<CategoryResponse>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerifyGstinData {
    verify_gstin: GstinResponse,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitDetailsData {
    submit_business_details: Option<SuccessMessage>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerifyOtpData {
    verify_otp: Option<SuccessMessage>,
}

impl GraphqlClient {
    /// List business categories.
    pub async fn categories(&self) -> Result<Vec<CategoryResponse>, Error> {
        debug!("listing categories");
        let data: CategoriesData = self
            .execute::<_, serde_json::Value>("Categories", queries::CATEGORIES, None)
            .await?;
        Ok(data.categories.unwrap_or_default())
    }

    /// Look up a GSTIN and create or fetch the pending business record.
    pub async fn verify_gstin(&self, gstin: &str) -> Result<GstinResponse, Error> {
        debug!(gstin, "verifying GSTIN");
        let input = VerifyGstinInput {
            gstin: gstin.to_owned(),
        };
        let data: VerifyGstinData = self
            .execute("VerifyGstin", queries::VERIFY_GSTIN, Some(&json!({ "input": input })))
            .await?;
        Ok(data.verify_gstin)
    }

    /// Submit display details; on success the backend sends an OTP to the owner.
    ///
    /// A `null` payload is reported as `success: false` with no message.
    pub async fn submit_business_details(
        &self,
        input: &SubmitBusinessDetailsInput,
    ) -> Result<SuccessMessage, Error> {
        debug!(business_id = %input.business_id, "submitting business details");
        let data: SubmitDetailsData = self
            .execute(
                "SubmitBusinessDetails",
                queries::SUBMIT_BUSINESS_DETAILS,
                Some(&json!({ "input": input })),
            )
            .await?;
        Ok(data.submit_business_details.unwrap_or(SuccessMessage {
            success: false,
            message: None,
        }))
    }

    /// Check the OTP the business owner received.
    pub async fn verify_otp(
        &self,
        business_id: &str,
        phone_number: &str,
        otp: &str,
    ) -> Result<SuccessMessage, Error> {
        debug!(business_id, "verifying owner OTP");
        let data: VerifyOtpData = self
            .execute(
                "VerifyOtp",
                queries::VERIFY_OTP,
                Some(&json!({
                    "business_id": business_id,
                    "phoneNumber": phone_number,
                    "otp": otp,
                })),
            )
            .await?;
        Ok(data.verify_otp.unwrap_or(SuccessMessage {
            success: false,
            message: None,
        }))
    }
}
