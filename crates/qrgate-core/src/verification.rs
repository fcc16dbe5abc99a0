// ── Business verification workflow ──
//
// GSTIN check → details submission (backend texts the owner an OTP) →
// owner OTP check. The only output that matters to the QR gate is the
// `VerifiedBusiness` produced by the last step.

use qrgate_api::GraphqlClient;
use qrgate_api::types::SubmitBusinessDetailsInput;
use tracing::{debug, info};

use crate::convert::gstin_profile;
use crate::error::CoreError;
use crate::model::{BusinessDetails, GstinProfile, PendingBusiness, VerifiedBusiness};
use crate::normalize::{normalize_indian_phone, parse_otp};

const GSTIN_LEN: usize = 15;

#[derive(Clone)]
pub struct BusinessVerifier {
    client: GraphqlClient,
}

impl BusinessVerifier {
    pub fn new(client: GraphqlClient) -> Self {
        Self { client }
    }

    /// Look up a GSTIN. Input is trimmed and upper-cased first.
    pub async fn verify_gstin(&self, gstin: &str) -> Result<GstinProfile, CoreError> {
        let gstin = gstin.trim().to_ascii_uppercase();
        if gstin.is_empty() {
            return Err(CoreError::validation("Please enter a GSTIN"));
        }
        if gstin.len() != GSTIN_LEN || !gstin.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(CoreError::validation(format!(
                "GSTIN must be {GSTIN_LEN} letters and digits"
            )));
        }

        let response = self.client.verify_gstin(&gstin).await?;
        if !response.success {
            return Err(CoreError::rejected(
                response.error_message,
                "GSTIN verification failed",
            ));
        }
        let profile = gstin_profile(response)
            .ok_or_else(|| CoreError::rejected(None, "GSTIN verification failed"))?;
        debug!(
            business_id = %profile.business_id,
            already_exists = profile.already_exists,
            "GSTIN verified"
        );
        Ok(profile)
    }

    /// Submit display details. On success the owner receives an OTP.
    pub async fn submit_details(
        &self,
        profile: &GstinProfile,
        details: &BusinessDetails,
    ) -> Result<PendingBusiness, CoreError> {
        if details.display_name.trim().is_empty() {
            return Err(CoreError::validation("Display name is required"));
        }
        let phone_number = normalize_indian_phone(&details.phone_number);
        if phone_number.is_empty() {
            return Err(CoreError::validation("Phone number is required"));
        }

        let input = SubmitBusinessDetailsInput {
            business_id: profile.business_id.clone(),
            display_name: details.display_name.trim().to_owned(),
            category: details.category,
            phone_number: phone_number.clone(),
            business_email: details.business_email.trim().to_owned(),
        };
        let response = self.client.submit_business_details(&input).await?;
        if !response.success {
            return Err(CoreError::rejected(response.message, "Failed to submit details"));
        }
        info!(business_id = %profile.business_id, "OTP sent to business owner");
        Ok(PendingBusiness {
            business_id: profile.business_id.clone(),
            phone_number,
        })
    }

    /// Confirm the owner OTP, producing the id the QR gate accepts.
    pub async fn verify_owner_otp(
        &self,
        pending: &PendingBusiness,
        otp: &str,
    ) -> Result<VerifiedBusiness, CoreError> {
        let otp = parse_otp(otp)?;
        let response = self
            .client
            .verify_otp(&pending.business_id, &pending.phone_number, &otp)
            .await?;
        if !response.success {
            return Err(CoreError::rejected(response.message, "OTP verification failed"));
        }
        info!(business_id = %pending.business_id, "business owner verified");
        Ok(VerifiedBusiness::new(pending.business_id.clone()))
    }
}
