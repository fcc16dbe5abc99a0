// Agent/admin login via phone OTP.
//
// The token returned by `verifyLoginOtp` is what `TransportConfig::auth_token`
// carries on subsequent calls.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::client::GraphqlClient;
use crate::error::Error;
use crate::queries;
use crate::types::{SendLoginOtpResponse, VerifyLoginOtpResponse};

/// Role requested at login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdminRole {
    SuperAdmin,
    Agent,
}

impl fmt::Display for AdminRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SuperAdmin => f.write_str("SUPER_ADMIN"),
            Self::Agent => f.write_str("AGENT"),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendLoginOtpData {
    send_login_otp: Option<SendLoginOtpResponse>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerifyLoginOtpData {
    verify_login_otp: Option<VerifyLoginOtpResponse>,
}

impl GraphqlClient {
    /// Ask the backend to text a login OTP to `phone_number`.
    pub async fn send_login_otp(
        &self,
        phone_number: &str,
        role: AdminRole,
    ) -> Result<SendLoginOtpResponse, Error> {
        debug!(%role, "requesting login OTP");
        let data: SendLoginOtpData = self
            .execute(
                "SendLoginOtp",
                queries::SEND_LOGIN_OTP,
                Some(&json!({ "input": { "phoneNumber": phone_number, "role": role } })),
            )
            .await?;
        Ok(data.send_login_otp.unwrap_or(SendLoginOtpResponse {
            success: false,
            error_message: None,
        }))
    }

    /// Exchange a login OTP for a session token.
    pub async fn verify_login_otp(
        &self,
        phone_number: &str,
        otp: &str,
        role: AdminRole,
    ) -> Result<VerifyLoginOtpResponse, Error> {
        debug!(%role, "verifying login OTP");
        let data: VerifyLoginOtpData = self
            .execute(
                "VerifyLoginOtp",
                queries::VERIFY_LOGIN_OTP,
                Some(&json!({ "input": { "phoneNumber": phone_number, "otp": otp, "role": role } })),
            )
            .await?;
        Ok(data.verify_login_otp.unwrap_or(VerifyLoginOtpResponse {
            verified: false,
            token: None,
            error_message: None,
        }))
    }
}
