//! Agent login via phone OTP.

use secrecy::ExposeSecret;

use qrgate_core::{AdminRole, QrService};

use crate::cli::{GlobalOpts, LoginArgs, LoginRole};
use crate::config;
use crate::error::CliError;

use super::util;

impl From<LoginRole> for AdminRole {
    fn from(role: LoginRole) -> Self {
        match role {
            LoginRole::Agent => Self::Agent,
            LoginRole::SuperAdmin => Self::SuperAdmin,
        }
    }
}

pub async fn handle(service: &QrService, args: LoginArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let role = AdminRole::from(args.role);
    let phone = service.send_login_otp(&args.phone, role).await?;
    if !global.quiet {
        eprintln!("OTP sent to {phone}.");
    }

    let otp = util::value_or_prompt(args.otp, "otp", "OTP", None)?;
    let token = service.verify_login_otp(&phone, &otp, role).await?;

    if args.print_token {
        println!("{}", token.expose_secret());
        return Ok(());
    }

    let cfg = config::load_config_or_default();
    let profile_name = config::active_profile_name(global, &cfg);
    config::store_token(&profile_name, token.expose_secret())?;
    if !global.quiet {
        eprintln!("✓ Logged in. Token stored in keyring for profile '{profile_name}'");
    }
    Ok(())
}
