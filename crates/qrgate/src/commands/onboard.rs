//! Onboarding flow: pick a code, verify the business, assign.
//!
//! Mirrors the agent app: the QR code is chosen and gated first, then the
//! GSTIN is checked, details are confirmed, the owner OTP is entered, and
//! only then is the code bound to the business.

use std::io::IsTerminal;

use dialoguer::Select;
use tracing::debug;

use qrgate_core::{BusinessDetails, Category, QrCandidate, QrService, normalize};

use crate::cli::{GlobalOpts, OnboardArgs};
use crate::error::CliError;

use super::{assign, util};

/// Take `--code`, or fall back to the first code from the unassigned pool.
async fn choose_code(service: &QrService, code: Option<String>) -> Result<QrCandidate, CliError> {
    if let Some(raw) = code {
        return Ok(normalize(&raw));
    }
    let pool = service.unassigned_codes(Some(1)).await?;
    let first = pool.first().ok_or_else(|| CliError::Validation {
        field: "code".into(),
        reason: "no unassigned QR codes available; pass --code".into(),
    })?;
    debug!(code = %first.code, "picked first unassigned code");
    Ok(normalize(&first.code))
}

fn choose_category(categories: &[Category], flag: Option<i64>, default: Option<i64>) -> Result<i64, CliError> {
    if let Some(id) = flag {
        return Ok(id);
    }
    if !std::io::stdin().is_terminal() || categories.is_empty() {
        return default.ok_or_else(|| CliError::Validation {
            field: "category".into(),
            reason: "--category is required when not running interactively".into(),
        });
    }

    let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
    let preselect = default
        .and_then(|id| categories.iter().position(|c| c.id == id))
        .unwrap_or(0);
    let idx = Select::new()
        .with_prompt("Business category")
        .items(&names)
        .default(preselect)
        .interact()
        .map_err(util::prompt_err)?;
    categories
        .get(idx)
        .map(|c| c.id)
        .ok_or_else(|| CliError::Internal("category selection out of range".into()))
}

pub async fn handle(service: &QrService, args: OnboardArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let resolver = service.resolver();
    let verifier = service.verifier();

    // 1. Code, gated before any business data is collected
    let candidate = choose_code(service, args.code).await?;
    resolver.lookup(&candidate).await?;
    let code = resolver.assignable_code()?;
    if !global.quiet {
        eprintln!("QR code {code} is free.");
    }

    // 2. GSTIN
    let profile = verifier.verify_gstin(&args.gstin).await?;
    if !global.quiet {
        let name = profile
            .business_name
            .as_deref()
            .or(profile.trade_name.as_deref())
            .unwrap_or("(unnamed)");
        eprintln!("GSTIN verified: {name}");
    }

    // 3. Details
    let display_name = util::value_or_prompt(
        args.display_name,
        "display-name",
        "Display name",
        profile.suggested_display_name(),
    )?;
    let categories = if args.category.is_some() {
        Vec::new()
    } else {
        service.categories().await?
    };
    let category = choose_category(&categories, args.category, profile.category)?;
    let phone_number = util::value_or_prompt(
        args.phone,
        "phone",
        "Owner phone number",
        profile.phone_number.as_deref(),
    )?;
    let business_email = util::value_or_prompt(
        args.email,
        "email",
        "Business email",
        Some(profile.email.as_deref().unwrap_or_default()),
    )?;

    let details = BusinessDetails {
        display_name,
        category,
        phone_number,
        business_email,
    };
    let pending = verifier.submit_details(&profile, &details).await?;
    if !global.quiet {
        eprintln!("OTP sent to business owner phone.");
    }

    // 4. Owner OTP
    let otp = util::value_or_prompt(args.otp, "otp", "Owner OTP", None)?;
    let business = verifier.verify_owner_otp(&pending, &otp).await?;

    // 5. Assign
    let assignment = resolver.assign(&business).await?;
    resolver.clear();
    assign::print_assignment(&assignment, global);
    if !global.quiet {
        eprintln!("Business verified and QR code assigned successfully.");
    }
    Ok(())
}
