//! Assign command handler.

use qrgate_core::{QrAssignment, QrService, VerifiedBusiness, normalize};

use crate::cli::{AssignArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(service: &QrService, args: AssignArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let candidate = normalize(&args.input);
    let resolver = service.resolver();
    resolver.lookup(&candidate).await?;

    // Refuse before prompting if the gate is closed.
    let code = resolver.assignable_code()?;
    let business = VerifiedBusiness::previously_verified(args.business_id.trim());

    if !util::confirm(
        "assign",
        &format!("Assign QR code {code} to business {}?", business.business_id()),
        global.yes,
    )? {
        return Ok(());
    }

    let assignment = resolver.assign(&business).await?;
    resolver.clear();
    print_assignment(&assignment, global);
    Ok(())
}

pub(super) fn print_assignment(assignment: &QrAssignment, global: &GlobalOpts) {
    let out = output::render_single(
        &global.output,
        assignment,
        |a| format!("✓ QR code {} assigned ({})", a.code, a.status),
        |a| a.id.clone(),
    );
    output::print_output(&out, global.quiet);
}
