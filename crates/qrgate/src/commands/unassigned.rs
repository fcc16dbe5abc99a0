//! Unassigned code listing.

use tabled::Tabled;

use qrgate_core::{QrService, UnassignedCode};

use crate::cli::{GlobalOpts, OutputFormat, UnassignedArgs};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct CodeRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Code")]
    code: String,
}

impl From<&UnassignedCode> for CodeRow {
    fn from(c: &UnassignedCode) -> Self {
        Self {
            id: c.id.clone(),
            code: c.code.clone(),
        }
    }
}

pub async fn handle(
    service: &QrService,
    args: UnassignedArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let codes = service.unassigned_codes(args.limit).await?;
    if codes.is_empty() && matches!(global.output, OutputFormat::Table) {
        if !global.quiet {
            eprintln!("No unassigned QR codes");
        }
        return Ok(());
    }
    let out = output::render_list(&global.output, &codes, |c| CodeRow::from(c), |c| c.code.clone());
    output::print_output(&out, global.quiet);
    Ok(())
}
