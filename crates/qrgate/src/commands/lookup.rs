//! Lookup command handler.

use qrgate_core::QrService;

use crate::cli::{GlobalOpts, LookupArgs};
use crate::error::CliError;

use super::util;

pub async fn handle(service: &QrService, args: LookupArgs, global: &GlobalOpts) -> Result<(), CliError> {
    // A single lookup per process can never be superseded.
    let result = service
        .lookup_input(&args.input)
        .await?
        .ok_or_else(|| CliError::Internal("lookup superseded".into()))?;
    util::print_lookup(&result, global);
    Ok(())
}
