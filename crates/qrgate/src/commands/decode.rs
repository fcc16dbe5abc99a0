//! Still-image decode handler.

use std::io::Read;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use qrgate_core::{QrCandidate, QrService};

use crate::cli::{DecodeArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct Decoded<'a> {
    code: &'a QrCandidate,
}

pub async fn handle(service: &QrService, args: DecodeArgs, global: &GlobalOpts) -> Result<(), CliError> {
    debug!(backend = service.decoder().name(), image = %args.image.display(), "decoding");
    let (decoded, source_name) = if args.image == Path::new("-") {
        let mut bytes = Vec::new();
        std::io::stdin().lock().read_to_end(&mut bytes)?;
        (service.decode_bytes(&bytes)?, "stdin".to_owned())
    } else {
        (service.decode_file(&args.image)?, args.image.display().to_string())
    };
    let candidate = decoded.ok_or(CliError::NoCodeFound { source_name })?;

    resolve_or_print(service, &candidate, args.lookup, global).await
}

/// Print a decoded candidate, or look it up when asked to.
pub(super) async fn resolve_or_print(
    service: &QrService,
    candidate: &QrCandidate,
    lookup: bool,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if lookup {
        let result = service
            .resolver()
            .lookup(candidate)
            .await?
            .ok_or_else(|| CliError::Internal("lookup superseded".into()))?;
        util::print_lookup(&result, global);
        return Ok(());
    }

    let out = output::render_single(
        &global.output,
        &Decoded { code: candidate },
        |d| d.code.to_string(),
        |d| d.code.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
