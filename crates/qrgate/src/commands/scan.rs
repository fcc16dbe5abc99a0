//! Scan command handler: runs one scan session over a frame directory.

use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use qrgate_core::{
    CoreError, Facing, FrameDirectoryCamera, QrService, StreamConstraints, normalize,
};

use crate::cli::{GlobalOpts, ScanArgs};
use crate::error::CliError;

use super::decode::resolve_or_print;

fn spinner(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} [{elapsed}]") {
        pb.set_style(style);
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub async fn handle(service: &QrService, args: ScanArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let camera = Arc::new(FrameDirectoryCamera::new(&args.frames));
    let mut scanner = service.scanner(camera);
    if let Some(ms) = args.interval_ms {
        scanner = scanner.with_interval(Duration::from_millis(ms));
    }
    if args.front {
        scanner = scanner.with_constraints(StreamConstraints {
            facing: Facing::Front,
            ..StreamConstraints::default()
        });
    }

    scanner.open()?;
    let pb = spinner(global.quiet);
    pb.set_message(format!("Scanning {}", args.frames.display()));

    let outcome = tokio::time::timeout(Duration::from_secs(args.max_wait), scanner.wait_for_code()).await;
    scanner.close();
    pb.finish_and_clear();

    let payload = match outcome {
        Err(_) => return Err(CliError::ScanTimeout { seconds: args.max_wait }),
        Ok(Ok(payload)) => payload,
        // The frame source opened fine and then ran dry.
        Ok(Err(CoreError::CameraUnavailable { reason })) => {
            debug!(%reason, "frame source ended");
            return Err(CliError::NoCodeFound {
                source_name: args.frames.display().to_string(),
            });
        }
        Ok(Err(e)) => return Err(e.into()),
    };

    let candidate = normalize(&payload);
    if candidate.is_empty() {
        return Err(CliError::NoCodeFound {
            source_name: args.frames.display().to_string(),
        });
    }
    resolve_or_print(service, &candidate, args.lookup, global).await
}
