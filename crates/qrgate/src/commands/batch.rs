//! QR batch generation.

use serde::Serialize;

use qrgate_core::{QrBatch, QrService};

use crate::cli::{BatchArgs, BatchCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct BatchView<'a> {
    label: String,
    files: Vec<String>,
    #[serde(flatten)]
    batch: &'a QrBatch,
}

pub async fn handle(service: &QrService, args: BatchArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        BatchCommand::Generate { count, out } => {
            let batch = service.generate_batch(count).await?;
            let files = batch.write_images(&out)?;

            let view = BatchView {
                label: batch.label(),
                files: files.iter().map(|p| p.display().to_string()).collect(),
                batch: &batch,
            };
            let rendered = output::render_single(
                &global.output,
                &view,
                |v| {
                    format!(
                        "✓ {} generated: {} codes written to {}",
                        v.label,
                        v.files.len(),
                        out.display()
                    )
                },
                |v| v.files.join("\n"),
            );
            output::print_output(&rendered, global.quiet);
            Ok(())
        }
    }
}
