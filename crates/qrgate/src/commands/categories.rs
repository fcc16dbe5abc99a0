//! Business category listing.

use tabled::Tabled;

use qrgate_core::{Category, QrService};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
}

pub async fn handle(service: &QrService, global: &GlobalOpts) -> Result<(), CliError> {
    let categories = service.categories().await?;
    let out = output::render_list(
        &global.output,
        &categories,
        |c: &Category| CategoryRow {
            id: c.id,
            name: c.name.clone(),
        },
        |c| format!("{}\t{}", c.id, c.name),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
