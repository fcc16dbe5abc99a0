//! Command dispatch: bridges CLI args -> core service -> output formatting.

pub mod agents;
pub mod assign;
pub mod batch;
pub mod categories;
pub mod config_cmd;
pub mod decode;
pub mod login;
pub mod lookup;
pub mod onboard;
pub mod scan;
pub mod unassigned;
pub mod util;

use qrgate_core::QrService;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, service: &QrService, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Lookup(args) => lookup::handle(service, args, global).await,
        Command::Decode(args) => decode::handle(service, args, global).await,
        Command::Scan(args) => scan::handle(service, args, global).await,
        Command::Unassigned(args) => unassigned::handle(service, args, global).await,
        Command::Assign(args) => assign::handle(service, args, global).await,
        Command::Onboard(args) => onboard::handle(service, args, global).await,
        Command::Login(args) => login::handle(service, args, global).await,
        Command::Categories => categories::handle(service, global).await,
        Command::Agents(args) => agents::handle(service, args, global).await,
        Command::Batch(args) => batch::handle(service, args, global).await,
        // Config and Completions are handled before a service exists
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "config and completions do not use the backend".into(),
        )),
    }
}
