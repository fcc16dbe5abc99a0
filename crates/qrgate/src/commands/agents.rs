//! Field agent management.

use tabled::Tabled;

use qrgate_core::{Agent, QrService};

use crate::cli::{AgentsArgs, AgentsCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct AgentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "Email")]
    email: String,
}

fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_owned()
}

impl From<&Agent> for AgentRow {
    fn from(a: &Agent) -> Self {
        Self {
            id: a.id.clone(),
            name: or_dash(a.name.as_deref()),
            phone: or_dash(a.phone_number.as_deref()),
            email: or_dash(a.email.as_deref()),
        }
    }
}

pub async fn handle(service: &QrService, args: AgentsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        AgentsCommand::List => {
            let agents = service.agents().await?;
            if agents.is_empty() && matches!(global.output, OutputFormat::Table) {
                if !global.quiet {
                    eprintln!("No agents");
                }
                return Ok(());
            }
            let out = output::render_list(&global.output, &agents, |a| AgentRow::from(a), |a| a.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AgentsCommand::Create { name, phone, email } => {
            let id = service.create_agent(&name, &phone, email.as_deref()).await?;
            if global.quiet || matches!(global.output, OutputFormat::Plain) {
                println!("{id}");
            } else {
                eprintln!("✓ Agent '{}' created ({id})", name.trim());
            }
            Ok(())
        }

        AgentsCommand::Deactivate { id } => {
            if !util::confirm("agents deactivate", &format!("Deactivate agent {id}?"), global.yes)? {
                return Ok(());
            }
            service.deactivate_agent(&id).await?;
            if !global.quiet {
                eprintln!("✓ Agent {id} deactivated");
            }
            Ok(())
        }
    }
}
