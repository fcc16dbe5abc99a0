//! Shared helpers for command handlers.

use std::io::IsTerminal;

use dialoguer::{Confirm, Input};
use serde::Serialize;

use qrgate_core::{QrLookupResult, QrStatus};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn interactive() -> bool {
    std::io::stdin().is_terminal()
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(action: &str, message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !interactive() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)
}

/// Use `value` if given, otherwise prompt (with an optional default).
///
/// Fails with a validation error naming `--{field}` when stdin is not a
/// terminal.
pub fn value_or_prompt(
    value: Option<String>,
    field: &str,
    prompt: &str,
    default: Option<&str>,
) -> Result<String, CliError> {
    if let Some(v) = value {
        return Ok(v);
    }
    if !interactive() {
        if let Some(d) = default {
            return Ok(d.to_owned());
        }
        return Err(CliError::Validation {
            field: field.into(),
            reason: format!("--{field} is required when not running interactively"),
        });
    }
    let mut input = Input::<String>::new().with_prompt(prompt);
    if let Some(d) = default {
        input = input.default(d.to_owned());
    }
    input.interact_text().map_err(prompt_err)
}

// ── Lookup rendering (shared by lookup, decode, scan, assign) ───────

#[derive(Debug, Serialize)]
pub struct LookupView {
    pub code: String,
    pub status: QrStatus,
    pub assigned_business_name: Option<String>,
    pub assignable: bool,
    pub message: Option<String>,
}

impl From<&QrLookupResult> for LookupView {
    fn from(r: &QrLookupResult) -> Self {
        Self {
            code: r.code.clone(),
            status: r.status,
            assigned_business_name: r.assigned_business_name.clone(),
            assignable: r.is_assignable(),
            message: r.gate_message(),
        }
    }
}

pub fn print_lookup(result: &QrLookupResult, global: &GlobalOpts) {
    let view = LookupView::from(result);
    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &view,
        |v| {
            let status = output::paint_status(&v.status.to_string(), v.assignable, color);
            let mut lines = vec![format!("Code:    {}", v.code), format!("Status:  {status}")];
            if let Some(ref name) = v.assigned_business_name {
                lines.push(format!("Business: {name}"));
            }
            lines.push(match v.message {
                Some(ref m) => m.clone(),
                None => "Ready to assign.".into(),
            });
            lines.join("\n")
        },
        |v| v.status.to_string(),
    );
    output::print_output(&out, global.quiet);
}
