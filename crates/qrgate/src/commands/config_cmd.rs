//! Config subcommand handlers.

use dialoguer::{Input, Select};
use serde::Serialize;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

// ── Helpers ─────────────────────────────────────────────────────────

/// Profile as shown by `config show`, with the token masked.
#[derive(Serialize)]
struct ProfileView<'a> {
    name: &'a str,
    endpoint: &'a str,
    token: Option<&'static str>,
    token_env: Option<&'a str>,
    timeout: Option<u64>,
    scan_interval_ms: Option<u64>,
}

#[derive(Serialize)]
struct ConfigView<'a> {
    default_profile: Option<&'a str>,
    profiles: Vec<ProfileView<'a>>,
}

impl<'a> From<&'a Config> for ConfigView<'a> {
    fn from(cfg: &'a Config) -> Self {
        Self {
            default_profile: cfg.default_profile.as_deref(),
            profiles: cfg
                .profiles
                .iter()
                .map(|(name, p)| ProfileView {
                    name,
                    endpoint: &p.endpoint,
                    token: p.token.as_ref().map(|_| "****"),
                    token_env: p.token_env.as_deref(),
                    timeout: p.timeout,
                    scan_interval_ms: p.scan_interval_ms,
                })
                .collect(),
        }
    }
}

/// Format config for display, masking the token.
fn format_config_redacted(view: &ConfigView<'_>) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(default) = view.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    for p in &view.profiles {
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{}]", p.name);
        let _ = writeln!(out, "endpoint = \"{}\"", p.endpoint);
        if let Some(masked) = p.token {
            let _ = writeln!(out, "token = \"{masked}\"");
        }
        if let Some(env) = p.token_env {
            let _ = writeln!(out, "token_env = \"{env}\"");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
        if let Some(ms) = p.scan_interval_ms {
            let _ = writeln!(out, "scan_interval_ms = {ms}");
        }
    }

    out.trim_end().to_owned()
}

fn parse_number(field: &str, value: &str, unit: &str) -> Result<u64, CliError> {
    value.parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: format!("must be a number ({unit})"),
    })
}

fn profile_not_found(name: String, cfg: &Config) -> CliError {
    CliError::ProfileNotFound {
        name,
        available: config::available_profiles(cfg),
    }
}

/// Offer to store the token in the system keyring or return it for plaintext config.
///
/// Returns `Some(token)` if the user chose plaintext, `None` if stored in keyring.
fn prompt_token_storage(token: &str, profile_name: &str) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt("Where to store the session token?")
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        config::store_token(profile_name, token)?;
        eprintln!("   ✓ Token stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(token.to_owned()))
    }
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("qrgate configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let endpoint: String = Input::new()
                .with_prompt("GraphQL endpoint")
                .default("https://api.rme.app/graphql".into())
                .interact_text()
                .map_err(prompt_err)?;
            config::parse_endpoint(&endpoint)?;

            eprintln!("\n   Leave the token empty to log in later with `qrgate login`.");
            let token = rpassword::prompt_password("Session token: ").map_err(prompt_err)?;
            let token = if token.is_empty() {
                None
            } else {
                prompt_token_storage(&token, &profile_name)?
            };

            let mut cfg = config::load_config_or_default();
            cfg.profiles.insert(
                profile_name.clone(),
                Profile {
                    endpoint,
                    token,
                    ..Profile::default()
                },
            );
            cfg.default_profile = Some(profile_name.clone());
            config::save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", config_path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Test it: qrgate unassigned --limit 5");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let view = ConfigView::from(&cfg);
            let out = output::render_single(&global.output, &view, format_config_redacted, |_| {
                "config".into()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let profile = cfg.profiles.entry(profile_name.clone()).or_default();

            match key.as_str() {
                "endpoint" => {
                    config::parse_endpoint(&value)?;
                    profile.endpoint = value;
                }
                "token" => profile.token = Some(value),
                "token_env" | "token-env" => profile.token_env = Some(value),
                "timeout" => profile.timeout = Some(parse_number("timeout", &value, "seconds")?),
                "scan_interval_ms" | "scan-interval-ms" => {
                    profile.scan_interval_ms =
                        Some(parse_number("scan_interval_ms", &value, "milliseconds")?);
                }
                other => {
                    return Err(CliError::Validation {
                        field: other.into(),
                        reason: format!(
                            "unknown config key '{other}'. Valid keys: endpoint, token, \
                             token_env, timeout, scan_interval_ms"
                        ),
                    });
                }
            }

            config::save_config(&cfg)?;
            eprintln!("✓ Set {key} on profile '{profile_name}'");
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: qrgate config init");
            } else {
                for name in cfg.profiles.keys() {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(profile_not_found(name, &cfg));
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            eprintln!("✓ Default profile set to '{name}'");
            Ok(())
        }

        // ── SetToken ────────────────────────────────────────────────
        ConfigCommand::SetToken { profile } => {
            let cfg = config::load_config_or_default();
            let profile_name = profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));
            if !cfg.profiles.contains_key(&profile_name) {
                return Err(profile_not_found(profile_name, &cfg));
            }

            let token = rpassword::prompt_password("Session token: ").map_err(prompt_err)?;
            if token.is_empty() {
                return Err(CliError::Validation {
                    field: "token".into(),
                    reason: "value cannot be empty".into(),
                });
            }
            config::store_token(&profile_name, &token)?;
            eprintln!("✓ Token stored in keyring for profile '{profile_name}'");
            Ok(())
        }
    }
}
