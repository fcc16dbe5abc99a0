//! CLI-owned configuration: TOML profiles, token resolution, and
//! translation to `qrgate_core::ServiceConfig`.
//!
//! Core never sees these types -- it receives a pre-built `ServiceConfig`.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use qrgate_core::ServiceConfig;
use qrgate_core::config::DEFAULT_TIMEOUT;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Keyring service name; entries are keyed `{profile}/token`.
pub const KEYRING_SERVICE: &str = "qrgate";

// ── TOML config structs ──────────────────────────────────────────────

/// CLI-owned TOML configuration. Core never touches this type.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name (used when --profile is not specified).
    pub default_profile: Option<String>,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            profiles: BTreeMap::new(),
        }
    }
}

/// CLI-owned profile definition.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// GraphQL endpoint (e.g., "https://api.rme.app/graphql").
    pub endpoint: String,

    /// Session token (plaintext -- prefer keyring or env var).
    pub token: Option<String>,

    /// Environment variable name containing the session token.
    pub token_env: Option<String>,

    /// Override request timeout (seconds).
    pub timeout: Option<u64>,

    /// Camera poll interval (milliseconds).
    pub scan_interval_ms: Option<u64>,
}

// ── Config file path ─────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("app", "rme", "qrgate").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("qrgate");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Config loading ───────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, CliError> {
    let path = config_path();

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("QRGATE_").split("__"));

    Ok(figment.extract()?)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), CliError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg).map_err(|e| CliError::Validation {
        field: "config".into(),
        reason: format!("failed to serialize config: {e}"),
    })?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Profile resolution ───────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build a `ServiceConfig` from the config file, profile, and CLI overrides.
///
/// Without a matching profile, `--endpoint` / `QRGATE_ENDPOINT` alone is
/// enough. A token is optional; lookups work anonymously.
pub fn build_service_config(global: &GlobalOpts) -> Result<ServiceConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);
    let profile = cfg.profiles.get(&profile_name);

    if profile.is_none() && global.profile.is_some() {
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: available_profiles(&cfg),
        });
    }

    // 1. Endpoint (flag > env > profile)
    let endpoint_str = global
        .endpoint
        .as_deref()
        .or_else(|| profile.map(|p| p.endpoint.as_str()))
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| CliError::NoConfig {
            path: config_path().display().to_string(),
        })?;
    let endpoint = parse_endpoint(endpoint_str)?;

    // 2. Token
    let auth_token = resolve_token(profile, &profile_name, global);

    let mut config = ServiceConfig::new(endpoint);
    config.auth_token = auth_token;
    config.timeout = resolve_timeout(global.timeout, profile);
    if let Some(ms) = profile.and_then(|p| p.scan_interval_ms) {
        config.scan_interval = Duration::from_millis(ms);
    }

    debug!(
        profile = %profile_name,
        endpoint = %config.endpoint,
        authenticated = config.auth_token.is_some(),
        "service config resolved"
    );
    Ok(config)
}

/// Request timeout: flag or env > profile > built-in default.
fn resolve_timeout(flag: Option<u64>, profile: Option<&Profile>) -> Duration {
    flag.or_else(|| profile.and_then(|p| p.timeout))
        .map_or(DEFAULT_TIMEOUT, Duration::from_secs)
}

pub fn parse_endpoint(value: &str) -> Result<Url, CliError> {
    let url: Url = value.trim().parse().map_err(|_| CliError::Validation {
        field: "endpoint".into(),
        reason: format!("invalid URL: {value}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(CliError::Validation {
            field: "endpoint".into(),
            reason: format!("expected an http(s) URL, got {value}"),
        });
    }
    Ok(url)
}

pub fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        "(none)".into()
    } else {
        cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

// ── Credential helpers ───────────────────────────────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/token"))
}

/// Resolve a session token from the credential chain.
fn resolve_token(
    profile: Option<&Profile>,
    profile_name: &str,
    global: &GlobalOpts,
) -> Option<SecretString> {
    // 1. CLI flag / QRGATE_TOKEN
    if let Some(ref token) = global.token {
        return Some(SecretString::from(token.clone()));
    }

    let profile = profile?;

    // 2. Profile's token_env -> env var lookup
    if let Some(val) = profile
        .token_env
        .as_deref()
        .and_then(|name| std::env::var(name).ok())
    {
        return Some(SecretString::from(val));
    }

    // 3. System keyring
    if let Ok(secret) = keyring_entry(profile_name).and_then(|e| e.get_password()) {
        return Some(SecretString::from(secret));
    }

    // 4. Plaintext in config
    profile.token.clone().map(SecretString::from)
}

/// Store a session token in the system keyring.
pub fn store_token(profile_name: &str, token: &str) -> Result<(), CliError> {
    keyring_entry(profile_name)
        .and_then(|entry| entry.set_password(token))
        .map_err(|e| CliError::Validation {
            field: "keyring".into(),
            reason: format!("failed to store token in keyring: {e}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_must_be_http() {
        assert!(parse_endpoint("https://api.rme.app/graphql").is_ok());
        assert!(parse_endpoint("ftp://api.rme.app/graphql").is_err());
        assert!(parse_endpoint("not a url").is_err());
    }

    #[test]
    fn timeout_flag_beats_profile_even_at_default_value() {
        let profile = Profile {
            timeout: Some(90),
            ..Profile::default()
        };
        assert_eq!(resolve_timeout(Some(30), Some(&profile)), Duration::from_secs(30));
        assert_eq!(resolve_timeout(None, Some(&profile)), Duration::from_secs(90));
        assert_eq!(resolve_timeout(Some(5), None), Duration::from_secs(5));
        assert_eq!(resolve_timeout(None, None), DEFAULT_TIMEOUT);
        assert_eq!(resolve_timeout(None, Some(&Profile::default())), DEFAULT_TIMEOUT);
    }

    #[test]
    fn profile_round_trips_through_toml() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "field".into(),
            Profile {
                endpoint: "https://api.rme.app/graphql".into(),
                scan_interval_ms: Some(250),
                ..Profile::default()
            },
        );
        let text = toml::to_string_pretty(&cfg).unwrap_or_default();
        let back: Config = toml::from_str(&text).unwrap_or_default();
        assert_eq!(back.profiles["field"].scan_interval_ms, Some(250));
        assert_eq!(available_profiles(&back), "field");
    }
}
