//! Configuration loader
//!
//! ## Loading Strategy
//! 1. Probe the standard locations for a config file
//! 2. Fall back to [`Config::default`] when none exists
//! 3. Apply environment overrides
//!
//! ## Environment Variables
//! - `CORESUITE_BASE_URL`, `CORESUITE_API_KEY`, `CORESUITE_TENANT`,
//!   `CORESUITE_WEBHOOK_SECRET`
//! - `PAYMENTS_BASE_URL`, `PAYMENTS_API_KEY`
//! - `TICKETING_BASE_URL`, `TICKETING_API_KEY`, `TICKETING_ACCOUNT_ID`
//! - `SIGNATURE_BASE_URL`, `SIGNATURE_API_KEY`
//! - `INTEGRATIONS_LOG_FILE`, `INTEGRATIONS_ENV_FILE`, `INTEGRATIONS_AUDIT_DB`
//!
//! Blank values are ignored.
//!
//! ## File Locations
//! 1. `./config.{json,toml}`, `./coresuite.{json,toml}`
//! 2. `../config.{json,toml}`, `../../config.{json,toml}`
//! 3. The same names relative to the executable

use std::path::{Path, PathBuf};

use coresuite_domain::{Config, IntegrationError, ProviderConfig, Result};

/// Load configuration from the first config file found (or defaults), then
/// apply environment overrides.
///
/// # Errors
/// Returns `IntegrationError::Config` if a config file exists but cannot be
/// read or parsed.
pub fn load() -> Result<Config> {
    let mut config = match probe_config_paths() {
        Some(path) => load_from_file(&path)?,
        None => {
            tracing::debug!("No config file found, using defaults");
            Config::default()
        }
    };

    apply_env_overrides(&mut config);
    Ok(config)
}

/// Load configuration from a file. Format is detected by extension.
///
/// # Errors
/// Returns `IntegrationError::Config` if the file is missing, unreadable,
/// has an unsupported extension or does not parse.
pub fn load_from_file(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Err(IntegrationError::Config(format!("Config file not found: {}", path.display())));
    }

    tracing::info!(path = %path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(path)
        .map_err(|e| IntegrationError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, path)
}

fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| IntegrationError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| IntegrationError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(IntegrationError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe the standard locations for a configuration file.
pub fn probe_config_paths() -> Option<PathBuf> {
    const NAMES: [&str; 8] = [
        "config.json",
        "config.toml",
        "coresuite.json",
        "coresuite.toml",
        "../config.json",
        "../config.toml",
        "../../config.json",
        "../../config.toml",
    ];

    let mut roots = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd);
    }
    if let Some(exe_dir) =
        std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        roots.push(exe_dir);
    }

    roots.iter().flat_map(|root| NAMES.iter().map(move |name| root.join(name))).find(|p| p.exists())
}

/// Overlay the process environment onto `config`.
pub fn apply_env_overrides(config: &mut Config) {
    apply_overrides(config, |key| std::env::var(key).ok());
}

fn apply_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
    let integrations = &mut config.integrations;

    override_provider(&mut integrations.coresuite, &get, "CORESUITE", |section, get| {
        if let Some(tenant) = get("CORESUITE_TENANT") {
            section.tenant = Some(tenant);
        }
        if let Some(secret) = get("CORESUITE_WEBHOOK_SECRET") {
            section.webhook_secret = Some(secret);
        }
    });
    override_provider(&mut integrations.payments, &get, "PAYMENTS", |_, _| {});
    override_provider(&mut integrations.ticketing, &get, "TICKETING", |section, get| {
        if let Some(account_id) = get("TICKETING_ACCOUNT_ID") {
            section.account_id = Some(account_id);
        }
    });
    override_provider(&mut integrations.digital_signature, &get, "SIGNATURE", |_, _| {});

    if let Some(path) = get("INTEGRATIONS_LOG_FILE") {
        config.storage.log_file = PathBuf::from(path);
    }
    if let Some(path) = get("INTEGRATIONS_ENV_FILE") {
        config.storage.env_file = PathBuf::from(path);
    }
    if let Some(path) = get("INTEGRATIONS_AUDIT_DB") {
        config.storage.audit_db_path = PathBuf::from(path);
    }
}

fn override_provider<G, E>(slot: &mut Option<ProviderConfig>, get: &G, prefix: &str, extra: E)
where
    G: Fn(&str) -> Option<String>,
    E: FnOnce(&mut ProviderConfig, &G),
{
    let base_url = get(&format!("{prefix}_BASE_URL"));
    let api_key = get(&format!("{prefix}_API_KEY"));

    let section = slot.get_or_insert_with(ProviderConfig::default);
    if let Some(base_url) = base_url {
        section.base_url = base_url;
    }
    if let Some(api_key) = api_key {
        section.api_key = api_key;
    }
    extra(section, get);

    if *section == ProviderConfig::default() {
        *slot = None;
    }
}
