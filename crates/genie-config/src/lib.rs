//! Shared configuration for the geniectl CLI.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext), and
//! translation to `genie_core::ConsoleConfig`. The CLI adds flag-aware
//! wrappers on top.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use genie_core::{AutoRefreshConfig, ConsoleConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named server profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named server profile.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// API base URL (e.g., "http://acs.example.net:7557").
    pub endpoint: String,

    /// Basic-auth username.
    pub username: Option<String>,

    /// Basic-auth password (plaintext — prefer keyring or env).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Accept self-signed TLS certificates.
    pub insecure: Option<bool>,

    /// Override request timeout (seconds).
    pub timeout: Option<u64>,

    /// Auto-refresh settings for `geniectl watch`.
    #[serde(default)]
    pub auto_refresh: AutoRefreshSection,
}

/// `[profiles.<name>.auto_refresh]` section.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AutoRefreshSection {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u64,

    #[serde(default = "default_true")]
    pub refresh_online_devices: bool,

    #[serde(default = "default_true")]
    pub force_connection_offline_devices: bool,
}

impl Default for AutoRefreshSection {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_minutes: default_interval_minutes(),
            refresh_online_devices: true,
            force_connection_offline_devices: true,
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_interval_minutes() -> u64 {
    10
}

impl AutoRefreshSection {
    /// Translate into the scheduler's runtime config.
    pub fn to_scheduler_config(&self) -> AutoRefreshConfig {
        AutoRefreshConfig {
            enabled: self.enabled,
            interval: Duration::from_secs(self.interval_minutes * 60),
            refresh_online_devices: self.refresh_online_devices,
            force_connection_offline_devices: self.force_connection_offline_devices,
            ..AutoRefreshConfig::default()
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "geniectl", "geniectl").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("geniectl");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    let path = config_path();

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("GENIEACS_").split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the profile's password from the credential chain.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's password_env → env var lookup
    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. Well-known env var
    if let Ok(val) = std::env::var("GENIEACS_PASSWORD") {
        return Ok(SecretString::from(val));
    }

    // 3. System keyring
    if let Ok(entry) = keyring::Entry::new("geniectl", &format!("{profile_name}/password")) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 4. Plaintext in config
    if let Some(ref password) = profile.password {
        return Ok(SecretString::from(password.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Resolve the profile's username (env beats profile, `admin` as a last
/// resort to match the server's stock deployment).
pub fn resolve_username(profile: &Profile) -> String {
    std::env::var("GENIEACS_USERNAME")
        .ok()
        .or_else(|| profile.username.clone())
        .unwrap_or_else(|| "admin".into())
}

/// Store a password in the system keyring for a profile.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new("geniectl", &format!("{profile_name}/password")).map_err(
        |e| ConfigError::Validation {
            field: "keyring".into(),
            reason: e.to_string(),
        },
    )?;
    entry
        .set_password(password)
        .map_err(|e| ConfigError::Validation {
            field: "keyring".into(),
            reason: e.to_string(),
        })
}

// ── ConsoleConfig construction ──────────────────────────────────────

/// Build a `ConsoleConfig` from a profile — no CLI flag overrides.
pub fn profile_to_console_config(
    profile: &Profile,
    profile_name: &str,
) -> Result<ConsoleConfig, ConfigError> {
    let endpoint: url::Url = profile
        .endpoint
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "endpoint".into(),
            reason: format!("invalid URL: {}", profile.endpoint),
        })?;

    let username = resolve_username(profile);
    let password = resolve_password(profile, profile_name)?;
    let timeout = Duration::from_secs(profile.timeout.unwrap_or(default_timeout()));

    Ok(ConsoleConfig {
        endpoint,
        username,
        password,
        timeout,
        accept_invalid_certs: profile.insecure.unwrap_or(false),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_toml_round_trip() {
        let cfg: Config = toml::from_str(
            r#"
            default_profile = "lab"

            [profiles.lab]
            endpoint = "http://acs.lab:7557"
            username = "admin"
            password = "secret"
            timeout = 10

            [profiles.lab.auto_refresh]
            interval_minutes = 5
            force_connection_offline_devices = false
            "#,
        )
        .expect("valid config");

        assert_eq!(cfg.default_profile.as_deref(), Some("lab"));
        let profile = cfg.profiles.get("lab").expect("lab profile");
        assert_eq!(profile.endpoint, "http://acs.lab:7557");
        assert_eq!(profile.timeout, Some(10));
        assert!(profile.auto_refresh.enabled, "enabled defaults to true");
        assert_eq!(profile.auto_refresh.interval_minutes, 5);
        assert!(!profile.auto_refresh.force_connection_offline_devices);
    }

    #[test]
    fn auto_refresh_section_maps_to_scheduler_config() {
        let section = AutoRefreshSection {
            enabled: true,
            interval_minutes: 5,
            refresh_online_devices: false,
            force_connection_offline_devices: true,
        };

        let scheduler = section.to_scheduler_config();
        assert_eq!(scheduler.interval, Duration::from_secs(300));
        assert!(!scheduler.refresh_online_devices);
        assert!(scheduler.force_connection_offline_devices);
    }

    #[test]
    fn plaintext_password_is_the_last_resort() {
        if std::env::var("GENIEACS_PASSWORD").is_ok() {
            return; // ambient credentials would shadow the plaintext path
        }
        let profile = Profile {
            endpoint: "http://acs.lab:7557".into(),
            password: Some("plain".into()),
            ..Profile::default()
        };

        // No env vars or keyring entries exist for this profile name, so
        // resolution falls through to the plaintext field.
        let secret = resolve_password(&profile, "round-trip-test-profile")
            .expect("plaintext fallback");
        assert_eq!(secrecy::ExposeSecret::expose_secret(&secret), "plain");
    }

    #[test]
    fn missing_credentials_is_an_error() {
        if std::env::var("GENIEACS_PASSWORD").is_ok() {
            return;
        }
        let profile = Profile {
            endpoint: "http://acs.lab:7557".into(),
            ..Profile::default()
        };

        assert!(matches!(
            resolve_password(&profile, "no-creds-test-profile"),
            Err(ConfigError::NoCredentials { .. })
        ));
    }
}
