//! Profile resolution with CLI flag overrides.
//!
//! Bridges `genie-config` profiles and `GlobalOpts` into the runtime
//! `ConsoleConfig` / scheduler config handed to `genie-core`.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;

use genie_api::GenieClient;
use genie_config::Config;
use genie_core::{AutoRefreshConfig, ConsoleConfig};

use crate::cli::{GlobalOpts, WatchArgs};
use crate::error::CliError;

/// The default for `--timeout`; used to detect whether the user overrode it.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Resolve the active profile name: flag > config default > "default".
pub fn active_profile_name(global: &GlobalOpts, cfg: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build the runtime connection config from profile + CLI overrides.
pub fn build_console_config(global: &GlobalOpts) -> Result<ConsoleConfig, CliError> {
    let cfg = genie_config::load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    if let Some(profile) = cfg.profiles.get(&profile_name) {
        let mut console = genie_config::profile_to_console_config(profile, &profile_name)?;
        apply_overrides(&mut console, global)?;
        return Ok(console);
    }

    // No profile found -- build from CLI flags / env vars alone.
    let endpoint_str = global.endpoint.as_deref().ok_or(CliError::NoEndpoint)?;
    let endpoint: url::Url = endpoint_str.parse().map_err(|_| CliError::Validation {
        field: "endpoint".into(),
        reason: format!("invalid URL: {endpoint_str}"),
    })?;

    let username = global.username.clone().unwrap_or_else(|| "admin".into());
    let password = std::env::var("GENIEACS_PASSWORD")
        .map(SecretString::from)
        .map_err(|_| CliError::NoCredentials {
            profile: profile_name,
        })?;

    Ok(ConsoleConfig {
        endpoint,
        username,
        password,
        timeout: Duration::from_secs(global.timeout),
        accept_invalid_certs: global.insecure,
    })
}

fn apply_overrides(console: &mut ConsoleConfig, global: &GlobalOpts) -> Result<(), CliError> {
    if let Some(ref endpoint) = global.endpoint {
        console.endpoint = endpoint.parse().map_err(|_| CliError::Validation {
            field: "endpoint".into(),
            reason: format!("invalid URL: {endpoint}"),
        })?;
    }
    if let Some(ref username) = global.username {
        console.username = username.clone();
    }
    if global.insecure {
        console.accept_invalid_certs = true;
    }
    if global.timeout != DEFAULT_TIMEOUT_SECS {
        console.timeout = Duration::from_secs(global.timeout);
    }
    Ok(())
}

/// Build the shared API client.
pub fn build_client(global: &GlobalOpts) -> Result<Arc<GenieClient>, CliError> {
    let console = build_console_config(global)?;
    Ok(Arc::new(console.build_client()?))
}

/// Resolve the scheduler config for `watch`: profile section + flag overrides.
pub fn scheduler_config(global: &GlobalOpts, watch: &WatchArgs) -> AutoRefreshConfig {
    let cfg = genie_config::load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let mut section = cfg
        .profiles
        .get(&profile_name)
        .map(|p| p.auto_refresh.clone())
        .unwrap_or_default();

    if let Some(minutes) = watch.interval_minutes {
        section.interval_minutes = minutes;
    }
    if watch.no_refresh {
        section.refresh_online_devices = false;
    }
    if watch.no_reconnect {
        section.force_connection_offline_devices = false;
    }

    let mut scheduler = section.to_scheduler_config();
    // Running `watch` is an explicit request; the profile can tune the
    // cadence but not disable the foreground loop.
    scheduler.enabled = true;
    scheduler
}
