//! Configuration command handlers (no server connection required).

use dialoguer::{Confirm, Input};

use genie_config::{AutoRefreshSection, Config, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(global),
        ConfigCommand::Show => show(global),
        ConfigCommand::Path => {
            println!("{}", genie_config::config_path().display());
            Ok(())
        }
        ConfigCommand::SetPassword => set_password(global),
    }
}

fn profile_name(global: &GlobalOpts, cfg: &Config) -> String {
    crate::config::active_profile_name(global, cfg)
}

// ── init ────────────────────────────────────────────────────────────

fn init(global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = genie_config::load_config_or_default();
    let name = profile_name(global, &cfg);

    let existing = cfg.profiles.get(&name);

    let endpoint: String = Input::new()
        .with_prompt("API base URL")
        .with_initial_text(
            existing
                .map(|p| p.endpoint.clone())
                .unwrap_or_else(|| "http://127.0.0.1:7557".into()),
        )
        .interact_text()
        .map_err(dialoguer_err)?;

    let username: String = Input::new()
        .with_prompt("Username")
        .with_initial_text(
            existing
                .and_then(|p| p.username.clone())
                .unwrap_or_else(|| "admin".into()),
        )
        .interact_text()
        .map_err(dialoguer_err)?;

    let password = rpassword::prompt_password("Password: ")?;

    let use_keyring = Confirm::new()
        .with_prompt("Store password in the system keyring?")
        .default(true)
        .interact()
        .map_err(dialoguer_err)?;

    let stored_password = if use_keyring {
        genie_config::store_password(&name, &password)?;
        None
    } else {
        Some(password)
    };

    let auto_refresh = existing
        .map(|p| p.auto_refresh.clone())
        .unwrap_or_else(AutoRefreshSection::default);

    cfg.profiles.insert(
        name.clone(),
        Profile {
            endpoint,
            username: Some(username),
            password: stored_password,
            password_env: None,
            insecure: global.insecure.then_some(true),
            timeout: None,
            auto_refresh,
        },
    );
    if cfg.default_profile.is_none() {
        cfg.default_profile = Some(name.clone());
    }

    genie_config::save_config(&cfg)?;

    if !global.quiet {
        eprintln!(
            "Profile '{name}' written to {}",
            genie_config::config_path().display()
        );
    }
    Ok(())
}

// ── show ────────────────────────────────────────────────────────────

fn show(global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = genie_config::load_config_or_default();

    // Never echo stored secrets.
    for profile in cfg.profiles.values_mut() {
        if profile.password.is_some() {
            profile.password = Some("<redacted>".into());
        }
    }

    let rendered = toml::to_string_pretty(&cfg).map_err(|e| CliError::Config {
        message: e.to_string(),
    })?;
    crate::output::print_output(&rendered, global.quiet);
    Ok(())
}

// ── set-password ────────────────────────────────────────────────────

fn set_password(global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = genie_config::load_config_or_default();
    let name = profile_name(global, &cfg);

    let password = rpassword::prompt_password("Password: ")?;
    genie_config::store_password(&name, &password)?;

    if !global.quiet {
        eprintln!("Password stored in keyring for profile '{name}'");
    }
    Ok(())
}

fn dialoguer_err(err: dialoguer::Error) -> CliError {
    CliError::Io(std::io::Error::other(err))
}
