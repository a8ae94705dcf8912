use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use buylist_assistant::{CredentialSource, Credentials};
use buylist_reconcile::settings::{
    load_settings_string, resolve_store_path, save_setting, settings_path, shop_name,
};

use crate::CliError;

/// Keys accepted by `config set`, as (section, key).
const SETTING_KEYS: &[(&str, &str)] = &[("store", "path"), ("shop", "name")];

fn mask_value(s: &str) -> String {
    let head: String = s.chars().take(4).collect();
    if s.chars().count() <= 4 {
        "****".to_string()
    } else {
        format!("{}****", head)
    }
}

fn file_status(path: &std::path::Path) -> String {
    if path.exists() {
        "(exists)".if_supports_color(Stdout, |t| t.green()).to_string()
    } else {
        "(not found)".if_supports_color(Stdout, |t| t.dimmed()).to_string()
    }
}

/// Show settings, the resolved store, and assistant credentials with their sources.
pub(crate) fn run_config_show(db: Option<PathBuf>) {
    let settings = settings_path();

    log::info!(
        "{}",
        "Buy List Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();
    log::info!(
        "  Settings file: {} {}",
        settings.display().if_supports_color(Stdout, |t| t.cyan()),
        file_status(&settings),
    );
    log::info!("  Database:      {}", resolve_store_path(db).display());
    log::info!("  Shop name:     {}", shop_name());

    if let Some(contents) = load_settings_string() {
        crate::log_blank();
        for line in contents.lines() {
            log::info!("    {}", line.if_supports_color(Stdout, |t| t.dimmed()));
        }
    }
    crate::log_blank();

    log::info!(
        "{}",
        "Assistant Credentials".if_supports_color(Stdout, |t| t.bold()),
    );
    match buylist_assistant::config_path() {
        Some(p) => log::info!(
            "  Credentials file: {} {}",
            p.display().if_supports_color(Stdout, |t| t.cyan()),
            file_status(&p),
        ),
        None => log::info!(
            "  Credentials file: {}",
            "could not determine path".if_supports_color(Stdout, |t| t.red()),
        ),
    }

    let sources = buylist_assistant::credential_sources();
    let creds = Credentials::load().ok();
    let fields = [
        (
            "api_key",
            &sources.api_key,
            creds.as_ref().map(|c| mask_value(&c.api_key)),
        ),
        ("model", &sources.model, creds.as_ref().map(|c| c.model.clone())),
    ];
    for (name, source, value) in fields {
        let source_str = format!("({})", source);
        match (source, value) {
            (CredentialSource::Missing, _) | (_, None) => log::info!(
                "  {:<8} {} {}",
                name,
                "not set".if_supports_color(Stdout, |t| t.red()),
                source_str.if_supports_color(Stdout, |t| t.dimmed()),
            ),
            (_, Some(v)) => log::info!(
                "  {:<8} {} {}",
                name,
                v,
                source_str.if_supports_color(Stdout, |t| t.dimmed()),
            ),
        }
    }
}

/// Print the settings and credentials file paths.
pub(crate) fn run_config_path() -> Result<(), CliError> {
    log::info!("{}", settings_path().display());
    match buylist_assistant::config_path() {
        Some(path) => {
            log::info!("{}", path.display());
            Ok(())
        }
        None => Err(CliError::config("Could not determine config directory")),
    }
}

/// Set or clear one setting in settings.toml.
pub(crate) fn run_config_set(key: &str, value: Option<&str>) -> Result<(), CliError> {
    let (section, field) = SETTING_KEYS
        .iter()
        .copied()
        .find(|(s, f)| key == format!("{s}.{f}"))
        .ok_or_else(|| {
            CliError::input(format!(
                "Unknown setting '{}' (expected store.path or shop.name)",
                key
            ))
        })?;

    let path = settings_path();
    save_setting(&path, section, field, value)?;
    match value {
        Some(v) => log::info!("Set {} = {:?} in {}", key, v, path.display()),
        None => log::info!("Cleared {} in {}", key, path.display()),
    }
    Ok(())
}

/// Save the assistant API key (and optionally the model) to credentials.toml.
pub(crate) fn run_config_set_key(api_key: String, model: Option<String>) -> Result<(), CliError> {
    let current = Credentials::load().unwrap_or_else(|_| Credentials::new(""));
    let creds = current.with_overrides(Some(api_key), model);
    let path = buylist_assistant::save_to_file(&creds)
        .map_err(|e| CliError::config(format!("Failed to save credentials: {}", e)))?;
    log::info!(
        "{} Credentials saved to {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        path.display(),
    );
    Ok(())
}
