//! Operator settings (store location, shop name).
//!
//! The settings file is `~/.config/buylist/settings.toml`:
//!
//! ```toml
//! [store]
//! path = "/srv/buylist/buylist.db"
//!
//! [shop]
//! name = "Broken TCG"
//! ```

use std::io;
use std::path::{Path, PathBuf};

pub const DEFAULT_SHOP_NAME: &str = "Broken TCG";

/// Canonical path to the settings file: `~/.config/buylist/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("buylist").join("settings.toml")
}

/// Default database location: `<data dir>/buylist/buylist.db`.
pub fn default_store_path() -> PathBuf {
    let data = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    data.join("buylist").join("buylist.db")
}

/// Resolve the database path using a priority chain:
///
/// 1. CLI override (if `Some`)
/// 2. Saved `store.path` in `settings.toml`
/// 3. [`default_store_path`]
pub fn resolve_store_path(cli_override: Option<PathBuf>) -> PathBuf {
    if let Some(p) = cli_override {
        return p;
    }
    load_setting(&settings_path(), "store", "path")
        .map(PathBuf::from)
        .unwrap_or_else(default_store_path)
}

/// Shop name used in offer emails.
pub fn shop_name() -> String {
    load_setting(&settings_path(), "shop", "name")
        .unwrap_or_else(|| DEFAULT_SHOP_NAME.to_string())
}

/// Read a non-empty string `section.key` from a settings file.
pub fn load_setting(path: &Path, section: &str, key: &str) -> Option<String> {
    let contents = std::fs::read_to_string(path).ok()?;
    let doc: toml::Value = contents.parse().ok()?;
    let value = doc.get(section)?.get(key)?.as_str()?;
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Set (or clear, with `None`) `section.key` in a settings file.
///
/// Other fields are preserved. The file is replaced atomically.
pub fn save_setting(path: &Path, section: &str, key: &str, value: Option<&str>) -> io::Result<()> {
    let mut doc: toml::Value = if let Ok(contents) = std::fs::read_to_string(path) {
        contents
            .parse()
            .unwrap_or_else(|_| toml::Value::Table(Default::default()))
    } else {
        toml::Value::Table(Default::default())
    };

    let table = doc
        .as_table_mut()
        .ok_or_else(|| io::Error::other("settings.toml root is not a table"))?;
    let section_value = table
        .entry(section)
        .or_insert_with(|| toml::Value::Table(Default::default()));
    let section_table = section_value
        .as_table_mut()
        .ok_or_else(|| io::Error::other(format!("[{section}] is not a table")))?;

    match value {
        Some(v) => {
            section_table.insert(key.to_string(), toml::Value::String(v.to_string()));
        }
        None => {
            section_table.remove(key);
        }
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let serialized = toml::to_string_pretty(&doc).map_err(io::Error::other)?;
    let tmp = path.with_extension("toml.tmp");
    std::fs::write(&tmp, &serialized)?;
    std::fs::rename(&tmp, path)?;

    Ok(())
}

/// Load the full settings file as a pretty-printed TOML string for display.
pub fn load_settings_string() -> Option<String> {
    let contents = std::fs::read_to_string(settings_path()).ok()?;
    let doc: toml::Value = contents.parse().ok()?;
    toml::to_string_pretty(&doc).ok()
}
