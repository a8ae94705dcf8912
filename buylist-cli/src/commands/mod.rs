pub(crate) mod catalog;
pub(crate) mod config;
pub(crate) mod match_cmd;
pub(crate) mod submissions;
pub(crate) mod submit;

use std::path::PathBuf;

use buylist_assistant::{Credentials, GeminiClient};
use buylist_db::SqliteDocumentStore;
use buylist_reconcile::Buylist;
use buylist_reconcile::settings::resolve_store_path;

use crate::CliError;

pub(crate) fn runtime() -> Result<tokio::runtime::Runtime, CliError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| CliError::runtime(format!("Failed to create tokio runtime: {}", e)))
}

/// Open the store and load the catalog and submissions from it.
pub(crate) async fn open_buylist(
    db: Option<PathBuf>,
) -> Result<Buylist<SqliteDocumentStore>, CliError> {
    let path = resolve_store_path(db);
    log::debug!("Using database {}", path.display());
    let store = SqliteDocumentStore::open(&path).map_err(|e| {
        CliError::database(format!("Failed to open {}: {}", path.display(), e))
    })?;
    Ok(Buylist::load(store).await?)
}

/// Build the assistant client from the saved credentials.
pub(crate) fn assistant() -> Result<GeminiClient, CliError> {
    let creds = Credentials::load().map_err(|e| {
        CliError::config(format!(
            "{} (run 'buylist config set-key <KEY>' or set GEMINI_API_KEY)",
            e
        ))
    })?;
    GeminiClient::new(creds).map_err(|e| CliError::assistant(e.to_string()))
}

/// Truncate a string to a maximum width in characters, appending "..." if needed.
pub(crate) fn truncate_str(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else if max > 3 {
        let head: String = s.chars().take(max - 3).collect();
        format!("{}...", head)
    } else {
        s.chars().take(max).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate_str("Pokémon", 10), "Pokémon");
        assert_eq!(truncate_str("Pokémon Jungle", 8), "Pokém...");
        assert_eq!(truncate_str("abcdef", 2), "ab");
    }
}
