use std::fmt;
use std::path::PathBuf;

use crate::error::AssistantError;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-09-2025";

const API_KEY_VAR: &str = "GEMINI_API_KEY";
const MODEL_VAR: &str = "GEMINI_MODEL";

/// Credentials for the Gemini text-completion API.
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub model: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"****")
            .field("model", &self.model)
            .finish()
    }
}

/// Where a credential value was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    EnvVar(&'static str),
    ConfigFile,
    Default,
    Missing,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnvVar(var) => write!(f, "env ({})", var),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
            Self::Missing => write!(f, "not set"),
        }
    }
}

/// Provenance of each credential field.
#[derive(Debug)]
pub struct CredentialSources {
    pub api_key: CredentialSource,
    pub model: CredentialSource,
}

/// TOML config file format.
#[derive(Debug, Default, serde::Deserialize, serde::Serialize)]
struct ConfigFile {
    gemini: Option<GeminiConfig>,
}

#[derive(Debug, Default, serde::Deserialize, serde::Serialize)]
struct GeminiConfig {
    api_key: Option<String>,
    model: Option<String>,
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Credentials {
    /// Load credentials from environment variables or the config file.
    ///
    /// Priority: env vars > config file > default. The API key has no default.
    pub fn load() -> Result<Self, AssistantError> {
        let config = load_config_file();

        let api_key = env_var(API_KEY_VAR)
            .or_else(|| config.as_ref().and_then(|c| c.api_key.clone()))
            .ok_or_else(|| {
                AssistantError::config(format!(
                    "Missing API key. Set {} env var or add to config file",
                    API_KEY_VAR
                ))
            })?;

        let model = env_var(MODEL_VAR)
            .or_else(|| config.as_ref().and_then(|c| c.model.clone()))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Ok(Self { api_key, model })
    }

    /// Credentials with an explicit key and the default model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Override fields with explicit values (e.g., from CLI args).
    pub fn with_overrides(mut self, api_key: Option<String>, model: Option<String>) -> Self {
        if let Some(key) = api_key {
            self.api_key = key;
        }
        if let Some(m) = model {
            self.model = m;
        }
        self
    }
}

/// Return the path to the credentials config file.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("buylist").join("credentials.toml"))
}

/// Save credentials to the config file, creating parent directories as needed.
///
/// The model is omitted when it is the default. Returns the path written.
pub fn save_to_file(creds: &Credentials) -> Result<PathBuf, AssistantError> {
    let path = config_path()
        .ok_or_else(|| AssistantError::config("Could not determine config directory"))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let config = ConfigFile {
        gemini: Some(GeminiConfig {
            api_key: Some(creds.api_key.clone()),
            model: if creds.model == DEFAULT_MODEL {
                None
            } else {
                Some(creds.model.clone())
            },
        }),
    };

    let toml_str = toml::to_string_pretty(&config)
        .map_err(|e| AssistantError::config(format!("Failed to serialize config: {}", e)))?;

    std::fs::write(&path, toml_str)?;
    Ok(path)
}

/// Determine where each credential field is coming from.
pub fn credential_sources() -> CredentialSources {
    let config = load_config_file();

    let api_key = if env_var(API_KEY_VAR).is_some() {
        CredentialSource::EnvVar(API_KEY_VAR)
    } else if config.as_ref().and_then(|c| c.api_key.as_ref()).is_some() {
        CredentialSource::ConfigFile
    } else {
        CredentialSource::Missing
    };

    let model = if env_var(MODEL_VAR).is_some() {
        CredentialSource::EnvVar(MODEL_VAR)
    } else if config.as_ref().and_then(|c| c.model.as_ref()).is_some() {
        CredentialSource::ConfigFile
    } else {
        CredentialSource::Default
    };

    CredentialSources { api_key, model }
}

fn load_config_file() -> Option<GeminiConfig> {
    let path = config_path()?;
    let content = std::fs::read_to_string(&path).ok()?;
    parse_config(&content)
}

fn parse_config(content: &str) -> Option<GeminiConfig> {
    let config: ConfigFile = toml::from_str(content).ok()?;
    config.gemini
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_gemini_table() {
        let cfg = parse_config("[gemini]\napi_key = \"abc\"\n").unwrap();
        assert_eq!(cfg.api_key.as_deref(), Some("abc"));
        assert!(cfg.model.is_none());
    }

    #[test]
    fn missing_table_is_none() {
        assert!(parse_config("[other]\nx = 1\n").is_none());
        assert!(parse_config("not toml = = =").is_none());
    }

    #[test]
    fn debug_masks_key() {
        let creds = Credentials::new("secret-key");
        let dbg = format!("{:?}", creds);
        assert!(!dbg.contains("secret-key"));
        assert!(dbg.contains(DEFAULT_MODEL));
    }

    #[test]
    fn overrides_apply() {
        let creds = Credentials::new("a").with_overrides(None, Some("gemini-pro".into()));
        assert_eq!(creds.api_key, "a");
        assert_eq!(creds.model, "gemini-pro");
    }

    #[test]
    fn source_display() {
        assert_eq!(
            CredentialSource::EnvVar("GEMINI_API_KEY").to_string(),
            "env (GEMINI_API_KEY)"
        );
        assert_eq!(CredentialSource::Missing.to_string(), "not set");
    }
}
