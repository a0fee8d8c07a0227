//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\game-minder\config.toml
//! - macOS: ~/Library/Application Support/game-minder/config.toml
//! - Linux: ~/.config/game-minder/config.toml
//!
//! The config file is human-readable and editable. Credentials can also
//! arrive through CLI flags / environment variables, which take precedence
//! over the file.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Error;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API credentials (keep separate for potential future encryption)
    pub credentials: Credentials,

    /// Catalog provider endpoints
    pub provider: ProviderConfig,

    /// Library settings
    pub library: LibraryConfig,
}

/// API credentials
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// Twitch application client id
    pub client_id: Option<String>,

    /// Twitch application client secret
    pub client_secret: Option<String>,
}

/// Catalog provider endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// IGDB API base URL
    pub base_url: String,

    /// Twitch OAuth2 token endpoint
    pub auth_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.igdb.com/v4".to_string(),
            auth_url: "https://id.twitch.tv/oauth2/token".to_string(),
        }
    }
}

/// Library management settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Database file path (default: game_minder.db in the current directory)
    pub database_path: Option<PathBuf>,
}

impl Config {
    /// Reject configurations the client cannot start with.
    ///
    /// An empty base or auth URL is a startup-time fatal error - there is no
    /// sensible fallback for either.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.provider.base_url.trim().is_empty() {
            return Err(Error::config("catalog base URL must not be empty"));
        }
        if self.provider.auth_url.trim().is_empty() {
            return Err(Error::config("auth URL must not be empty"));
        }
        Ok(())
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("game-minder"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from disk
///
/// Returns default config if file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };

    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[credentials]"));
        assert!(toml.contains("[provider]"));
        assert!(toml.contains("[library]"));
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_empty_base_url_is_fatal() {
        let mut config = Config::default();
        config.provider.base_url = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        // Config with only some fields
        let toml = r#"
[credentials]
client_id = "my-id"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        // Specified field is set
        assert_eq!(config.credentials.client_id, Some("my-id".to_string()));

        // Other fields use defaults
        assert_eq!(config.provider.base_url, "https://api.igdb.com/v4");
        assert!(config.library.database_path.is_none());
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.credentials.client_secret = Some("s3cret".to_string());
        config.library.database_path = Some(PathBuf::from("/library/games.db"));

        let toml = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();

        assert_eq!(parsed.credentials.client_secret, Some("s3cret".to_string()));
        assert_eq!(
            parsed.library.database_path,
            Some(PathBuf::from("/library/games.db"))
        );
    }
}
