//! Configuration management for Pixcast

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

pub const DEFAULT_UPLOAD_BASE_URL: &str = "https://upload.twitter.com";
pub const DEFAULT_API_BASE_URL: &str = "https://api.twitter.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub twitter: Option<TwitterConfig>,
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// The `[twitter]` table
///
/// Every credential is optional at parse time: a missing key disables the
/// Twitter adapter instead of rejecting the whole file.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct TwitterConfig {
    pub api_key: Option<String>,
    pub api_key_secret: Option<String>,
    pub access_token: Option<String>,
    pub access_token_secret: Option<String>,
    pub upload_base_url: Option<String>,
    pub api_base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl std::fmt::Debug for TwitterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "***");
        f.debug_struct("TwitterConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_key_secret", &redact(&self.api_key_secret))
            .field("access_token", &redact(&self.access_token))
            .field("access_token_secret", &redact(&self.access_token_secret))
            .field("upload_base_url", &self.upload_base_url)
            .field("api_base_url", &self.api_base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl TwitterConfig {
    pub fn upload_base_url(&self) -> &str {
        self.upload_base_url
            .as_deref()
            .unwrap_or(DEFAULT_UPLOAD_BASE_URL)
    }

    pub fn api_base_url(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL)
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_platforms")]
    pub platforms: Vec<String>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            platforms: default_platforms(),
        }
    }
}

fn default_platforms() -> Vec<String> {
    vec!["twitter".to_string(), "xhs".to_string()]
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    ///
    /// A missing file is reported as [`ConfigError::NotFound`] so callers can
    /// abort before attempting any publish.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()).into());
        }

        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::ParseError)?;
        Ok(config)
    }
}

/// Resolve the configuration file path following XDG Base Directory spec
///
/// `PIXCAST_CONFIG` takes precedence over the XDG location.
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("PIXCAST_CONFIG") {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("pixcast").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PixcastError;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_config() {
        let config = Config::from_toml(
            r#"
[twitter]
api_key = "key"
api_key_secret = "key-secret"
access_token = "token"
access_token_secret = "token-secret"
api_base_url = "http://127.0.0.1:9999"
timeout_secs = 5

[defaults]
platforms = ["xhs"]
"#,
        )
        .unwrap();

        let twitter = config.twitter.unwrap();
        assert_eq!(twitter.api_key.as_deref(), Some("key"));
        assert_eq!(twitter.access_token_secret.as_deref(), Some("token-secret"));
        assert_eq!(twitter.api_base_url(), "http://127.0.0.1:9999");
        assert_eq!(twitter.upload_base_url(), DEFAULT_UPLOAD_BASE_URL);
        assert_eq!(twitter.timeout_secs(), 5);
        assert_eq!(config.defaults.platforms, vec!["xhs".to_string()]);
    }

    #[test]
    fn test_missing_keys_still_parse() {
        let config = Config::from_toml(
            r#"
[twitter]
api_key = "key"
"#,
        )
        .unwrap();

        let twitter = config.twitter.unwrap();
        assert!(twitter.access_token.is_none());
        assert_eq!(
            config.defaults.platforms,
            vec!["twitter".to_string(), "xhs".to_string()]
        );
    }

    #[test]
    fn test_empty_config_parses() {
        let config = Config::from_toml("").unwrap();
        assert!(config.twitter.is_none());
        assert_eq!(config.defaults.platforms.len(), 2);
    }

    #[test]
    fn test_malformed_config_is_parse_error() {
        let result = Config::from_toml("[twitter\napi_key = ");
        assert!(matches!(
            result,
            Err(PixcastError::Config(ConfigError::ParseError(_)))
        ));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("absent.toml");

        let result = Config::load_from_path(&path);
        match result {
            Err(PixcastError::Config(ConfigError::NotFound(p))) => assert_eq!(p, path),
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_load_from_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[twitter]\naccess_token = \"t\"\n").unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(
            config.twitter.unwrap().access_token.as_deref(),
            Some("t")
        );
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let twitter = TwitterConfig {
            api_key: Some("super-secret-key".to_string()),
            ..Default::default()
        };
        let debug = format!("{:?}", twitter);
        assert!(!debug.contains("super-secret-key"));
        assert!(debug.contains("***"));
    }

    #[test]
    #[serial]
    fn test_resolve_config_path_from_env() {
        std::env::set_var("PIXCAST_CONFIG", "/tmp/pixcast-test/config.toml");
        let path = resolve_config_path().unwrap();
        std::env::remove_var("PIXCAST_CONFIG");

        assert_eq!(path, PathBuf::from("/tmp/pixcast-test/config.toml"));
    }

    #[test]
    #[serial]
    fn test_resolve_config_path_default() {
        std::env::remove_var("PIXCAST_CONFIG");
        if let Ok(path) = resolve_config_path() {
            assert!(path.ends_with("pixcast/config.toml"));
        }
    }
}
