use std::env;
use std::fmt;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{InterEdError, Result};
use crate::list::DEFAULT_PAGE_SIZE;
use crate::paths::config_file;

/// Environment variable overriding `api.url`
pub const API_URL_ENV: &str = "INTERED_API_URL";

/// Environment variable overriding `api.token`
pub const API_TOKEN_ENV: &str = "INTERED_API_TOKEN";

/// Keys accepted by `config get` and `config set`
pub const VALID_KEYS: &[&str] = &["api.url", "api.token", "api.timeout", "list.page_size"];

/// Client configuration stored in `.intered/config.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "ApiConfig::is_empty")]
    pub api: ApiConfig,

    #[serde(default, skip_serializing_if = "ListConfig::is_empty")]
    pub list: ListConfig,
}

/// Dashboard API connection settings
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl ApiConfig {
    fn is_empty(&self) -> bool {
        self.url.is_none() && self.token.is_none() && self.timeout.is_none()
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("url", &self.url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// List screen defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<usize>,
}

impl ListConfig {
    fn is_empty(&self) -> bool {
        self.page_size.is_none()
    }
}

impl Config {
    pub fn config_path() -> PathBuf {
        config_file()
    }

    /// Load configuration, or defaults when the file does not exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            InterEdError::Config(format!(
                "failed to read config file at {}: {e}",
                path.display()
            ))
        })?;

        let config: Config = serde_yaml_ng::from_str(&content).map_err(|e| {
            InterEdError::Config(format!(
                "failed to parse config file at {}: {e}",
                path.display()
            ))
        })?;

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(&path, content).map_err(|e| {
            InterEdError::Config(format!(
                "failed to write config file at {}: {e}",
                path.display()
            ))
        })?;
        Ok(())
    }

    /// API base URL (environment variable takes precedence)
    pub fn api_url(&self) -> Option<String> {
        if let Ok(url) = env::var(API_URL_ENV)
            && !url.is_empty()
        {
            return Some(url);
        }
        self.api.url.clone()
    }

    /// API bearer token (environment variable takes precedence)
    pub fn api_token(&self) -> Option<String> {
        if let Ok(token) = env::var(API_TOKEN_ENV)
            && !token.is_empty()
        {
            return Some(token);
        }
        self.api.token.clone()
    }

    pub fn api_timeout_secs(&self) -> Option<u64> {
        self.api.timeout
    }

    pub fn page_size(&self) -> usize {
        self.list.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Stored value of a key, as text. Environment overrides are applied.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        validate_config_key(key)?;
        let value = match key {
            "api.url" => self.api_url(),
            "api.token" => self.api_token(),
            "api.timeout" => self.api.timeout.map(|t| t.to_string()),
            "list.page_size" => self.list.page_size.map(|n| n.to_string()),
            _ => return Err(unknown_key(key)),
        };
        Ok(value)
    }

    /// Parse and store a value for a key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_config_key(key)?;
        match key {
            "api.url" => {
                let url = Url::parse(value.trim())?;
                if !matches!(url.scheme(), "http" | "https") {
                    return Err(InterEdError::Config(format!(
                        "api.url must use http or https, got '{}'",
                        url.scheme()
                    )));
                }
                self.api.url = Some(value.trim().to_string());
            }
            "api.token" => {
                let token = value.trim();
                if token.is_empty() {
                    return Err(InterEdError::Config("api.token cannot be empty".to_string()));
                }
                self.api.token = Some(token.to_string());
            }
            "api.timeout" => {
                let seconds: u64 = value.trim().parse().map_err(|_| {
                    InterEdError::Config(format!(
                        "invalid api.timeout '{value}': expected a number of seconds"
                    ))
                })?;
                self.api.timeout = Some(seconds);
            }
            "list.page_size" => {
                let size: usize = value.trim().parse().map_err(|_| {
                    InterEdError::Config(format!(
                        "invalid list.page_size '{value}': expected a positive integer"
                    ))
                })?;
                if size == 0 {
                    return Err(InterEdError::Config(
                        "list.page_size must be at least 1".to_string(),
                    ));
                }
                self.list.page_size = Some(size);
            }
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }
}

/// Reject underscore spellings of dotted keys with a hint
pub fn validate_config_key(key: &str) -> Result<()> {
    if VALID_KEYS.contains(&key) {
        return Ok(());
    }

    let dot_version = key.replacen('_', ".", 1);
    if VALID_KEYS.contains(&dot_version.as_str()) {
        return Err(InterEdError::Config(format!(
            "invalid config key '{key}'. Use dot notation: '{dot_version}'"
        )));
    }

    Err(unknown_key(key))
}

fn unknown_key(key: &str) -> InterEdError {
    InterEdError::Config(format!(
        "unknown config key '{key}'. Valid keys: {}",
        VALID_KEYS.join(", ")
    ))
}

/// Mask a secret for display, keeping the first and last two characters
pub fn mask_sensitive_value(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{head}...{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_config_default_is_empty_yaml() {
        let config = Config::default();
        assert_eq!(config.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(serde_yaml_ng::to_string(&config).unwrap().trim(), "{}");
    }

    #[test]
    fn test_config_deserialize() {
        let yaml = r#"
api:
  url: https://dashboard.intered.io
  token: secret-token-123
  timeout: 10
list:
  page_size: 25
"#;
        let config: Config = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.api.url.as_deref(), Some("https://dashboard.intered.io"));
        assert_eq!(config.api_timeout_secs(), Some(10));
        assert_eq!(config.page_size(), 25);
    }

    #[test]
    fn test_debug_redacts_token() {
        let mut config = Config::default();
        config.api.token = Some("secret-token-123".to_string());
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret-token-123"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_set_validates_values() {
        let mut config = Config::default();
        config.set("list.page_size", "20").unwrap();
        assert_eq!(config.page_size(), 20);

        assert!(config.set("list.page_size", "0").is_err());
        assert!(config.set("api.timeout", "soon").is_err());
        assert!(config.set("api.url", "ftp://files.example.com").is_err());
        assert!(config.set("api.url", "not a url").is_err());
        assert_eq!(config.page_size(), 20);
    }

    #[test]
    fn test_underscore_key_gets_hint() {
        let err = validate_config_key("list_page_size").unwrap_err();
        assert!(err.to_string().contains("Use dot notation: 'list.page_size'"));

        let err = validate_config_key("api_url").unwrap_err();
        assert!(err.to_string().contains("Use dot notation: 'api.url'"));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = Config::default().get("api.password").unwrap_err();
        assert!(err.to_string().contains("unknown config key"));
    }

    #[test]
    fn test_mask_sensitive_value() {
        assert_eq!(mask_sensitive_value("abcdef"), "ab...ef");
        assert_eq!(mask_sensitive_value("abcd"), "****");
        assert_eq!(mask_sensitive_value(""), "****");
    }

    #[test]
    #[serial]
    fn test_env_overrides_file_values() {
        let mut config = Config::default();
        config.api.url = Some("https://file.example.com".to_string());
        config.api.token = Some("from-file".to_string());

        // SAFETY: We use #[serial] to ensure single-threaded access
        unsafe {
            env::set_var(API_URL_ENV, "https://env.example.com");
            env::set_var(API_TOKEN_ENV, "");
        }
        assert_eq!(config.api_url().as_deref(), Some("https://env.example.com"));
        assert_eq!(config.api_token().as_deref(), Some("from-file"));

        unsafe {
            env::remove_var(API_URL_ENV);
            env::remove_var(API_TOKEN_ENV);
        }
        assert_eq!(config.api_url().as_deref(), Some("https://file.example.com"));
    }

    #[test]
    #[serial]
    fn test_save_and_load_roundtrip() {
        let temp = tempfile::tempdir().unwrap();
        // SAFETY: We use #[serial] to ensure single-threaded access
        unsafe { env::set_var("INTERED_ROOT", temp.path()) };

        let mut config = Config::default();
        config.set("api.url", "http://localhost:8080").unwrap();
        config.set("api.timeout", "5").unwrap();
        config.save().unwrap();

        let loaded = Config::load().unwrap();
        assert_eq!(loaded.api.url.as_deref(), Some("http://localhost:8080"));
        assert_eq!(loaded.api_timeout_secs(), Some(5));

        unsafe { env::remove_var("INTERED_ROOT") };
    }
}
