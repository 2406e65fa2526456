//! Configuration commands.
//!
//! - `config show`: Display current configuration
//! - `config get`: Print one value (tokens are masked)
//! - `config set`: Validate and store one value

use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::cli::OutputOptions;
use crate::config::{Config, mask_sensitive_value, validate_config_key};
use crate::error::{InterEdError, Result};

/// Show current configuration
pub fn cmd_config_show(output: OutputOptions) -> Result<()> {
    let config = Config::load()?;

    let url = config.api_url();
    let token = config.api_token().map(|t| mask_sensitive_value(&t));

    let json_output = json!({
        "api": {
            "url": url,
            "token": token,
            "token_configured": token.is_some(),
            "timeout": config.api_timeout_secs(),
        },
        "list": {
            "page_size": config.page_size(),
        },
        "config_file": Config::config_path().to_string_lossy(),
    });

    let not_configured = || "not configured".dimmed().to_string();

    let mut text_output = String::new();
    text_output.push_str(&format!("{}\n\n", "Configuration:".cyan().bold()));

    text_output.push_str(&format!("{}:\n", "api".cyan()));
    text_output.push_str(&format!(
        "  url: {}\n",
        url.clone().unwrap_or_else(not_configured)
    ));
    text_output.push_str(&format!(
        "  token: {}\n",
        token.clone().unwrap_or_else(not_configured)
    ));
    text_output.push_str(&format!(
        "  timeout: {}\n",
        config
            .api_timeout_secs()
            .map(|t| format!("{t}s"))
            .unwrap_or_else(|| "30s (default)".dimmed().to_string())
    ));

    text_output.push('\n');
    text_output.push_str(&format!("{}:\n", "list".cyan()));
    text_output.push_str(&format!("  page_size: {}\n", config.page_size()));

    text_output.push('\n');
    text_output.push_str(&format!(
        "{}",
        format!("Config file: {}", Config::config_path().display()).dimmed()
    ));

    CommandOutput::new(json_output)
        .with_text(text_output)
        .print(output)
}

/// Set a configuration value
pub fn cmd_config_set(key: &str, value: &str, output: OutputOptions) -> Result<()> {
    validate_config_key(key)?;

    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;

    let shown = if key == "api.token" {
        mask_sensitive_value(value.trim())
    } else {
        value.trim().to_string()
    };

    let json_output = json!({
        "action": "config_set",
        "key": key,
        "value": shown,
        "success": true,
    });
    let text_output = format!("Set {} to {}", key.cyan(), shown);

    CommandOutput::new(json_output)
        .with_text(text_output)
        .print(output)
}

/// Get a specific configuration value
pub fn cmd_config_get(key: &str, output: OutputOptions) -> Result<()> {
    validate_config_key(key)?;

    let config = Config::load()?;
    let value = config
        .get(key)?
        .ok_or_else(|| InterEdError::Config(format!("{key} not set")))?;

    let (json_output, text_output) = if key == "api.token" {
        let masked = mask_sensitive_value(&value);
        let json = json!({
            "key": key,
            "value": masked,
            "configured": true,
            "masked": true,
        });
        let text = format!("{masked} (masked - showing first 2 and last 2 characters)");
        (json, text)
    } else {
        let json = json!({
            "key": key,
            "value": value,
            "configured": true,
        });
        (json, value)
    };

    CommandOutput::new(json_output)
        .with_text(text_output)
        .print(output)
}
