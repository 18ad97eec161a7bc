use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::session::clock::{WallClock, DEFAULT_TIMEZONE};

/// EmailJS REST send endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";

/// Environment variables that override delivery credentials
pub const ENV_SERVICE_ID: &str = "PUNCH_CLOCK_SERVICE_ID";
pub const ENV_TEMPLATE_ID: &str = "PUNCH_CLOCK_TEMPLATE_ID";
pub const ENV_PUBLIC_KEY: &str = "PUNCH_CLOCK_PUBLIC_KEY";
pub const ENV_PRIVATE_KEY: &str = "PUNCH_CLOCK_PRIVATE_KEY";

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub delivery: DeliveryConfig,
    #[serde(default)]
    pub tracker: TrackerSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Email delivery service settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeliveryConfig {
    #[serde(default)]
    pub service_id: String,

    #[serde(default)]
    pub template_id: String,

    /// Public key, sent as `user_id`
    #[serde(default)]
    pub public_key: String,

    /// Private key, sent as `accessToken` when the account requires it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Request timeout (seconds)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Session tracker settings
///
/// The counter always advances once per second; there is no tick setting.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TrackerSettings {
    /// IANA zone used for notification timestamps
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default values
fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            service_id: String::new(),
            template_id: String::new(),
            public_key: String::new(),
            private_key: None,
            endpoint: default_endpoint(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl TrackerSettings {
    pub fn clock(&self) -> Result<WallClock> {
        WallClock::new(&self.timezone)
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load configuration from file if it exists, otherwise start from defaults
    ///
    /// Environment overrides are applied in both cases.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            Self::load(path)?
        } else {
            Self::default()
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid TOML")
    }

    /// Replace delivery credentials with values from the environment
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_SERVICE_ID) {
            self.delivery.service_id = value;
        }
        if let Some(value) = lookup(ENV_TEMPLATE_ID) {
            self.delivery.template_id = value;
        }
        if let Some(value) = lookup(ENV_PUBLIC_KEY) {
            self.delivery.public_key = value;
        }
        if let Some(value) = lookup(ENV_PRIVATE_KEY) {
            self.delivery.private_key = Some(value);
        }
    }

    /// Validate configuration
    ///
    /// Credentials are only required when notifications are really sent.
    pub fn validate(&self, require_credentials: bool) -> Result<()> {
        if require_credentials {
            let missing: Vec<&str> = [
                ("delivery.service_id", &self.delivery.service_id),
                ("delivery.template_id", &self.delivery.template_id),
                ("delivery.public_key", &self.delivery.public_key),
            ]
            .into_iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(key, _)| key)
            .collect();

            if !missing.is_empty() {
                anyhow::bail!(
                    "Missing delivery credentials: {}. Set them in the config file or via {}, {}, {}",
                    missing.join(", "),
                    ENV_SERVICE_ID,
                    ENV_TEMPLATE_ID,
                    ENV_PUBLIC_KEY
                );
            }
        }

        let url = url::Url::parse(&self.delivery.endpoint)
            .context("Invalid delivery endpoint URL")?;

        if url.scheme() != "https" {
            anyhow::bail!("Delivery endpoint must use HTTPS (got: {})", url.scheme());
        }

        if self.delivery.timeout_secs == 0 {
            anyhow::bail!("Delivery timeout must be at least 1 second");
        }

        self.tracker.clock().context("Invalid tracker timezone")?;

        Ok(())
    }

    /// Copy of this configuration with secrets masked, for display
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        config.delivery.public_key = mask(&config.delivery.public_key);
        config.delivery.private_key = config.delivery.private_key.as_deref().map(mask);
        config
    }
}

/// Keep the first few characters of a secret
fn mask(secret: &str) -> String {
    if secret.is_empty() {
        return String::new();
    }
    let visible: String = secret.chars().take(3).collect();
    format!("{}***", visible)
}

/// Get the default config file path
pub fn get_config_path() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "punch-clock")
        .context("Could not determine the user config directory")?;
    Ok(dirs.config_dir().join("config.toml"))
}

/// Example configuration written by `punch-clock init`
pub const EXAMPLE_CONFIG: &str = r#"# Punch clock configuration
#
# Credentials can also be provided with the PUNCH_CLOCK_SERVICE_ID,
# PUNCH_CLOCK_TEMPLATE_ID, PUNCH_CLOCK_PUBLIC_KEY and PUNCH_CLOCK_PRIVATE_KEY
# environment variables, which take precedence over this file.

[delivery]
service_id = ""
template_id = ""
public_key = ""
# private_key = ""
# endpoint = "https://api.emailjs.com/api/v1.0/email/send"
# timeout_secs = 30

[tracker]
# timezone = "America/New_York"

[logging]
# level = "info"
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn valid_config() -> Config {
        Config {
            delivery: DeliveryConfig {
                service_id: "service_abc".to_string(),
                template_id: "template_abc".to_string(),
                public_key: "pk_abcdef".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn create_temp_toml_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn default_values() {
        let config = Config::default();
        assert_eq!(config.delivery.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.delivery.timeout_secs, 30);
        assert_eq!(config.tracker.timezone, "America/New_York");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn example_config_parses_to_defaults() {
        let config = Config::from_toml_str(EXAMPLE_CONFIG).unwrap();
        assert!(config.delivery.service_id.is_empty());
        assert_eq!(config.delivery.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.tracker.timezone, "America/New_York");
        assert!(config.validate(false).is_ok());
        assert!(config.validate(true).is_err());
    }

    #[test]
    fn load_from_file() {
        let file = create_temp_toml_config(
            r#"
[delivery]
service_id = "service_1"
template_id = "template_1"
public_key = "key_1"

[tracker]
timezone = "Europe/Berlin"
"#,
        );

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.delivery.service_id, "service_1");
        assert_eq!(config.tracker.timezone, "Europe/Berlin");
        assert!(config.validate(true).is_ok());
    }

    #[test]
    fn load_rejects_malformed_toml() {
        let file = create_temp_toml_config("[delivery\nservice_id = ");
        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn load_or_default_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(config.delivery.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let mut config = valid_config();
        let env: HashMap<&str, &str> = [
            (ENV_SERVICE_ID, "service_env"),
            (ENV_PRIVATE_KEY, "private_env"),
        ]
        .into_iter()
        .collect();

        config.apply_env_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.delivery.service_id, "service_env");
        assert_eq!(config.delivery.template_id, "template_abc");
        assert_eq!(config.delivery.private_key.as_deref(), Some("private_env"));
    }

    #[test]
    fn validate_reports_missing_credentials() {
        let mut config = valid_config();
        config.delivery.template_id.clear();

        let err = config.validate(true).unwrap_err().to_string();
        assert!(err.contains("delivery.template_id"));
        assert!(!err.contains("delivery.service_id"));
    }

    #[test]
    fn validate_requires_https() {
        let mut config = valid_config();
        config.delivery.endpoint = "http://api.emailjs.com/api/v1.0/email/send".to_string();
        assert!(config.validate(true).is_err());
    }

    #[test]
    fn validate_rejects_unknown_timezone() {
        let mut config = valid_config();
        config.tracker.timezone = "Eastern".to_string();
        assert!(config.validate(true).is_err());
    }

    #[test]
    fn tick_setting_is_rejected() {
        // The counter is whole seconds; a faster tick would inflate durations
        let file = create_temp_toml_config("[tracker]\ntick_millis = 250\n");
        let err = Config::load(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("tick_millis"));
    }

    #[test]
    fn redacted_masks_keys() {
        let mut config = valid_config();
        config.delivery.private_key = Some("supersecret".to_string());

        let redacted = config.redacted();
        assert_eq!(redacted.delivery.public_key, "pk_***");
        assert_eq!(redacted.delivery.private_key.as_deref(), Some("sup***"));
        assert_eq!(redacted.delivery.service_id, "service_abc");
    }
}
