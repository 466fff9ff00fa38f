//! Configuration schema, loading, and persistence.
//!
//! Config lives at `~/.naturewatch/config.toml` unless overridden with
//! `NATUREWATCH_CONFIG_DIR`. Secrets can also arrive via environment
//! variables, which always win over file values.

use anyhow::{Context, Result};
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::agents::ModelSettings;
use crate::routing::AgentKind;

const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Computed at load time, never serialized.
    #[serde(skip)]
    pub config_path: PathBuf,

    pub routing: RoutingConfig,
    pub database: DatabaseConfig,
    pub gateway: GatewayConfig,
    pub chat: ChatConfig,
    pub datasets: DatasetsConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Pin every query to one handler (overrides detection).
    pub force_agent: Option<AgentKind>,
    /// Province used as routing context when a request carries none.
    pub user_province: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// PostGIS connection URL.
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/naturewatch".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8087,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// OpenAI-compatible completions endpoint base URL.
    pub base_url: String,
    pub model: String,
    pub temperature: f64,
    pub api_key: Option<String>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            api_key: None,
        }
    }
}

impl ChatConfig {
    pub fn model_settings(&self) -> ModelSettings {
        ModelSettings {
            model: self.model.clone(),
            temperature: self.temperature,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetsConfig {
    /// eBird API token; without it bird statistics are unavailable.
    pub ebird_api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            routing: RoutingConfig::default(),
            database: DatabaseConfig::default(),
            gateway: GatewayConfig::default(),
            chat: ChatConfig::default(),
            datasets: DatasetsConfig::default(),
        }
    }
}

fn default_config_dir() -> Result<PathBuf> {
    if let Ok(custom) = std::env::var("NATUREWATCH_CONFIG_DIR") {
        let trimmed = custom.trim();
        if !trimmed.is_empty() {
            return Ok(PathBuf::from(shellexpand::tilde(trimmed).into_owned()));
        }
    }

    let home = UserDirs::new()
        .map(|u| u.home_dir().to_path_buf())
        .context("Could not find home directory")?;
    Ok(home.join(".naturewatch"))
}

impl Config {
    /// Load the config file, creating it with defaults on first run.
    pub async fn load_or_init() -> Result<Self> {
        let config_dir = default_config_dir()?;
        Self::load_or_init_in(&config_dir).await
    }

    /// Load or initialize a config rooted at an explicit directory.
    pub async fn load_or_init_in(config_dir: &Path) -> Result<Self> {
        let config_path = config_dir.join(CONFIG_FILE);

        fs::create_dir_all(config_dir).await.with_context(|| {
            format!("Failed to create config directory: {}", config_dir.display())
        })?;

        let mut config = if config_path.exists() {
            let contents = fs::read_to_string(&config_path)
                .await
                .context("Failed to read config file")?;
            let mut config: Config =
                toml::from_str(&contents).context("Failed to parse config file")?;
            config.config_path = config_path;
            config
        } else {
            let mut config = Config::default();
            config.config_path = config_path;
            config.save().await?;
            config
        };

        config.apply_env_overrides();
        config.validate()?;
        tracing::debug!("config loaded from {}", config.config_path.display());
        Ok(config)
    }

    /// Environment variables win over file values.
    pub fn apply_env_overrides(&mut self) {
        for var in ["NATUREWATCH_DATABASE_URL", "DATABASE_URL"] {
            if let Ok(url) = std::env::var(var) {
                if !url.trim().is_empty() {
                    self.database.url = url.trim().to_string();
                    break;
                }
            }
        }

        if let Ok(key) = std::env::var("EBIRD_API_KEY") {
            if !key.trim().is_empty() {
                self.datasets.ebird_api_key = Some(key.trim().to_string());
            }
        }

        if let Ok(key) = std::env::var("NATUREWATCH_API_KEY") {
            if !key.trim().is_empty() {
                self.chat.api_key = Some(key.trim().to_string());
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.database.url.trim().is_empty() {
            anyhow::bail!("database.url must not be empty");
        }
        if !(0.0..=2.0).contains(&self.chat.temperature) {
            anyhow::bail!(
                "chat.temperature must be between 0.0 and 2.0 (got {})",
                self.chat.temperature
            );
        }
        Ok(())
    }

    pub async fn save(&self) -> Result<()> {
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;

        let parent_dir = self
            .config_path
            .parent()
            .context("Config path must have a parent directory")?;
        fs::create_dir_all(parent_dir).await.with_context(|| {
            format!("Failed to create config directory: {}", parent_dir.display())
        })?;

        // Write-then-rename so a crash never leaves a truncated config.
        let temp_path = parent_dir.join(format!(".{CONFIG_FILE}.tmp-{}", uuid::Uuid::new_v4()));
        fs::write(&temp_path, &toml_str)
            .await
            .context("Failed to write config file")?;
        fs::rename(&temp_path, &self.config_path)
            .await
            .context("Failed to replace config file")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.gateway.port, 8087);
        assert!(config.routing.force_agent.is_none());
        assert!(config.chat.api_key.is_none());
    }

    #[test]
    fn temperature_out_of_range_fails_validation() {
        let mut config = Config::default();
        config.chat.temperature = 3.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_database_url_fails_validation() {
        let mut config = Config::default();
        config.database.url = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn config_toml_round_trip() {
        let mut config = Config::default();
        config.routing.force_agent = Some(AgentKind::Ontario);
        config.datasets.ebird_api_key = Some("token".to_string());

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.routing.force_agent, Some(AgentKind::Ontario));
        assert_eq!(parsed.datasets.ebird_api_key.as_deref(), Some("token"));
    }

    #[test]
    fn partial_toml_uses_section_defaults() {
        let parsed: Config = toml::from_str("[gateway]\nport = 9000\n").unwrap();
        assert_eq!(parsed.gateway.port, 9000);
        assert_eq!(parsed.gateway.host, "127.0.0.1");
        assert_eq!(parsed.chat.model, "gpt-4o-mini");
    }

    #[tokio::test]
    async fn load_or_init_creates_and_reloads_config() {
        let tmp = TempDir::new().unwrap();

        let created = Config::load_or_init_in(tmp.path()).await.unwrap();
        assert!(created.config_path.exists());

        let mut modified = created.clone();
        modified.gateway.port = 9100;
        modified.save().await.unwrap();

        let reloaded = Config::load_or_init_in(tmp.path()).await.unwrap();
        assert_eq!(reloaded.gateway.port, 9100);
    }

    #[test]
    fn chat_config_exposes_model_settings() {
        let settings = ChatConfig::default().model_settings();
        assert_eq!(settings.model, "gpt-4o-mini");
        assert_eq!(settings.temperature, 0.7);
    }
}
