// Configuration for the WhatsApp notification relay
//
// Settings are stored in ~/.funnel-server/config.toml and can be overridden
// by environment variables, which is how deployments inject secrets.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Default number that receives lead notifications
const DEFAULT_NOTIFY_NUMBER: &str = "5547996067992";

/// Default source tag written into captured leads
const DEFAULT_SOURCE: &str = "sites.biomo.com.br";

/// Relay and lead-capture settings from ~/.funnel-server/config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Base URL of the Evolution API instance (empty = relay disabled)
    pub api_url: String,
    /// API key sent in the `apikey` header
    pub api_key: String,
    /// Evolution API instance name
    pub instance: String,
    /// WhatsApp number that receives lead notifications
    pub notify_number: String,
    /// Source tag stamped on captured leads
    pub source: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            api_key: String::new(),
            instance: String::new(),
            notify_number: DEFAULT_NOTIFY_NUMBER.to_string(),
            source: DEFAULT_SOURCE.to_string(),
        }
    }
}

impl RelayConfig {
    /// Get the config file path (~/.funnel-server/config.toml)
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".funnel-server").join("config.toml"))
    }

    /// Load configuration from disk, then apply environment overrides
    pub fn load() -> Result<Self> {
        let path =
            Self::get_config_path().ok_or_else(|| anyhow!("Could not determine home directory"))?;

        let mut config = if path.exists() {
            let contents = fs::read_to_string(&path)
                .map_err(|e| anyhow!("Failed to read config file '{}': {}", path.display(), e))?;
            toml::from_str(&contents)
                .map_err(|e| anyhow!("Failed to parse config file '{}': {}", path.display(), e))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Environment variables take precedence over the file
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("EVOLUTION_API_URL") {
            self.api_url = url;
        }
        if let Ok(key) = std::env::var("EVOLUTION_API_KEY") {
            self.api_key = key;
        }
        if let Ok(instance) = std::env::var("EVOLUTION_INSTANCE") {
            self.instance = instance;
        }
        if let Ok(number) = std::env::var("WHATSAPP_NOTIFY_NUMBER") {
            self.notify_number = number;
        }
    }

    /// True when all relay credentials are present
    pub fn is_configured(&self) -> bool {
        !self.api_url.is_empty() && !self.api_key.is_empty() && !self.instance.is_empty()
    }
}
