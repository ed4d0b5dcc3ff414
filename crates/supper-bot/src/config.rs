//! Runtime settings, loaded from an optional `supper-bot.{toml,yaml,json}` file
//! and `SUPPER_BOT__SECTION__KEY` environment variables.

use ::config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const ENV_PREFIX: &str = "SUPPER_BOT";
pub const CONFIG_FILE: &str = "supper-bot";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to build config: {0}")]
    Build(String),
    #[error("Failed to deserialize config: {0}")]
    Deserialize(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConversationConfig {
    /// Silence after which a conversation is dropped.
    pub idle_timeout_secs: u64,
    pub mailbox_buffer: usize,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: 600,
            mailbox_buffer: 64,
        }
    }
}

impl ConversationConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    /// Shared by the menu and branding caches.
    pub cache_ttl_secs: u64,
    /// Unit price used when neither the selection nor a fresh menu has one.
    pub fallback_unit_price: f64,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: 300,
            fallback_unit_price: 8.0,
        }
    }
}

impl MenuConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PaymentConfig {
    pub qr_image_path: PathBuf,
    pub receipt_dir: PathBuf,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            qr_image_path: PathBuf::from("data/qr.png"),
            receipt_dir: PathBuf::from("data/payment_screenshots"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Directory holding the JSON seed files for the local stores.
    pub dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BotConfig {
    #[serde(default)]
    pub conversation: ConversationConfig,
    #[serde(default)]
    pub menu: MenuConfig,
    #[serde(default)]
    pub payment: PaymentConfig,
    #[serde(default)]
    pub data: DataConfig,
}

impl BotConfig {
    /// Reads `supper-bot.*` from the working directory if present, then the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::build(File::with_name(CONFIG_FILE).required(false))
    }

    /// Same as [`BotConfig::load`] with an explicit file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::build(File::from(path).required(true))
    }

    fn build<S>(file: S) -> Result<Self, ConfigError>
    where
        S: ::config::Source + Send + Sync + 'static,
    {
        Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ConfigError::Build(e.to_string()))?
            .try_deserialize()
            .map_err(|e| ConfigError::Deserialize(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_operating_values() {
        let config = BotConfig::default();
        assert_eq!(config.conversation.idle_timeout(), Duration::from_secs(600));
        assert_eq!(config.menu.cache_ttl(), Duration::from_secs(300));
        assert_eq!(config.menu.fallback_unit_price, 8.0);
        assert_eq!(config.payment.receipt_dir, PathBuf::from("data/payment_screenshots"));
    }

    #[test]
    fn file_overrides_sections_it_names() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[conversation]\nidle_timeout_secs = 30\nmailbox_buffer = 8").unwrap();
        writeln!(file, "[menu]\ncache_ttl_secs = 5\nfallback_unit_price = 7.5").unwrap();

        let config = BotConfig::load_from(file.path()).unwrap();
        assert_eq!(config.conversation.idle_timeout(), Duration::from_secs(30));
        assert_eq!(config.menu.fallback_unit_price, 7.5);
        assert_eq!(config.data.dir, PathBuf::from("data"));
    }
}
