use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Seconds between reminder ticks while nagging is active.
pub const DEFAULT_NAG_INTERVAL_SECS: u64 = 3;

/// Top-level config (orderbot.toml + ORDERBOT_* env overrides).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderbotConfig {
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub nag: NagConfig,
    #[serde(default)]
    pub channel: ChannelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// The bot's own roster identity — excluded from all roster-derived
    /// checks so the bot never nags or summarizes itself.
    #[serde(default = "default_nick")]
    pub nick: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            nick: default_nick(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NagConfig {
    #[serde(default = "default_nag_interval")]
    pub interval_secs: u64,
}

impl Default for NagConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_nag_interval(),
        }
    }
}

/// Console channel settings. A real chat transport would take credentials
/// here instead; the console adapter reads its roster from config.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ChannelConfig {
    #[serde(default)]
    pub roster: Vec<String>,
}

fn default_nick() -> String {
    "orderbot".to_string()
}

fn default_nag_interval() -> u64 {
    DEFAULT_NAG_INTERVAL_SECS
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.orderbot/orderbot.toml", home)
}

impl OrderbotConfig {
    /// Load config from a TOML file with ORDERBOT_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. ~/.orderbot/orderbot.toml
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: OrderbotConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("ORDERBOT_").split("_"))
            .extract()
            .map_err(|e| crate::error::OrderbotError::Config(e.to_string()))?;

        Ok(config)
    }
}
