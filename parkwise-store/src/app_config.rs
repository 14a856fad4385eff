use parkwise_catalog::Tariff;
use parkwise_shared::Masked;
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub lot: LotConfig,
    #[serde(default)]
    pub tariff: Tariff,
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub ticker: TickerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LotConfig {
    #[serde(default = "default_total_spots")]
    pub total_spots: usize,
    #[serde(default = "default_available_probability")]
    pub available_probability: f64,
    /// Fixed seed for the initial occupancy draw; random when absent
    pub seed: Option<u64>,
}

fn default_total_spots() -> usize { 50 }
fn default_available_probability() -> f64 { 0.7 }

impl Default for LotConfig {
    fn default() -> Self {
        Self {
            total_spots: default_total_spots(),
            available_probability: default_available_probability(),
            seed: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AssistantConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Without a key every chat message is answered with the fallback text
    pub api_key: Option<Masked<String>>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: usize,
    #[serde(default = "default_reset_seconds")]
    pub reset_seconds: u64,
}

fn default_model() -> String { "gemini-2.5-flash".to_string() }
fn default_api_url() -> String { "https://generativelanguage.googleapis.com".to_string() }
fn default_timeout_seconds() -> u64 { 20 }
fn default_failure_threshold() -> usize { 3 }
fn default_reset_seconds() -> u64 { 30 }

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_url: default_api_url(),
            api_key: None,
            timeout_seconds: default_timeout_seconds(),
            failure_threshold: default_failure_threshold(),
            reset_seconds: default_reset_seconds(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct TickerConfig {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

fn default_interval_ms() -> u64 { 1000 }

impl Default for TickerConfig {
    fn default() -> Self {
        Self { interval_ms: default_interval_ms() }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. `PARKWISE__ASSISTANT__API_KEY=...`
            .add_source(config::Environment::with_prefix("PARKWISE").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    pub fn from_toml(source: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}
