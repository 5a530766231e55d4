//! Runtime knobs read from the environment.
//!
//! Binaries are expected to call `dotenv::dotenv()` before [`BattleConfig::from_env`]
//! so a local `.env` file can supply the same keys.
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_ORACLE_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

#[derive(Clone, Debug)]
pub struct BattleConfig {
    /// Upper bound on a single oracle call. Elapsing takes the failure fallback.
    pub oracle_timeout: Duration,
    /// Pause between opening the opponent's decision window and asking the oracle.
    pub think_delay: Duration,
    /// Fixed seed for the shared random source; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            oracle_timeout: DEFAULT_ORACLE_TIMEOUT,
            think_delay: Duration::ZERO,
            seed: None,
        }
    }
}

impl BattleConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(ms) = parse_var::<u64>("BATTLE_ORACLE_TIMEOUT_MS")? {
            config.oracle_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var::<u64>("BATTLE_THINK_DELAY_MS")? {
            config.think_delay = Duration::from_millis(ms);
        }
        config.seed = parse_var::<u64>("BATTLE_SEED")?;
        Ok(config)
    }
}

#[derive(Clone, Debug)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
}

impl GeminiConfig {
    /// Returns `None` when no API key is configured.
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("GEMINI_API_KEY")
            .or_else(|_| env::var("API_KEY"))
            .ok()
            .filter(|key| !key.trim().is_empty())?;
        let model = env::var("GEMINI_MODEL")
            .ok()
            .filter(|model| !model.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());
        Some(Self { api_key, model })
    }
}

fn parse_var<T: FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(None),
    }
}
