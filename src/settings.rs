//! Runtime settings: compiled-in defaults, overridable through `WST_*`
//! environment variables (a `.env` file is loaded by `main` first).

use std::ffi::OsStr;
use std::path::PathBuf;
use std::time::Duration;

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

use crate::journal::log_file_path;
use crate::market_data::adapters::cryptsy::{RetryPolicy, DEFAULT_API_URL, DOGE_MARKET_ID};
use crate::market_data::normaliser::MAX_DECIMALS;

pub const ENV_PREFIX: &str = "WST";
pub const DEFAULT_MARKET_CODE: &str = "DOGE";
pub const DEFAULT_LOG_FILE_NAME: &str = ".wst_log";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub api_url: String,
    pub market_id: u32,
    pub market_code: String,
    pub retry_attempts: u32,
    pub retry_delay_ms: u64,
    pub log_file_name: String,
    pub log_enabled: bool,
    pub log_filter: String,
    pub price_decimals: u32,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_env(Environment::with_prefix(ENV_PREFIX))
    }

    pub fn from_env(env: Environment) -> Result<Self, ConfigError> {
        let settings: Self = Config::builder()
            .set_default("api_url", DEFAULT_API_URL)?
            .set_default("market_id", i64::from(DOGE_MARKET_ID))?
            .set_default("market_code", DEFAULT_MARKET_CODE)?
            .set_default("retry_attempts", 5i64)?
            .set_default("retry_delay_ms", 5_000i64)?
            .set_default("log_file_name", DEFAULT_LOG_FILE_NAME)?
            .set_default("log_enabled", true)?
            .set_default("log_filter", "info")?
            .set_default("price_decimals", 8i64)?
            .add_source(env.try_parsing(true))
            .build()?
            .try_deserialize()?;

        if settings.price_decimals > MAX_DECIMALS {
            return Err(ConfigError::Message(format!(
                "price_decimals must be at most {}, got {}",
                MAX_DECIMALS, settings.price_decimals
            )));
        }
        Ok(settings)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            attempts: self.retry_attempts,
            delay: Duration::from_millis(self.retry_delay_ms),
        }
    }

    pub fn log_path(&self, home: Option<&OsStr>) -> PathBuf {
        log_file_path(home, &self.log_file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_with(vars: &[(&str, &str)]) -> Environment {
        let mut map = ::config::Map::new();
        for (k, v) in vars {
            map.insert(k.to_string(), v.to_string());
        }
        Environment::with_prefix(ENV_PREFIX).source(Some(map))
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_env(env_with(&[])).unwrap();
        assert_eq!(settings.api_url, DEFAULT_API_URL);
        assert_eq!(settings.market_id, 132);
        assert_eq!(settings.market_code, "DOGE");
        assert!(settings.log_enabled);
        assert_eq!(settings.price_decimals, 8);
        assert_eq!(
            settings.retry_policy(),
            RetryPolicy { attempts: 5, delay: Duration::from_secs(5) }
        );
        assert_eq!(settings.log_path(Some(OsStr::new("/home/doge"))), PathBuf::from("/home/doge/.wst_log"));
    }

    #[test]
    fn test_env_overrides() {
        let settings = Settings::from_env(env_with(&[
            ("WST_MARKET_ID", "3"),
            ("WST_MARKET_CODE", "LTC"),
            ("WST_RETRY_ATTEMPTS", "2"),
            ("WST_RETRY_DELAY_MS", "250"),
            ("WST_LOG_ENABLED", "false"),
        ]))
        .unwrap();
        assert_eq!(settings.market_id, 3);
        assert_eq!(settings.market_code, "LTC");
        assert!(!settings.log_enabled);
        assert_eq!(
            settings.retry_policy(),
            RetryPolicy { attempts: 2, delay: Duration::from_millis(250) }
        );
    }

    #[test]
    fn test_price_decimals_limit() {
        let settings = Settings::from_env(env_with(&[("WST_PRICE_DECIMALS", "18")])).unwrap();
        assert_eq!(settings.price_decimals, 18);
        assert!(Settings::from_env(env_with(&[("WST_PRICE_DECIMALS", "19")])).is_err());
    }

    #[test]
    fn test_bad_override_is_an_error() {
        assert!(Settings::from_env(env_with(&[("WST_MARKET_ID", "doge")])).is_err());
    }
}
