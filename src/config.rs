use anyhow::{Context, Result, bail};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use tracing::Level;

/// Highest per-IP rate the limiter can express: one request per millisecond.
pub const MAX_RATE_PER_MIN: u32 = 60_000;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    pub api_prefix: String,

    // Logging
    pub log_dir: String,
    pub log_level: Level,

    // Rate limiting, 0 disables the limiter
    pub rate_presensi_per_min: u32,

    /// one check-in and one check-out per name and day
    pub enforce_daily_rule: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: "127.0.0.1:8000".to_string(),
            api_prefix: String::new(),
            log_dir: "logs".to_string(),
            log_level: Level::DEBUG,
            rate_presensi_per_min: 600,
            enforce_daily_rule: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let config = Self {
            server_addr: lookup("SERVER_ADDR").unwrap_or(defaults.server_addr),
            api_prefix: lookup("API_PREFIX").unwrap_or(defaults.api_prefix),
            log_dir: lookup("LOG_DIR").unwrap_or(defaults.log_dir),
            log_level: parse_or(&lookup, "LOG_LEVEL", defaults.log_level)?,
            rate_presensi_per_min: parse_or(
                &lookup,
                "RATE_PRESENSI_PER_MIN",
                defaults.rate_presensi_per_min,
            )?,
            enforce_daily_rule: parse_or(&lookup, "ENFORCE_DAILY_RULE", defaults.enforce_daily_rule)?,
        };

        if config.rate_presensi_per_min > MAX_RATE_PER_MIN {
            bail!(
                "RATE_PRESENSI_PER_MIN must be at most {}, got {}",
                MAX_RATE_PER_MIN,
                config.rate_presensi_per_min
            );
        }

        Ok(config)
    }

    pub fn rate_limit_enabled(&self) -> bool {
        self.rate_presensi_per_min > 0
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {:?}", key, raw)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.server_addr, "127.0.0.1:8000");
        assert_eq!(config.api_prefix, "");
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(config.rate_presensi_per_min, 600);
        assert!(!config.enforce_daily_rule);
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("SERVER_ADDR", "0.0.0.0:9000"),
            ("API_PREFIX", "/api"),
            ("LOG_LEVEL", "info"),
            ("RATE_PRESENSI_PER_MIN", "0"),
            ("ENFORCE_DAILY_RULE", "true"),
        ]))
        .unwrap();

        assert_eq!(config.server_addr, "0.0.0.0:9000");
        assert_eq!(config.api_prefix, "/api");
        assert_eq!(config.log_level, Level::INFO);
        assert!(!config.rate_limit_enabled());
        assert!(config.enforce_daily_rule);
    }

    #[test]
    fn rejects_bad_values() {
        let err = Config::from_lookup(lookup(&[("RATE_PRESENSI_PER_MIN", "lots")])).unwrap_err();
        assert!(err.to_string().contains("RATE_PRESENSI_PER_MIN"));

        assert!(Config::from_lookup(lookup(&[("ENFORCE_DAILY_RULE", "yes")])).is_err());
        assert!(Config::from_lookup(lookup(&[("LOG_LEVEL", "loud")])).is_err());
    }

    #[test]
    fn caps_rate_at_one_request_per_ms() {
        let config = Config::from_lookup(lookup(&[("RATE_PRESENSI_PER_MIN", "60000")])).unwrap();
        assert_eq!(config.rate_presensi_per_min, MAX_RATE_PER_MIN);

        let err = Config::from_lookup(lookup(&[("RATE_PRESENSI_PER_MIN", "120000")])).unwrap_err();
        assert!(err.to_string().contains("at most 60000"));
    }
}
