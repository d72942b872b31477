use std::{env, sync::Arc};

use crate::config::Config;

pub trait ConfigService: Send + Sync {
    fn port(&self) -> u16;
    fn values(&self) -> &Config;
}

pub struct ConfigServiceImpl {
    config: Arc<Config>,
}

impl ConfigServiceImpl {
    fn strip_wrapping_quotes(value: &str) -> &str {
        let quoted = |q: char| value.len() >= 2 && value.starts_with(q) && value.ends_with(q);
        if quoted('"') || quoted('\'') {
            return &value[1..value.len() - 1];
        }
        value
    }

    fn nonempty(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
        lookup(key).and_then(|value| {
            let normalized = Self::strip_wrapping_quotes(value.trim()).trim();
            if normalized.is_empty() {
                None
            } else {
                Some(normalized.to_string())
            }
        })
    }

    fn parsed<T: std::str::FromStr>(
        lookup: &impl Fn(&str) -> Option<String>,
        key: &str,
    ) -> Option<T> {
        let raw = Self::nonempty(lookup, key)?;
        match raw.parse::<T>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(key, value = %raw, "config: ignoring unparsable value");
                None
            }
        }
    }

    pub fn new() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup; `new` reads the process
    /// environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = Self::nonempty(&lookup, "HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = Self::parsed::<u16>(&lookup, "PORT").unwrap_or(8080);
        let database_url = Self::nonempty(&lookup, "DATABASE_URL");
        let db_max_connections = Self::parsed::<u32>(&lookup, "DB_MAX_CONNECTIONS")
            .filter(|max| *max > 0)
            .unwrap_or(10);
        let db_connect_timeout_seconds =
            Self::parsed::<u64>(&lookup, "DB_CONNECT_TIMEOUT_SECONDS").unwrap_or(8);
        let log_json = Self::nonempty(&lookup, "LOG_FORMAT")
            .map(|value| value.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Self {
            config: Arc::new(Config {
                host,
                port,
                database_url,
                db_max_connections,
                db_connect_timeout_seconds,
                log_json,
            }),
        }
    }

    pub fn from_config(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

impl Default for ConfigServiceImpl {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigService for ConfigServiceImpl {
    fn port(&self) -> u16 {
        self.config.port
    }

    fn values(&self) -> &Config {
        &self.config
    }
}
