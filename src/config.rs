use serde::Deserialize;
use std::time::Duration;

const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listen_addr: String,
    /// How long shutdown waits for in-flight connections. `None` waits forever.
    #[serde(with = "secs")]
    pub shutdown_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            shutdown_timeout: None,
        }
    }
}

impl Config {
    /// Loads configuration from the process environment.
    ///
    /// `WAYPOINT_CONFIG` may point at a YAML file used as the base; `LISTEN`
    /// and `SHUTDOWN_TIMEOUT_SECS` override it.
    pub fn load() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = match lookup("WAYPOINT_CONFIG") {
            Some(path) => {
                let text = std::fs::read_to_string(&path)
                    .map_err(|e| anyhow::anyhow!("reading config {}: {}", path, e))?;
                Self::from_yaml(&text)?
            }
            None => Self::default(),
        };

        if let Some(addr) = lookup("LISTEN") {
            cfg.listen_addr = addr;
        }

        if let Some(secs) = lookup("SHUTDOWN_TIMEOUT_SECS") {
            match secs.trim().parse::<u64>() {
                Ok(0) => cfg.shutdown_timeout = None,
                Ok(n) => cfg.shutdown_timeout = Some(Duration::from_secs(n)),
                Err(_) => tracing::warn!(value = %secs, "Ignoring invalid SHUTDOWN_TIMEOUT_SECS"),
            }
        }

        Ok(cfg)
    }

    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }
}

mod secs {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.filter(|s| *s > 0).map(Duration::from_secs))
    }
}
