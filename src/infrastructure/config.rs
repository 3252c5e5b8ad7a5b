use anyhow::Context;
use chrono_tz::Tz;
use serde::Deserialize;
use std::time::Duration;

use crate::domain::palette::DEFAULT_COLORS;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub gateway: GatewaySettings,
    pub refresh: RefreshSettings,
    pub display: DisplaySettings,
}

impl AppConfig {
    /// Reject values that would stall or crash the service at runtime.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.refresh.interval_secs > 0,
            "refresh.interval_secs must be greater than zero"
        );
        anyhow::ensure!(
            self.gateway.timeout_secs > 0,
            "gateway.timeout_secs must be greater than zero"
        );
        anyhow::ensure!(
            self.refresh.default_period_secs > 0,
            "refresh.default_period_secs must be greater than zero, got {}",
            self.refresh.default_period_secs
        );
        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub listen_addr: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GatewaySettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            base_url: "http://humidity-gateway.local:3001/api".to_string(),
            timeout_secs: 10,
        }
    }
}

impl GatewaySettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RefreshSettings {
    pub interval_secs: u64,
    /// Plot period refreshed even when nobody asked for it yet
    pub default_period_secs: i64,
    pub max_tracked_periods: usize,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            interval_secs: 30,
            default_period_secs: 3 * 24 * 60 * 60,
            max_tracked_periods: 16,
        }
    }
}

impl RefreshSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DisplaySettings {
    /// IANA time zone name used for tick alignment
    pub timezone: String,
    pub palette: Vec<String>,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
            palette: DEFAULT_COLORS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl DisplaySettings {
    pub fn timezone(&self) -> anyhow::Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("Invalid display timezone '{}'", self.timezone))
    }
}

/// Defaults, then `config/dashboard.*` if present, then `SENSOR_PLOT__*` environment variables.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(
            config::Environment::with_prefix("SENSOR_PLOT")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    let config: AppConfig = settings.try_deserialize()?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}
