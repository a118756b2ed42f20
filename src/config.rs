use anyhow::Result;
use figment::{providers::{Env, Format, Toml}, Figment};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scheduler: SchedulerConfig,
    pub weather: WeatherConfig,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub hourly_interval_secs: u64,
    pub daily_hour: u32,
    pub daily_minute: u32,
    pub forecast_horizon_hours: u32,
    pub max_concurrent_households: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            hourly_interval_secs: 3600,
            daily_hour: 7,
            daily_minute: 0,
            forecast_horizon_hours: 48,
            max_concurrent_households: 4,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub fetch_attempts: u32,
    pub retry_base_delay_ms: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            fetch_attempts: 3,
            retry_base_delay_ms: 250,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub assumed_daily_consumption_kwh: f64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            assumed_daily_consumption_kwh: crate::scheduler::metrics::ASSUMED_DAILY_CONSUMPTION_KWH,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("SLS__").split("__"));
        Ok(figment.extract()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.scheduler.daily_hour, 7);
        assert_eq!(cfg.scheduler.forecast_horizon_hours, 48);
        assert_eq!(cfg.metrics.assumed_daily_consumption_kwh, 15.0);
    }
}
