//! Periodic batch jobs driving the forecast and scheduling pipeline.
//!
//! Per-household failures are contained: they are logged, counted in the
//! returned report and never abort the batch or reach the caller.

pub mod runner;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, FixedOffset, Local, Timelike};
use futures::stream::{self, StreamExt};
use rand::Rng;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration as StdDuration;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::domain::{DailyMetrics, Household};
use crate::scheduler::{
    compute_daily_metrics, persist, search_windows, suitability_profile, synthesize,
};
use crate::solar::build_forecast_series;
use crate::store::Store;
use crate::weather::WeatherProvider;

/// Aggregate outcome of one hourly refresh batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RefreshReport {
    pub households: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub weather_rows: usize,
    pub forecast_rows: usize,
}

/// Aggregate outcome of one daily recommendation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendationReport {
    pub households: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub devices_evaluated: usize,
    pub recommendations_written: usize,
}

/// Stateless job executor; all collaborators are injected once at startup.
pub struct Jobs {
    store: Arc<dyn Store>,
    weather: Arc<dyn WeatherProvider>,
    cfg: Config,
}

impl Jobs {
    pub fn new(store: Arc<dyn Store>, weather: Arc<dyn WeatherProvider>, cfg: Config) -> Self {
        Self {
            store,
            weather,
            cfg,
        }
    }

    /// Refresh weather and PV forecasts for every known household.
    ///
    /// Upserts are insert-if-absent, so rerunning with identical weather
    /// writes no duplicate rows.
    pub async fn run_hourly_refresh(&self) -> RefreshReport {
        let households = match self.store.list_households().await {
            Ok(households) => households,
            Err(e) => {
                error!(error = %e, "listing households failed, skipping refresh");
                return RefreshReport::default();
            }
        };

        let mut report = RefreshReport {
            households: households.len(),
            ..Default::default()
        };

        let outcomes = stream::iter(
            households
                .into_iter()
                .map(|household| self.refresh_one(household)),
        )
        .buffer_unordered(self.cfg.scheduler.max_concurrent_households.max(1))
        .collect::<Vec<_>>()
        .await;

        for (household_id, outcome) in outcomes {
            match outcome {
                Ok((weather_rows, forecast_rows)) => {
                    report.succeeded += 1;
                    report.weather_rows += weather_rows;
                    report.forecast_rows += forecast_rows;
                }
                Err(e) => {
                    report.failed += 1;
                    warn!(household = %household_id, error = %e, "hourly refresh failed");
                }
            }
        }
        report
    }

    async fn refresh_one(&self, household: Household) -> (Uuid, Result<(usize, usize)>) {
        let household_id = household.id;
        (household_id, self.refresh_household(&household).await)
    }

    async fn refresh_household(&self, household: &Household) -> Result<(usize, usize)> {
        household.validate()?;

        let horizon = self.cfg.scheduler.forecast_horizon_hours;
        let samples = with_retry(
            self.cfg.weather.fetch_attempts,
            StdDuration::from_millis(self.cfg.weather.retry_base_delay_ms),
            || {
                self.weather.fetch_forecast(
                    household.pv_system.latitude,
                    household.pv_system.longitude,
                    horizon,
                )
            },
        )
        .await?;

        if samples.is_empty() {
            debug!(household = %household.id, "weather provider returned no samples");
            return Ok((0, 0));
        }

        let series = build_forecast_series(&household.pv_system, &samples);
        let weather_rows = self
            .store
            .upsert_weather_hourly(household.id, &samples)
            .await?;
        let forecast_rows = self
            .store
            .upsert_pv_forecast_hourly(household.id, &series)
            .await?;
        Ok((weather_rows, forecast_rows))
    }

    /// Regenerate the top recommendation for every flexible device of
    /// every household. Devices are processed in device-list order.
    pub async fn run_daily_recommendation_pass(&self) -> RecommendationReport {
        let households = match self.store.list_households().await {
            Ok(households) => households,
            Err(e) => {
                error!(error = %e, "listing households failed, skipping recommendations");
                return RecommendationReport::default();
            }
        };

        let mut report = RecommendationReport {
            households: households.len(),
            ..Default::default()
        };

        let outcomes = stream::iter(
            households
                .into_iter()
                .map(|household| self.recommend_one(household)),
        )
        .buffer_unordered(self.cfg.scheduler.max_concurrent_households.max(1))
        .collect::<Vec<_>>()
        .await;

        for (household_id, outcome) in outcomes {
            match outcome {
                Ok((evaluated, written)) => {
                    report.succeeded += 1;
                    report.devices_evaluated += evaluated;
                    report.recommendations_written += written;
                }
                Err(e) => {
                    report.failed += 1;
                    warn!(household = %household_id, error = %e, "recommendation pass failed");
                }
            }
        }
        report
    }

    async fn recommend_one(&self, household: Household) -> (Uuid, Result<(usize, usize)>) {
        let household_id = household.id;
        (household_id, self.recommend_household(&household).await)
    }

    async fn recommend_household(&self, household: &Household) -> Result<(usize, usize)> {
        let devices = self.store.list_flexible_devices(household.id).await?;
        if devices.is_empty() {
            return Ok((0, 0));
        }

        let now = Local::now().fixed_offset();
        let profile_start = truncate_to_hour(now);
        let forecast = self
            .store
            .list_pv_forecast(household.id, profile_start, profile_start + Duration::hours(24))
            .await?;
        let profile = suitability_profile(&forecast);

        let mut evaluated = 0;
        let mut written = 0;
        for device in &devices {
            evaluated += 1;
            if let Err(e) = device.validate() {
                warn!(device = %device.id, error = %e, "skipping invalid device");
                continue;
            }

            let candidates = search_windows(device, household, &profile);
            let Some(best) = candidates.first() else {
                debug!(device = %device.id, "no feasible run window");
                continue;
            };

            persist(self.store.as_ref(), synthesize(device, best, now)).await?;
            written += 1;
        }
        Ok((evaluated, written))
    }

    /// Today's solar/grid summary for one household.
    pub async fn compute_daily_metrics(&self, household_id: Uuid) -> Result<DailyMetrics> {
        let household = self
            .store
            .get_household(household_id)
            .await?
            .ok_or_else(|| anyhow!("household {household_id} not found"))?;

        let now = Local::now().fixed_offset();
        let day_start = start_of_day(now);
        let day_end = day_start + Duration::days(1);

        let forecast = self
            .store
            .list_pv_forecast(household_id, day_start, day_end)
            .await?;
        let readings = self
            .store
            .get_meter_readings(household_id, day_start, day_end)
            .await?;

        Ok(compute_daily_metrics(
            &household,
            &forecast,
            &readings,
            self.cfg.metrics.assumed_daily_consumption_kwh,
        ))
    }
}

pub(crate) fn truncate_to_hour(ts: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    let tz = *ts.offset();
    ts.date_naive()
        .and_hms_opt(ts.hour(), 0, 0)
        .expect("valid hour")
        .and_local_timezone(tz)
        .unwrap()
}

pub(crate) fn start_of_day(ts: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    let tz = *ts.offset();
    ts.date_naive()
        .and_hms_opt(0, 0, 0)
        .expect("midnight exists")
        .and_local_timezone(tz)
        .unwrap()
}

/// Bounded retry with jittered exponential backoff for transient
/// collaborator failures.
async fn with_retry<T, F, Fut>(attempts: u32, base_delay: StdDuration, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = attempts.max(1);
    let mut last_error = None;
    for attempt in 0..attempts {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                if attempt + 1 < attempts {
                    let backoff = base_delay * 2u32.pow(attempt);
                    let jitter_ms =
                        rand::thread_rng().gen_range(0..=base_delay.as_millis().max(1) as u64);
                    debug!(attempt, error = %e, "retrying after transient failure");
                    tokio::time::sleep(backoff + StdDuration::from_millis(jitter_ms)).await;
                }
                last_error = Some(e);
            }
        }
    }
    Err(last_error.unwrap_or_else(|| anyhow!("retry attempts exhausted")))
}
