//! Long-running loops around the batch jobs.
//!
//! The hourly refresh runs on a fixed interval; the daily pass computes
//! its next fire time against the wall clock and sleeps until then. Both
//! loops stop between runs when the cancellation token fires, so an
//! in-flight batch always finishes before exit.

use chrono::{DateTime, Duration, FixedOffset, Local};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::Jobs;
use crate::config::SchedulerConfig;

pub fn spawn_job_loops(
    jobs: Arc<Jobs>,
    cfg: &SchedulerConfig,
    shutdown: CancellationToken,
) -> Vec<JoinHandle<()>> {
    vec![
        tokio::spawn(hourly_loop(
            jobs.clone(),
            cfg.hourly_interval_secs,
            shutdown.clone(),
        )),
        tokio::spawn(daily_loop(
            jobs,
            cfg.daily_hour,
            cfg.daily_minute,
            shutdown,
        )),
    ]
}

pub async fn hourly_loop(jobs: Arc<Jobs>, interval_secs: u64, shutdown: CancellationToken) {
    let mut interval =
        tokio::time::interval(std::time::Duration::from_secs(interval_secs.max(1)));
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("hourly refresh loop stopping");
                break;
            }
            _ = interval.tick() => {
                let report = jobs.run_hourly_refresh().await;
                info!(
                    households = report.households,
                    succeeded = report.succeeded,
                    failed = report.failed,
                    weather_rows = report.weather_rows,
                    forecast_rows = report.forecast_rows,
                    "hourly refresh complete"
                );
            }
        }
    }
}

pub async fn daily_loop(jobs: Arc<Jobs>, hour: u32, minute: u32, shutdown: CancellationToken) {
    loop {
        let now = Local::now().fixed_offset();
        let next_run = next_fire_time(now, hour, minute);
        let wait = (next_run - now)
            .to_std()
            .unwrap_or(std::time::Duration::from_secs(60));
        info!(next_run = %next_run, "daily recommendation pass scheduled");

        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("daily recommendation loop stopping");
                break;
            }
            _ = tokio::time::sleep(wait) => {
                let report = jobs.run_daily_recommendation_pass().await;
                info!(
                    households = report.households,
                    succeeded = report.succeeded,
                    failed = report.failed,
                    devices_evaluated = report.devices_evaluated,
                    recommendations_written = report.recommendations_written,
                    "daily recommendation pass complete"
                );
            }
        }
    }
}

/// Next wall-clock occurrence of `hour:minute` strictly after `now`.
pub fn next_fire_time(now: DateTime<FixedOffset>, hour: u32, minute: u32) -> DateTime<FixedOffset> {
    let tz = *now.offset();
    let today = now
        .date_naive()
        .and_hms_opt(hour.min(23), minute.min(59), 0)
        .expect("valid wall-clock time")
        .and_local_timezone(tz)
        .unwrap();

    if today > now {
        today
    } else {
        today + Duration::days(1)
    }
}
