//! Turns the best-ranked window into a persisted recommendation.

use anyhow::Result;
use chrono::{DateTime, Duration, FixedOffset, Timelike};
use tracing::debug;
use uuid::Uuid;

use super::window::CandidateWindow;
use crate::domain::{Device, Recommendation};
use crate::store::Store;

/// Format the human-readable justification for a recommended window.
///
/// Three tiers keyed on average solar output; the lowest tier keeps a
/// positive framing even when little solar is available.
pub fn build_reason(
    device_name: &str,
    start_hour: u32,
    end_hour: u32,
    avg_solar_kw: f64,
    estimated_savings: f64,
    estimated_co2_kg: f64,
) -> String {
    let quality = if avg_solar_kw > 2.0 {
        format!("peak solar production (avg {avg_solar_kw:.1} kW)")
    } else if avg_solar_kw > 1.0 {
        format!("good solar availability (avg {avg_solar_kw:.1} kW)")
    } else {
        "optimal timing for solar usage".to_string()
    };

    format!(
        "Run {device_name} between {start_hour:02}:00 and {end_hour:02}:00 to benefit from \
         {quality}. Estimated savings: {estimated_savings:.2}, CO2 avoided: {estimated_co2_kg:.2} kg."
    )
}

/// Build the recommendation record for a device's best window.
///
/// `start_ts` is the next occurrence of the window's start hour on the
/// local clock; `end_ts` always lies `duration` hours later, crossing
/// midnight for overnight windows.
pub fn synthesize(device: &Device, window: &CandidateWindow, now: DateTime<FixedOffset>) -> Recommendation {
    let start_ts = next_occurrence(now, window.start_hour);
    let end_ts = start_ts + Duration::hours(window.duration_hours as i64);

    Recommendation {
        id: Uuid::new_v4(),
        device_id: device.id,
        start_ts,
        end_ts,
        reason: build_reason(
            &device.name,
            window.start_hour,
            window.end_hour,
            window.avg_solar_kw,
            window.estimated_savings,
            window.estimated_co2_kg,
        ),
        estimated_savings: window.estimated_savings,
        estimated_co2_kg: window.estimated_co2_kg,
        created_at: now,
    }
}

/// Persist a recommendation, superseding any prior one for the device.
pub async fn persist(store: &dyn Store, recommendation: Recommendation) -> Result<()> {
    let superseded = store
        .delete_recommendations_for_device(recommendation.device_id)
        .await?;
    if superseded > 0 {
        debug!(
            device = %recommendation.device_id,
            superseded,
            "replaced stale recommendations"
        );
    }
    store.create_recommendation(recommendation).await?;
    Ok(())
}

fn next_occurrence(now: DateTime<FixedOffset>, hour: u32) -> DateTime<FixedOffset> {
    let tz = *now.offset();
    let at_hour = now
        .date_naive()
        .and_hms_opt(hour, 0, 0)
        .expect("start hour is a valid wall-clock hour")
        .and_local_timezone(tz)
        .unwrap();

    if at_hour < now && at_hour.hour() != now.hour() {
        at_hour + Duration::days(1)
    } else {
        at_hour
    }
}
