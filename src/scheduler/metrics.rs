//! Daily solar/grid summary for a household.

use crate::domain::{DailyMetrics, Household, MeterReading, PvForecastPoint};

/// Baseline daily consumption assumed when no meter readings exist.
pub const ASSUMED_DAILY_CONSUMPTION_KWH: f64 = 15.0;

/// Aggregate one local calendar day of forecast (and optional metering)
/// into solar share, cost savings and avoided emissions.
///
/// Each forecast point is a 1-hour-average kW value, numerically equal to
/// kWh for its hour. Without metering, grid consumption falls back to
/// `max(0, assumed_daily_consumption - solar)`.
pub fn compute_daily_metrics(
    household: &Household,
    forecast_today: &[PvForecastPoint],
    meter_readings: &[MeterReading],
    assumed_daily_consumption_kwh: f64,
) -> DailyMetrics {
    let solar_generated_kwh: f64 = forecast_today.iter().map(|p| p.ac_kw).sum();

    let grid_consumed_kwh = if meter_readings.is_empty() {
        (assumed_daily_consumption_kwh - solar_generated_kwh).max(0.0)
    } else {
        meter_readings.iter().map(|r| r.grid_kwh).sum()
    };

    let total_kwh = solar_generated_kwh + grid_consumed_kwh;
    let renewable_share_pct = if total_kwh > 0.0 {
        100.0 * solar_generated_kwh / total_kwh
    } else {
        0.0
    };

    DailyMetrics {
        solar_generated_kwh: round2(solar_generated_kwh),
        grid_consumed_kwh: round2(grid_consumed_kwh),
        cost_savings: round2(solar_generated_kwh * household.tariff_per_kwh),
        co2_avoided_kg: round2(solar_generated_kwh * household.co2_factor_kg_per_kwh),
        renewable_share_pct: round1(renewable_share_pct),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
