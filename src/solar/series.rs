//! Builds an hourly PV forecast series from weather samples.

use super::output::calculate_pv_output;
use crate::domain::{PvForecastPoint, PvSystemConfig, WeatherSample};

/// Map an ordered sequence of hourly weather samples through the PV model.
///
/// Timestamps are copied verbatim from the source samples; an empty input
/// yields an empty series.
pub fn build_forecast_series(
    system: &PvSystemConfig,
    samples: &[WeatherSample],
) -> Vec<PvForecastPoint> {
    samples
        .iter()
        .map(|sample| {
            let estimate = calculate_pv_output(system, sample);
            PvForecastPoint {
                timestamp: sample.timestamp,
                ac_kw: estimate.ac_kw,
                dc_kw: estimate.dc_kw,
                efficiency: estimate.efficiency,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset, TimeZone};

    fn system() -> PvSystemConfig {
        PvSystemConfig {
            capacity_kw: 5.0,
            tilt_deg: 30.0,
            azimuth_deg: 180.0,
            latitude: 59.3293,
            longitude: 18.0686,
            system_loss_fraction: 0.14,
        }
    }

    #[test]
    fn test_empty_input_yields_empty_series() {
        assert!(build_forecast_series(&system(), &[]).is_empty());
    }

    #[test]
    fn test_series_parallels_input() {
        let start = FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2024, 6, 21, 0, 0, 0)
            .unwrap();
        let samples: Vec<WeatherSample> = (0..24)
            .map(|h| WeatherSample {
                timestamp: start + Duration::hours(h),
                temperature_c: 18.0,
                cloud_cover_percent: 20.0,
                wind_speed_ms: 3.0,
                irradiance_wm2: 750.0,
            })
            .collect();

        let series = build_forecast_series(&system(), &samples);

        assert_eq!(series.len(), samples.len());
        for (point, sample) in series.iter().zip(&samples) {
            assert_eq!(point.timestamp, sample.timestamp);
        }
        // Midsummer day in Stockholm: something must be produced at noon
        assert!(series[12].ac_kw > 0.0);
        assert_eq!(series[0].ac_kw, 0.0);
    }
}
