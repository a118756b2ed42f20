//! Normalizes a PV forecast series into per-hour suitability scores.

use serde::{Deserialize, Serialize};

use crate::domain::PvForecastPoint;

/// Score used when the series carries no discriminating signal (empty or
/// all-zero output): flat neutral, not a measurement.
pub const NEUTRAL_SCORE: f64 = 0.5;

/// Suitability of one hour for running a flexible load, aligned by index
/// with the forecast series it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourSuitability {
    /// Normalized score in [0, 1] relative to the series peak.
    pub score: f64,
    pub solar_kw: f64,
}

/// Score each forecast hour against the series maximum AC output.
pub fn suitability_profile(forecast: &[PvForecastPoint]) -> Vec<HourSuitability> {
    let max_ac = forecast.iter().map(|p| p.ac_kw).fold(0.0, f64::max);

    forecast
        .iter()
        .map(|point| HourSuitability {
            score: if max_ac > 0.0 {
                (point.ac_kw / max_ac).min(1.0)
            } else {
                NEUTRAL_SCORE
            },
            solar_kw: point.ac_kw,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset, TimeZone};

    fn series(values: &[f64]) -> Vec<PvForecastPoint> {
        let start = FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2024, 6, 21, 0, 0, 0)
            .unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, &ac_kw)| PvForecastPoint {
                timestamp: start + Duration::hours(i as i64),
                ac_kw,
                dc_kw: ac_kw / 0.86,
                efficiency: ac_kw / 5.0,
            })
            .collect()
    }

    #[test]
    fn test_scores_normalized_by_peak() {
        let profile = suitability_profile(&series(&[0.0, 1.0, 4.0, 2.0]));

        assert_eq!(profile[0].score, 0.0);
        assert_eq!(profile[1].score, 0.25);
        assert_eq!(profile[2].score, 1.0);
        assert_eq!(profile[3].score, 0.5);
        assert_eq!(profile[2].solar_kw, 4.0);
    }

    #[test]
    fn test_all_zero_series_falls_back_to_neutral() {
        let profile = suitability_profile(&series(&[0.0, 0.0, 0.0]));

        for hour in &profile {
            assert_eq!(hour.score, NEUTRAL_SCORE);
            assert!(!hour.score.is_nan());
        }
    }

    #[test]
    fn test_empty_series_yields_empty_profile() {
        assert!(suitability_profile(&[]).is_empty());
    }
}
