//! Hourly PV power estimation from weather and system parameters.

use serde::{Deserialize, Serialize};

use super::irradiance::plane_of_array_irradiance;
use super::position::solar_position;
use crate::domain::{PvSystemConfig, WeatherSample};

/// Standard test condition irradiance.
pub const STC_IRRADIANCE_WM2: f64 = 1000.0;

/// Fraction of incident irradiance removed under full overcast. Residual
/// diffuse light keeps 25% of the clear-sky signal even at 100% cloud.
pub const CLOUD_ATTENUATION_FACTOR: f64 = 0.75;

/// Linear power-temperature coefficient per °C, typical for
/// crystalline-silicon modules.
pub const TEMPERATURE_COEFF_PER_C: f64 = -0.004;

const REFERENCE_CELL_TEMP_C: f64 = 25.0;

/// One hour of estimated PV output, timestamp attached by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PvEstimate {
    pub ac_kw: f64,
    pub dc_kw: f64,
    pub efficiency: f64,
}

/// Estimate PV output for one weather sample.
///
/// Pure function of its inputs: solar geometry, plane-of-array projection,
/// cloud attenuation, temperature derating, then DC→AC conversion through
/// the system loss fraction. Outputs are rounded to 3 decimals.
pub fn calculate_pv_output(system: &PvSystemConfig, sample: &WeatherSample) -> PvEstimate {
    let position = solar_position(system.latitude, system.longitude, sample.timestamp);
    let incident = plane_of_array_irradiance(
        sample.irradiance_wm2,
        &position,
        system.tilt_deg,
        system.azimuth_deg,
    );

    let cloud_fraction = (sample.cloud_cover_percent / 100.0).clamp(0.0, 1.0);
    let effective_wm2 = incident * (1.0 - cloud_fraction * CLOUD_ATTENUATION_FACTOR);
    let irradiance_ratio = (effective_wm2 / STC_IRRADIANCE_WM2).max(0.0);
    let temperature_derate =
        1.0 + TEMPERATURE_COEFF_PER_C * (sample.temperature_c - REFERENCE_CELL_TEMP_C);

    let dc_kw = (system.capacity_kw * irradiance_ratio * temperature_derate).max(0.0);
    let ac_kw = (dc_kw * (1.0 - system.system_loss_fraction)).max(0.0);
    let efficiency = if system.capacity_kw > 0.0 {
        (ac_kw / system.capacity_kw).min(1.0)
    } else {
        0.0
    };

    PvEstimate {
        ac_kw: round3(ac_kw),
        dc_kw: round3(dc_kw),
        efficiency: round3(efficiency),
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset, TimeZone};
    use proptest::prelude::*;

    fn delhi_system() -> PvSystemConfig {
        PvSystemConfig {
            capacity_kw: 5.0,
            tilt_deg: 30.0,
            azimuth_deg: 180.0,
            latitude: 28.6139,
            longitude: 77.2090,
            system_loss_fraction: 0.14,
        }
    }

    fn delhi_noon() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(19800)
            .unwrap()
            .with_ymd_and_hms(2024, 6, 21, 12, 10, 0)
            .unwrap()
    }

    fn sample(
        timestamp: DateTime<FixedOffset>,
        cloud_cover_percent: f64,
        temperature_c: f64,
    ) -> WeatherSample {
        WeatherSample {
            timestamp,
            temperature_c,
            cloud_cover_percent,
            wind_speed_ms: 2.0,
            irradiance_wm2: 800.0,
        }
    }

    #[test]
    fn test_clear_sky_noon_output() {
        let estimate = calculate_pv_output(&delhi_system(), &sample(delhi_noon(), 0.0, 25.0));

        // 800 W/m² near-normal incidence on a 5 kW array with 14% losses
        assert!(
            estimate.ac_kw > 3.0 && estimate.ac_kw < 4.3,
            "ac_kw {}",
            estimate.ac_kw
        );
        assert!(estimate.dc_kw > estimate.ac_kw);
        assert!(estimate.efficiency > 0.0 && estimate.efficiency <= 1.0);
    }

    #[test]
    fn test_full_overcast_keeps_residual_quarter() {
        let clear = calculate_pv_output(&delhi_system(), &sample(delhi_noon(), 0.0, 25.0));
        let overcast = calculate_pv_output(&delhi_system(), &sample(delhi_noon(), 100.0, 25.0));

        let ratio = overcast.ac_kw / clear.ac_kw;
        assert!((ratio - 0.25).abs() < 0.01, "ratio {ratio}");
    }

    #[test]
    fn test_night_output_is_exactly_zero() {
        let midnight = FixedOffset::east_opt(19800)
            .unwrap()
            .with_ymd_and_hms(2024, 6, 21, 0, 0, 0)
            .unwrap();
        let estimate = calculate_pv_output(&delhi_system(), &sample(midnight, 0.0, 20.0));

        assert_eq!(estimate.ac_kw, 0.0);
        assert_eq!(estimate.dc_kw, 0.0);
        assert_eq!(estimate.efficiency, 0.0);
    }

    #[test]
    fn test_heat_derates_output() {
        let mild = calculate_pv_output(&delhi_system(), &sample(delhi_noon(), 0.0, 25.0));
        let hot = calculate_pv_output(&delhi_system(), &sample(delhi_noon(), 0.0, 45.0));
        let cold = calculate_pv_output(&delhi_system(), &sample(delhi_noon(), 0.0, 5.0));

        assert!(hot.ac_kw < mild.ac_kw);
        assert!(cold.ac_kw > mild.ac_kw);
    }

    #[test]
    fn test_zero_capacity_reports_zero_efficiency() {
        let mut system = delhi_system();
        system.capacity_kw = 0.0;
        let estimate = calculate_pv_output(&system, &sample(delhi_noon(), 0.0, 25.0));

        assert_eq!(estimate.efficiency, 0.0);
        assert_eq!(estimate.ac_kw, 0.0);
    }

    #[test]
    fn test_pure_function_bit_identical() {
        let weather = sample(delhi_noon(), 35.0, 29.0);
        let first = calculate_pv_output(&delhi_system(), &weather);
        let second = calculate_pv_output(&delhi_system(), &weather);
        assert_eq!(first, second);
    }

    proptest! {
        #[test]
        fn prop_outputs_within_physical_bounds(
            beam in 0.0f64..1000.0,
            cloud in 0.0f64..100.0,
            temp in -10.0f64..45.0,
            hour in 0u32..24,
        ) {
            let timestamp = FixedOffset::east_opt(3600)
                .unwrap()
                .with_ymd_and_hms(2024, 6, 21, hour, 0, 0)
                .unwrap();
            let weather = WeatherSample {
                timestamp,
                temperature_c: temp,
                cloud_cover_percent: cloud,
                wind_speed_ms: 0.0,
                irradiance_wm2: beam,
            };
            let system = PvSystemConfig {
                capacity_kw: 5.0,
                tilt_deg: 30.0,
                azimuth_deg: 180.0,
                latitude: 59.3293,
                longitude: 18.0686,
                system_loss_fraction: 0.14,
            };
            let estimate = calculate_pv_output(&system, &weather);

            prop_assert!(estimate.ac_kw >= 0.0);
            prop_assert!(estimate.dc_kw >= 0.0);
            prop_assert!(estimate.ac_kw <= estimate.dc_kw + 1e-9);
            prop_assert!((0.0..=1.0).contains(&estimate.efficiency));
        }
    }
}
