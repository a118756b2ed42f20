//! Weather collaborator seam.
//!
//! Acquisition of raw weather data lives outside the scheduling core; the
//! core only depends on this trait. The `sim` build ships a deterministic
//! clear-sky-shaped provider so the binary runs end-to-end without an
//! external service.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::WeatherSample;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Hourly samples in ascending timestamp order for the requested
    /// horizon. Empty or partial results are valid and must be handled by
    /// the caller without failing.
    async fn fetch_forecast(
        &self,
        latitude: f64,
        longitude: f64,
        hours: u32,
    ) -> Result<Vec<WeatherSample>>;
}

#[cfg(feature = "sim")]
pub use sim::SimulatedWeatherProvider;

#[cfg(feature = "sim")]
mod sim {
    use super::*;
    use crate::solar::solar_position;
    use chrono::{DateTime, Duration, FixedOffset, Local, Timelike};
    use rand::{Rng, SeedableRng};

    /// Deterministic weather generator with a clear-sky irradiance shape
    /// and seeded cloud noise.
    pub struct SimulatedWeatherProvider {
        pub base_temperature_c: f64,
        pub seed: u64,
    }

    impl Default for SimulatedWeatherProvider {
        fn default() -> Self {
            Self {
                base_temperature_c: 15.0,
                seed: 42,
            }
        }
    }

    impl SimulatedWeatherProvider {
        fn start_hour() -> DateTime<FixedOffset> {
            let now = Local::now().fixed_offset();
            let tz = *now.offset();
            now.date_naive()
                .and_hms_opt(now.hour(), 0, 0)
                .expect("valid hour")
                .and_local_timezone(tz)
                .unwrap()
        }
    }

    /// Simplified Kasten-Young clear-sky irradiance for an elevation angle.
    fn clear_sky_irradiance(elevation_deg: f64) -> f64 {
        if elevation_deg <= 0.0 {
            return 0.0;
        }
        let elevation = elevation_deg.to_radians();
        let air_mass = if elevation_deg > 5.0 {
            1.0 / elevation.sin()
        } else {
            // Approximate for very low angles to avoid the singularity
            12.0 - elevation_deg / 5.0
        };
        let transmittance = 0.7_f64.powf(air_mass.powf(0.678));
        1367.0 * transmittance * elevation.sin()
    }

    #[async_trait]
    impl WeatherProvider for SimulatedWeatherProvider {
        async fn fetch_forecast(
            &self,
            latitude: f64,
            longitude: f64,
            hours: u32,
        ) -> Result<Vec<WeatherSample>> {
            let mut rng = rand::rngs::StdRng::seed_from_u64(self.seed);
            let start = Self::start_hour();

            let samples = (0..hours as i64)
                .map(|h| {
                    let timestamp = start + Duration::hours(h);
                    let position = solar_position(latitude, longitude, timestamp);
                    let hour = timestamp.hour() as f64;
                    // Mild diurnal temperature swing around the base
                    let temperature_c = self.base_temperature_c
                        + 5.0 * ((hour - 14.0) / 24.0 * std::f64::consts::TAU).cos();
                    WeatherSample {
                        timestamp,
                        temperature_c,
                        cloud_cover_percent: rng.gen_range(0.0..60.0),
                        wind_speed_ms: rng.gen_range(0.5..8.0),
                        irradiance_wm2: clear_sky_irradiance(position.elevation_deg),
                    }
                })
                .collect();
            Ok(samples)
        }
    }

}
