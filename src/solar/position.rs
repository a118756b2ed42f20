//! Closed-form solar geometry.

use chrono::{DateTime, Datelike, FixedOffset, Timelike};
use serde::{Deserialize, Serialize};

/// The sun's position as seen from a point on the ground.
///
/// Elevation below the horizon is reported as 0 so downstream power falls
/// to zero without special-casing. Azimuth is measured from north
/// (0 = north, 90 = east, 180 = south) and normalized to [0, 360).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolarPosition {
    pub elevation_deg: f64,
    pub azimuth_deg: f64,
}

/// Calculate the sun's elevation and azimuth for a location and instant.
///
/// Declination from the 23.45°·sin(360·(284+n)/365) approximation, hour
/// angle from local solar time corrected by longitude and the timestamp's
/// UTC offset.
pub fn solar_position(
    latitude_deg: f64,
    longitude_deg: f64,
    time: DateTime<FixedOffset>,
) -> SolarPosition {
    let day_of_year = time.ordinal() as f64;
    let hour = time.hour() as f64 + time.minute() as f64 / 60.0;
    let tz_offset_hours = time.offset().local_minus_utc() as f64 / 3600.0;

    let declination_deg = 23.45 * (360.0 / 365.0 * (day_of_year + 284.0)).to_radians().sin();
    let declination = declination_deg.to_radians();
    let latitude = latitude_deg.to_radians();

    let solar_time = hour + longitude_deg / 15.0 - tz_offset_hours;
    let hour_angle = (15.0 * (solar_time - 12.0)).to_radians();

    let elevation_deg = (latitude.sin() * declination.sin()
        + latitude.cos() * declination.cos() * hour_angle.cos())
    .asin()
    .to_degrees();

    let azimuth_deg = 180.0
        + hour_angle
            .sin()
            .atan2(hour_angle.cos() * latitude.sin() - declination.tan() * latitude.cos())
            .to_degrees();

    SolarPosition {
        elevation_deg: elevation_deg.max(0.0),
        azimuth_deg: azimuth_deg.rem_euclid(360.0),
    }
}
