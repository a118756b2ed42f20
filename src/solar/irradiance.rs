//! Plane-of-array irradiance for a fixed-tilt panel.

use super::position::SolarPosition;

/// Project beam irradiance onto a tilted panel plane.
///
/// Standard fixed-tilt geometric projection; diffuse and ground-reflected
/// components are not modeled, the beam value is treated as the entire
/// driving signal. Returns 0 whenever the sun is at or below the horizon.
pub fn plane_of_array_irradiance(
    beam_wm2: f64,
    position: &SolarPosition,
    tilt_deg: f64,
    panel_azimuth_deg: f64,
) -> f64 {
    if position.elevation_deg <= 0.0 {
        return 0.0;
    }

    let elevation = position.elevation_deg.to_radians();
    let tilt = tilt_deg.to_radians();
    let azimuth_delta = (panel_azimuth_deg - position.azimuth_deg).to_radians();

    let cos_incidence =
        elevation.sin() * tilt.cos() + elevation.cos() * tilt.sin() * azimuth_delta.cos();

    (beam_wm2 * cos_incidence.max(0.0)).max(0.0)
}
