//! Core domain types shared by the forecasting and scheduling modules.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Default fraction of rated output lost to inverter, wiring and soiling.
pub const DEFAULT_SYSTEM_LOSS_FRACTION: f64 = 0.14;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("rated capacity must be positive, got {0} kW")]
    NonPositiveCapacity(f64),

    #[error("tilt must be within 0-90 degrees, got {0}")]
    TiltOutOfRange(f64),

    #[error("azimuth must be within 0-360 degrees, got {0}")]
    AzimuthOutOfRange(f64),

    #[error("latitude must be within -90 to 90 degrees, got {0}")]
    LatitudeOutOfRange(f64),

    #[error("longitude must be within -180 to 180 degrees, got {0}")]
    LongitudeOutOfRange(f64),

    #[error("system loss fraction must be within 0-1, got {0}")]
    LossFractionOutOfRange(f64),

    #[error("typical energy per run must be positive, got {0} kWh")]
    NonPositiveEnergy(f64),

    #[error("minimum duration must be positive, got {0} h")]
    NonPositiveDuration(f64),

    #[error("start hour must be within 0-23, got {0}")]
    HourOutOfRange(u32),
}

/// One hour of weather at a household's location. Immutable once stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSample {
    pub timestamp: DateTime<FixedOffset>,
    pub temperature_c: f64,
    pub cloud_cover_percent: f64,
    pub wind_speed_ms: f64,
    /// Beam/global irradiance proxy driving the PV model.
    pub irradiance_wm2: f64,
}

/// Fixed-mount PV array parameters, owned by a household.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PvSystemConfig {
    pub capacity_kw: f64,
    pub tilt_deg: f64,
    /// Compass direction the panels face; 180 = due south.
    pub azimuth_deg: f64,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default = "default_loss_fraction")]
    pub system_loss_fraction: f64,
}

fn default_loss_fraction() -> f64 {
    DEFAULT_SYSTEM_LOSS_FRACTION
}

impl PvSystemConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.capacity_kw <= 0.0 {
            return Err(ValidationError::NonPositiveCapacity(self.capacity_kw));
        }
        if !(0.0..=90.0).contains(&self.tilt_deg) {
            return Err(ValidationError::TiltOutOfRange(self.tilt_deg));
        }
        if !(0.0..=360.0).contains(&self.azimuth_deg) {
            return Err(ValidationError::AzimuthOutOfRange(self.azimuth_deg));
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(ValidationError::LatitudeOutOfRange(self.latitude));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(ValidationError::LongitudeOutOfRange(self.longitude));
        }
        if !(0.0..1.0).contains(&self.system_loss_fraction) {
            return Err(ValidationError::LossFractionOutOfRange(
                self.system_loss_fraction,
            ));
        }
        Ok(())
    }
}

/// A household with its tariff, emission factor and PV installation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Household {
    pub id: Uuid,
    pub name: String,
    pub tariff_per_kwh: f64,
    pub co2_factor_kg_per_kwh: f64,
    pub pv_system: PvSystemConfig,
}

impl Household {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.pv_system.validate()
    }
}

/// A shiftable household load and its scheduling constraints.
///
/// `earliest_hour`/`latest_hour` bound the permitted run span on the local
/// clock; a span with `earliest_hour > latest_hour` wraps past midnight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub id: Uuid,
    pub household_id: Uuid,
    pub name: String,
    pub typical_kwh: f64,
    pub flexible: bool,
    pub min_duration_hours: f64,
    pub earliest_hour: u32,
    pub latest_hour: u32,
}

impl Device {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.typical_kwh <= 0.0 {
            return Err(ValidationError::NonPositiveEnergy(self.typical_kwh));
        }
        if self.min_duration_hours <= 0.0 {
            return Err(ValidationError::NonPositiveDuration(self.min_duration_hours));
        }
        if self.earliest_hour > 23 {
            return Err(ValidationError::HourOutOfRange(self.earliest_hour));
        }
        if self.latest_hour > 23 {
            return Err(ValidationError::HourOutOfRange(self.latest_hour));
        }
        Ok(())
    }

    /// Scheduled run length in whole hours.
    pub fn run_duration_hours(&self) -> u32 {
        self.min_duration_hours.ceil() as u32
    }
}

/// One hour of predicted PV output. Derived data, regenerated wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PvForecastPoint {
    pub timestamp: DateTime<FixedOffset>,
    pub ac_kw: f64,
    pub dc_kw: f64,
    pub efficiency: f64,
}

/// A persisted run-window recommendation for one device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: Uuid,
    pub device_id: Uuid,
    pub start_ts: DateTime<FixedOffset>,
    pub end_ts: DateTime<FixedOffset>,
    pub reason: String,
    pub estimated_savings: f64,
    pub estimated_co2_kg: f64,
    pub created_at: DateTime<FixedOffset>,
}

/// One hour of metered grid consumption.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeterReading {
    pub timestamp: DateTime<FixedOffset>,
    pub grid_kwh: f64,
}

/// Daily solar/grid summary for a household.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMetrics {
    pub solar_generated_kwh: f64,
    pub grid_consumed_kwh: f64,
    pub cost_savings: f64,
    pub co2_avoided_kg: f64,
    pub renewable_share_pct: f64,
}
