//! Persistence seam for households, devices, weather, forecasts,
//! recommendations and meter readings.
//!
//! The scheduling core only needs get/list/upsert semantics; a database
//! backend would implement this trait behind the same contract the
//! in-memory store honors: hourly upserts are insert-if-absent, keyed by
//! household and timestamp.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use uuid::Uuid;

use crate::domain::{
    Device, Household, MeterReading, PvForecastPoint, Recommendation, WeatherSample,
};

pub mod memory;

pub use memory::MemoryStore;

#[async_trait]
pub trait Store: Send + Sync {
    async fn get_household(&self, id: Uuid) -> Result<Option<Household>>;

    async fn list_households(&self) -> Result<Vec<Household>>;

    async fn upsert_household(&self, household: Household) -> Result<()>;

    /// Devices flagged flexible for a household, in stable device-list order.
    async fn list_flexible_devices(&self, household_id: Uuid) -> Result<Vec<Device>>;

    async fn upsert_device(&self, device: Device) -> Result<()>;

    /// Insert-if-absent by timestamp; returns the number of rows inserted.
    async fn upsert_weather_hourly(
        &self,
        household_id: Uuid,
        samples: &[WeatherSample],
    ) -> Result<usize>;

    /// Insert-if-absent by timestamp; returns the number of rows inserted.
    async fn upsert_pv_forecast_hourly(
        &self,
        household_id: Uuid,
        points: &[PvForecastPoint],
    ) -> Result<usize>;

    /// Forecast points with `start <= timestamp < end`, ascending.
    async fn list_pv_forecast(
        &self,
        household_id: Uuid,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Result<Vec<PvForecastPoint>>;

    async fn create_recommendation(&self, recommendation: Recommendation) -> Result<()>;

    /// Returns the number of recommendations removed.
    async fn delete_recommendations_for_device(&self, device_id: Uuid) -> Result<usize>;

    async fn list_recommendations_for_device(&self, device_id: Uuid)
        -> Result<Vec<Recommendation>>;

    /// Meter readings with `start <= timestamp < end`, ascending.
    async fn get_meter_readings(
        &self,
        household_id: Uuid,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Result<Vec<MeterReading>>;
}
