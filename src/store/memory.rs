//! In-memory store used by the simulation build and the test suite.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::Store;
use crate::domain::{
    Device, Household, MeterReading, PvForecastPoint, Recommendation, WeatherSample,
};

type TimeSeries<T> = HashMap<Uuid, BTreeMap<DateTime<FixedOffset>, T>>;

#[derive(Default)]
struct Inner {
    households: HashMap<Uuid, Household>,
    devices: HashMap<Uuid, Device>,
    weather: TimeSeries<WeatherSample>,
    forecasts: TimeSeries<PvForecastPoint>,
    meter_readings: TimeSeries<MeterReading>,
    recommendations: HashMap<Uuid, Vec<Recommendation>>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed helper for tests and the simulation build.
    pub async fn add_meter_readings(&self, household_id: Uuid, readings: &[MeterReading]) {
        let mut inner = self.inner.write().await;
        let series = inner.meter_readings.entry(household_id).or_default();
        for reading in readings {
            series.insert(reading.timestamp, reading.clone());
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_household(&self, id: Uuid) -> Result<Option<Household>> {
        Ok(self.inner.read().await.households.get(&id).cloned())
    }

    async fn list_households(&self) -> Result<Vec<Household>> {
        let inner = self.inner.read().await;
        let mut households: Vec<Household> = inner.households.values().cloned().collect();
        households.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(households)
    }

    async fn upsert_household(&self, household: Household) -> Result<()> {
        self.inner
            .write()
            .await
            .households
            .insert(household.id, household);
        Ok(())
    }

    async fn list_flexible_devices(&self, household_id: Uuid) -> Result<Vec<Device>> {
        let inner = self.inner.read().await;
        let mut devices: Vec<Device> = inner
            .devices
            .values()
            .filter(|d| d.household_id == household_id && d.flexible)
            .cloned()
            .collect();
        devices.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(devices)
    }

    async fn upsert_device(&self, device: Device) -> Result<()> {
        self.inner.write().await.devices.insert(device.id, device);
        Ok(())
    }

    async fn upsert_weather_hourly(
        &self,
        household_id: Uuid,
        samples: &[WeatherSample],
    ) -> Result<usize> {
        let mut inner = self.inner.write().await;
        let series = inner.weather.entry(household_id).or_default();
        let mut inserted = 0;
        for sample in samples {
            series.entry(sample.timestamp).or_insert_with(|| {
                inserted += 1;
                sample.clone()
            });
        }
        Ok(inserted)
    }

    async fn upsert_pv_forecast_hourly(
        &self,
        household_id: Uuid,
        points: &[PvForecastPoint],
    ) -> Result<usize> {
        let mut inner = self.inner.write().await;
        let series = inner.forecasts.entry(household_id).or_default();
        let mut inserted = 0;
        for point in points {
            series.entry(point.timestamp).or_insert_with(|| {
                inserted += 1;
                point.clone()
            });
        }
        Ok(inserted)
    }

    async fn list_pv_forecast(
        &self,
        household_id: Uuid,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Result<Vec<PvForecastPoint>> {
        let inner = self.inner.read().await;
        Ok(inner
            .forecasts
            .get(&household_id)
            .map(|series| series.range(start..end).map(|(_, p)| p.clone()).collect())
            .unwrap_or_default())
    }

    async fn create_recommendation(&self, recommendation: Recommendation) -> Result<()> {
        self.inner
            .write()
            .await
            .recommendations
            .entry(recommendation.device_id)
            .or_default()
            .push(recommendation);
        Ok(())
    }

    async fn delete_recommendations_for_device(&self, device_id: Uuid) -> Result<usize> {
        Ok(self
            .inner
            .write()
            .await
            .recommendations
            .remove(&device_id)
            .map(|recs| recs.len())
            .unwrap_or(0))
    }

    async fn list_recommendations_for_device(
        &self,
        device_id: Uuid,
    ) -> Result<Vec<Recommendation>> {
        Ok(self
            .inner
            .read()
            .await
            .recommendations
            .get(&device_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_meter_readings(
        &self,
        household_id: Uuid,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Result<Vec<MeterReading>> {
        let inner = self.inner.read().await;
        Ok(inner
            .meter_readings
            .get(&household_id)
            .map(|series| series.range(start..end).map(|(_, r)| r.clone()).collect())
            .unwrap_or_default())
    }
}
