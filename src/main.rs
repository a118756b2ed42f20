use anyhow::Result;
use solar_load_scheduler::{config::Config, telemetry};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing();

    let cfg = Config::load()?;

    #[cfg(not(feature = "sim"))]
    {
        let _ = cfg;
        anyhow::bail!(
            "built without the `sim` feature: wire a real store and weather provider \
             before running the scheduler binary"
        );
    }

    #[cfg(feature = "sim")]
    {
        use solar_load_scheduler::jobs::{runner, Jobs};
        use solar_load_scheduler::store::MemoryStore;
        use solar_load_scheduler::weather::SimulatedWeatherProvider;
        use std::sync::Arc;
        use tokio_util::sync::CancellationToken;

        let store = Arc::new(MemoryStore::new());
        seed_demo_household(store.as_ref()).await?;

        let weather = Arc::new(SimulatedWeatherProvider::default());
        let jobs = Arc::new(Jobs::new(store, weather, cfg.clone()));

        let shutdown = CancellationToken::new();
        let handles = runner::spawn_job_loops(jobs, &cfg.scheduler, shutdown.clone());

        info!("solar load scheduler started (simulated providers)");
        telemetry::shutdown_signal().await;

        shutdown.cancel();
        for handle in handles {
            let _ = handle.await;
        }
        warn!("shutdown complete");
        Ok(())
    }
}

#[cfg(feature = "sim")]
async fn seed_demo_household(store: &dyn solar_load_scheduler::store::Store) -> Result<()> {
    use solar_load_scheduler::domain::{Device, Household, PvSystemConfig};
    use solar_load_scheduler::store::Store;
    use uuid::Uuid;

    let household = Household {
        id: Uuid::new_v4(),
        name: "demo household".to_string(),
        tariff_per_kwh: 2.1,
        co2_factor_kg_per_kwh: 0.35,
        pv_system: PvSystemConfig {
            capacity_kw: 5.0,
            tilt_deg: 30.0,
            azimuth_deg: 180.0,
            latitude: 59.3293,
            longitude: 18.0686,
            system_loss_fraction: 0.14,
        },
    };
    let household_id = household.id;
    store.upsert_household(household).await?;

    store
        .upsert_device(Device {
            id: Uuid::new_v4(),
            household_id,
            name: "water heater".to_string(),
            typical_kwh: 3.5,
            flexible: true,
            min_duration_hours: 2.0,
            earliest_hour: 9,
            latest_hour: 17,
        })
        .await?;

    // Overnight span crossing midnight
    store
        .upsert_device(Device {
            id: Uuid::new_v4(),
            household_id,
            name: "ev charger".to_string(),
            typical_kwh: 8.0,
            flexible: true,
            min_duration_hours: 4.0,
            earliest_hour: 22,
            latest_hour: 6,
        })
        .await?;

    Ok(())
}
