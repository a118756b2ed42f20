//! Household PV forecasting and solar-aware flexible-load scheduling.
//!
//! The crate converts per-location weather forecasts into photovoltaic power
//! forecasts and uses them to recommend run windows for flexible household
//! loads (water heaters, EV chargers) that overlap on-site solar generation.

pub mod config;
pub mod domain;
pub mod jobs;
pub mod scheduler;
pub mod solar;
pub mod store;
pub mod telemetry;
pub mod weather;
