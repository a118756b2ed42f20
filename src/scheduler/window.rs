//! Searches a device's permitted span for the best-scoring run windows.

use itertools::Itertools;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

use super::suitability::HourSuitability;
use crate::domain::{Device, Household};

/// Number of ranked windows returned; only the best one is persisted, the
/// rest are diagnostic output.
pub const MAX_CANDIDATES: usize = 3;

/// One scored candidate run window for a device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateWindow {
    pub start_hour: u32,
    /// Clock hour the window ends on; wraps past midnight for overnight spans.
    pub end_hour: u32,
    pub duration_hours: u32,
    pub window_score: f64,
    pub avg_solar_kw: f64,
    pub solar_coverage_ratio: f64,
    pub grid_avoidance_kwh: f64,
    pub estimated_savings: f64,
    pub estimated_co2_kg: f64,
}

/// Rank every valid start hour for `device` against the suitability
/// profile, best window first.
///
/// The profile is indexed by clock hour; hours missing from it contribute
/// zero. A span with `earliest_hour > latest_hour` wraps past midnight and
/// is searched as the cyclic interval `[earliest, 24) ∪ [0, latest]`.
pub fn search_windows(
    device: &Device,
    household: &Household,
    profile: &[HourSuitability],
) -> Vec<CandidateWindow> {
    let duration = device.run_duration_hours();
    if duration == 0 {
        return Vec::new();
    }

    candidate_start_hours(device.earliest_hour, device.latest_hour, duration)
        .into_iter()
        .map(|start| score_window(device, household, profile, start, duration))
        .sorted_by_key(|candidate| Reverse(OrderedFloat(candidate.window_score)))
        .take(MAX_CANDIDATES)
        .collect()
}

fn candidate_start_hours(earliest: u32, latest: u32, duration: u32) -> Vec<u32> {
    if earliest <= latest {
        if earliest + duration > latest {
            return Vec::new();
        }
        (earliest..=latest - duration).collect()
    } else {
        let span = latest + 24 - earliest;
        if duration > span {
            return Vec::new();
        }
        (0..=span - duration)
            .map(|offset| (earliest + offset) % 24)
            .collect()
    }
}

fn score_window(
    device: &Device,
    household: &Household,
    profile: &[HourSuitability],
    start: u32,
    duration: u32,
) -> CandidateWindow {
    let mut total_score = 0.0;
    let mut total_solar_kw = 0.0;
    for offset in 0..duration {
        let hour = ((start + offset) % 24) as usize;
        if let Some(entry) = profile.get(hour) {
            total_score += entry.score;
            total_solar_kw += entry.solar_kw;
        }
    }

    let avg_solar_kw = total_solar_kw / duration as f64;
    let window_score = total_score / duration as f64;
    let solar_coverage_ratio = (avg_solar_kw / device.typical_kwh).min(1.0);
    let grid_avoidance_kwh = device.typical_kwh * solar_coverage_ratio;

    CandidateWindow {
        start_hour: start,
        end_hour: (start + duration) % 24,
        duration_hours: duration,
        window_score,
        avg_solar_kw,
        solar_coverage_ratio,
        grid_avoidance_kwh,
        estimated_savings: grid_avoidance_kwh * household.tariff_per_kwh,
        estimated_co2_kg: grid_avoidance_kwh * household.co2_factor_kg_per_kwh,
    }
}
