use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::availability::{is_eligible, Candidate, TimeContext};
use super::geo::distance_km;
use crate::entities::{Coordinates, Driver};

/// Riders booking for right now accept a driver from further away.
pub const IMMEDIATE_RADIUS_KM: f64 = 10.0;
/// Background matching holds out for a close driver since it will retry.
pub const DEFERRED_RADIUS_KM: f64 = 3.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    Immediate,
    Deferred,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchingPolicy {
    pub immediate_radius_km: f64,
    pub deferred_radius_km: f64,
}

impl Default for MatchingPolicy {
    fn default() -> Self {
        Self {
            immediate_radius_km: IMMEDIATE_RADIUS_KM,
            deferred_radius_km: DEFERRED_RADIUS_KM,
        }
    }
}

impl MatchingPolicy {
    pub fn radius_km(&self, strategy: MatchStrategy) -> f64 {
        match strategy {
            MatchStrategy::Immediate => self.immediate_radius_km,
            MatchStrategy::Deferred => self.deferred_radius_km,
        }
    }

    pub fn time_context(
        &self,
        strategy: MatchStrategy,
        scheduled_time: DateTime<Utc>,
    ) -> TimeContext {
        match strategy {
            MatchStrategy::Immediate => TimeContext::Immediate,
            MatchStrategy::Deferred => TimeContext::Scheduled(scheduled_time),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Match {
    pub driver: Driver,
    pub distance_km: f64,
}

/// Eligible drivers within `radius_km` of `origin`, nearest first. Equal
/// distances are ordered by driver id.
pub fn rank_drivers(
    origin: Coordinates,
    context: &TimeContext,
    radius_km: f64,
    candidates: &[Candidate],
) -> Vec<Match> {
    let mut matches: Vec<Match> = candidates
        .iter()
        .filter(|c| is_eligible(c, context))
        .filter_map(|c| {
            let coordinates = c.driver.coordinates?;
            let distance_km = distance_km(origin, coordinates);

            (distance_km <= radius_km).then(|| Match {
                driver: c.driver.clone(),
                distance_km,
            })
        })
        .collect();

    matches.sort_by(|a, b| {
        a.distance_km
            .total_cmp(&b.distance_km)
            .then_with(|| a.driver.id.cmp(&b.driver.id))
    });

    matches
}

pub fn find_driver(
    origin: Coordinates,
    context: &TimeContext,
    radius_km: f64,
    candidates: &[Candidate],
) -> Option<Match> {
    rank_drivers(origin, context, radius_km, candidates)
        .into_iter()
        .next()
}
