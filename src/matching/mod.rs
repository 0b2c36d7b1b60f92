//! Nearest-eligible-driver selection.
//!
//! Nothing in here touches storage or mutates a driver. Reserving the chosen
//! driver is the engine's job.

mod availability;
mod geo;
mod matcher;

pub use availability::{is_eligible, Candidate, TimeContext, TimeWindow};
pub use geo::{distance_km, EARTH_RADIUS_KM};
pub use matcher::{
    find_driver, rank_drivers, Match, MatchStrategy, MatchingPolicy, DEFERRED_RADIUS_KM,
    IMMEDIATE_RADIUS_KM,
};
