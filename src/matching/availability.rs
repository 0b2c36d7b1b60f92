use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::Driver;

/// Closed interval a driver spent on a trip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self { from, to }
    }

    /// Bounds are inclusive.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.from <= at && at <= self.to
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeContext {
    Immediate,
    Scheduled(DateTime<Utc>),
}

/// A driver together with the windows of its other trips.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    pub driver: Driver,
    pub busy: Vec<TimeWindow>,
}

impl Candidate {
    pub fn new(driver: Driver, busy: Vec<TimeWindow>) -> Self {
        Self { driver, busy }
    }
}

pub fn is_eligible(candidate: &Candidate, context: &TimeContext) -> bool {
    let driver = &candidate.driver;

    if !driver.available || !driver.is_located() {
        return false;
    }

    match context {
        TimeContext::Immediate => true,
        TimeContext::Scheduled(at) => !candidate.busy.iter().any(|w| w.contains(*at)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Coordinates;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 4, hour, minute, 0).unwrap()
    }

    fn candidate(busy: Vec<TimeWindow>) -> Candidate {
        let driver = Driver::new(1, Uuid::new_v4(), Some(Coordinates::new(0.0, 0.0)));
        Candidate::new(driver, busy)
    }

    #[test]
    fn unavailable_or_unlocated_drivers_are_never_eligible() {
        let mut c = candidate(vec![]);
        c.driver.available = false;
        assert!(!is_eligible(&c, &TimeContext::Immediate));
        assert!(!is_eligible(&c, &TimeContext::Scheduled(at(9, 0))));

        let mut c = candidate(vec![]);
        c.driver.coordinates = None;
        assert!(!is_eligible(&c, &TimeContext::Immediate));
        assert!(!is_eligible(&c, &TimeContext::Scheduled(at(9, 0))));
    }

    #[test]
    fn immediate_requests_ignore_trip_history() {
        let c = candidate(vec![TimeWindow::new(at(10, 0), at(11, 0))]);
        assert!(is_eligible(&c, &TimeContext::Immediate));
    }

    #[test]
    fn overlapping_trips_make_a_driver_busy() {
        let c = candidate(vec![TimeWindow::new(at(10, 0), at(11, 0))]);

        assert!(!is_eligible(&c, &TimeContext::Scheduled(at(10, 30))));
        assert!(is_eligible(&c, &TimeContext::Scheduled(at(11, 1))));
        assert!(is_eligible(&c, &TimeContext::Scheduled(at(9, 59))));
    }

    #[test]
    fn window_bounds_count_as_busy() {
        let c = candidate(vec![TimeWindow::new(at(10, 0), at(11, 0))]);

        assert!(!is_eligible(&c, &TimeContext::Scheduled(at(10, 0))));
        assert!(!is_eligible(&c, &TimeContext::Scheduled(at(11, 0))));
    }
}
