use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entities::{BookingRequest, Fare, Place, Schedule, Stop};
use crate::error::Error;
use crate::matching::TimeWindow;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: i64,
    pub customer_id: i64,
    pub driver_id: Option<i64>,
    pub origin: Place,
    pub destination: Place,
    pub stops: Vec<Stop>,
    pub scheduled_time: DateTime<Utc>,
    pub from_time: Option<DateTime<Utc>>,
    pub to_time: Option<DateTime<Utc>>,
    pub return_time: Option<DateTime<Utc>>,
    pub round_trip: bool,
    pub km: i32,
    pub passenger_count: i32,
    pub total_amount: Decimal,
    pub payment: String,
    pub trip_type: Option<String>,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Requested,
    Accepted,
    InProgress,
    Completed,
    Canceled,
}

/// Coarse grouping used when a customer lists their bookings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusClass {
    Upcoming,
    History,
}

impl Status {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Requested => "requested",
            Self::Accepted => "accepted",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Canceled => "canceled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Canceled)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "requested" => Ok(Self::Requested),
            "accepted" => Ok(Self::Accepted),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "canceled" => Ok(Self::Canceled),
            _ => Err(Error::unexpected_error()),
        }
    }
}

impl StatusClass {
    pub fn statuses(&self) -> [Status; 2] {
        match self {
            Self::Upcoming => [Status::Requested, Status::Accepted],
            Self::History => [Status::Completed, Status::Canceled],
        }
    }

    pub fn includes(&self, trip: &Trip, now: DateTime<Utc>) -> bool {
        let in_window = match self {
            Self::Upcoming => trip.scheduled_time > now,
            Self::History => trip.scheduled_time <= now,
        };

        in_window && self.statuses().contains(&trip.status)
    }
}

impl Trip {
    /// Builds the persisted shape of a booking. Stops are kept in their
    /// `stop_order` sequence.
    pub fn new(
        id: i64,
        request: BookingRequest,
        driver_id: Option<i64>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let BookingRequest {
            customer_id,
            origin,
            destination,
            schedule:
                Schedule {
                    scheduled_time,
                    return_time,
                    round_trip,
                },
            fare:
                Fare {
                    km,
                    total_amount,
                    payment,
                },
            mut stops,
            passenger_count,
            trip_type,
        } = request;

        stops.sort_by_key(|stop| stop.stop_order);

        let status = match driver_id {
            Some(_) => Status::Accepted,
            None => Status::Requested,
        };

        Self {
            id,
            customer_id,
            driver_id,
            origin,
            destination,
            stops,
            scheduled_time,
            from_time: None,
            to_time: None,
            return_time,
            round_trip,
            km,
            passenger_count,
            total_amount,
            payment,
            trip_type,
            status,
            created_at,
            deleted_at: None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Whether a driver may still be attached by the matcher.
    pub fn is_awaiting_driver(&self) -> bool {
        self.status == Status::Requested && self.driver_id.is_none() && !self.is_deleted()
    }

    /// The interval the assigned driver was actually busy, once both ends
    /// have been recorded.
    pub fn busy_window(&self) -> Option<TimeWindow> {
        match (self.from_time, self.to_time) {
            (Some(from), Some(to)) => Some(TimeWindow::new(from, to)),
            _ => None,
        }
    }

    #[tracing::instrument(skip(self), fields(trip_id = self.id))]
    pub fn assign_driver(&mut self, driver_id: i64) -> Result<(), Error> {
        match (self.status, self.driver_id) {
            (Status::Requested, None) => {
                self.driver_id = Some(driver_id);
                self.status = Status::Accepted;
                Ok(())
            }
            (Status::Requested, Some(reserved)) if reserved == driver_id => {
                self.status = Status::Accepted;
                Ok(())
            }
            _ => Err(self.transition_error(Status::Accepted)),
        }
    }

    #[tracing::instrument(skip(self), fields(trip_id = self.id))]
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<(), Error> {
        match self.status {
            Status::Accepted => {
                self.status = Status::InProgress;
                self.from_time = Some(now);
                Ok(())
            }
            _ => Err(self.transition_error(Status::InProgress)),
        }
    }

    /// Returns the driver that is free again once the trip is over.
    #[tracing::instrument(skip(self), fields(trip_id = self.id))]
    pub fn complete(&mut self, now: DateTime<Utc>) -> Result<Option<i64>, Error> {
        match self.status {
            Status::InProgress => {
                self.status = Status::Completed;
                self.to_time = Some(now);
                Ok(self.driver_id)
            }
            _ => Err(self.transition_error(Status::Completed)),
        }
    }

    /// Only a `requested` trip can be canceled. A driver reserved for the trip
    /// is handed back to the caller so it can be released.
    #[tracing::instrument(skip(self), fields(trip_id = self.id))]
    pub fn cancel(&mut self) -> Result<Option<i64>, Error> {
        match self.status {
            Status::Requested => {
                self.status = Status::Canceled;
                Ok(self.driver_id)
            }
            _ => Err(self.transition_error(Status::Canceled)),
        }
    }

    fn transition_error(&self, to: Status) -> Error {
        Error::invalid_state_transition_error(self.status.name(), to.name())
    }
}

#[cfg(test)]
pub(crate) fn sample_trip(scheduled_time: DateTime<Utc>) -> Trip {
    let request = crate::entities::sample_request(1, scheduled_time);
    Trip::new(1, request, None, scheduled_time)
}

#[test]
fn trip_walks_the_happy_path() {
    let now = Utc::now();
    let mut trip = sample_trip(now);
    assert_eq!(trip.status, Status::Requested);

    trip.assign_driver(7).unwrap();
    assert_eq!(trip.status, Status::Accepted);
    assert_eq!(trip.driver_id, Some(7));

    trip.start(now).unwrap();
    assert_eq!(trip.from_time, Some(now));

    let freed = trip.complete(now + chrono::Duration::minutes(25)).unwrap();
    assert_eq!(freed, Some(7));
    assert_eq!(trip.status, Status::Completed);
    assert!(trip.busy_window().is_some());
}

#[test]
fn transitions_cannot_be_skipped() {
    let now = Utc::now();
    let mut trip = sample_trip(now);

    let err = trip.start(now).unwrap_err();
    assert!(err.is_invalid_state_transition_error());
    assert_eq!(trip.status, Status::Requested);

    let err = trip.complete(now).unwrap_err();
    assert!(err.is_invalid_state_transition_error());

    trip.assign_driver(3).unwrap();
    let err = trip.complete(now).unwrap_err();
    assert!(err.is_invalid_state_transition_error());
    assert_eq!(trip.status, Status::Accepted);
}

#[test]
fn only_requested_trips_can_be_canceled() {
    let now = Utc::now();

    let mut trip = sample_trip(now);
    assert_eq!(trip.cancel().unwrap(), None);
    assert_eq!(trip.status, Status::Canceled);

    // canceling again is reported, not silently accepted
    let err = trip.cancel().unwrap_err();
    assert!(err.is_invalid_state_transition_error());
    assert_eq!(trip.status, Status::Canceled);

    let mut accepted = sample_trip(now);
    accepted.assign_driver(2).unwrap();

    let mut in_progress = accepted.clone();
    in_progress.start(now).unwrap();

    for mut trip in [accepted, in_progress] {
        let before = trip.status;

        let err = trip.cancel().unwrap_err();
        assert!(err.is_invalid_state_transition_error());
        assert_eq!(trip.status, before);
    }
}

#[test]
fn canceling_a_reserved_trip_frees_the_driver() {
    let mut trip = sample_trip(Utc::now());
    trip.driver_id = Some(9);

    assert_eq!(trip.cancel().unwrap(), Some(9));
}

#[test]
fn a_matched_trip_cannot_take_a_second_driver() {
    let mut trip = sample_trip(Utc::now());
    trip.assign_driver(4).unwrap();

    assert!(trip.assign_driver(5).is_err());
    assert_eq!(trip.driver_id, Some(4));
}

#[test]
fn status_class_splits_on_time_and_status() {
    let now = Utc::now();
    let mut future = sample_trip(now + chrono::Duration::hours(2));
    let mut past = sample_trip(now - chrono::Duration::hours(2));

    assert!(StatusClass::Upcoming.includes(&future, now));
    assert!(!StatusClass::History.includes(&future, now));

    // a past trip that never completed is in neither list
    assert!(!StatusClass::Upcoming.includes(&past, now));
    assert!(!StatusClass::History.includes(&past, now));

    past.cancel().unwrap();
    assert!(StatusClass::History.includes(&past, now));

    future.cancel().unwrap();
    assert!(!StatusClass::Upcoming.includes(&future, now));
}

#[test]
fn status_names_round_trip_through_storage() {
    for status in [
        Status::Requested,
        Status::Accepted,
        Status::InProgress,
        Status::Completed,
        Status::Canceled,
    ] {
        assert_eq!(status.name().parse::<Status>().unwrap(), status);
    }
}
