mod booking;
mod customer;
mod driver;
mod location;
mod trip;

pub use booking::{Booking, BookingRequest, Fare, Schedule, Stop};
pub use customer::Customer;
pub use driver::Driver;
pub use location::{Coordinates, Place};
pub use trip::{Status as TripStatus, StatusClass, Trip};

#[cfg(test)]
pub(crate) use booking::sample_request;
#[cfg(test)]
pub(crate) use trip::sample_trip;
