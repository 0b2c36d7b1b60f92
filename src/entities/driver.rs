use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::Coordinates;
use crate::error::Error;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub id: i64,
    pub user_id: Uuid,
    pub coordinates: Option<Coordinates>,
    pub available: bool,
}

impl Driver {
    pub fn new(id: i64, user_id: Uuid, coordinates: Option<Coordinates>) -> Self {
        Self {
            id,
            user_id,
            coordinates,
            available: true,
        }
    }

    /// A driver without a known location can never be matched.
    pub fn is_located(&self) -> bool {
        self.coordinates.is_some()
    }

    #[tracing::instrument]
    pub fn reserve(&mut self) -> Result<(), Error> {
        if !self.available {
            return Err(Error::reservation_conflict_error());
        }

        self.available = false;
        Ok(())
    }

    #[tracing::instrument]
    pub fn release(&mut self) {
        self.available = true;
    }
}

#[test]
fn reserving_twice_conflicts() {
    let mut driver = Driver::new(1, Uuid::new_v4(), None);

    assert!(driver.reserve().is_ok());
    assert!(!driver.available);
    assert!(driver.reserve().unwrap_err().is_reservation_conflict_error());

    driver.release();
    assert!(driver.available);
}
