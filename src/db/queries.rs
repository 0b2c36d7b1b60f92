pub const SCHEMA: [&str; 5] = [
    r#"
CREATE TABLE IF NOT EXISTS customers (
    id BIGSERIAL PRIMARY KEY,
    user_id UUID NOT NULL UNIQUE
);
"#,
    r#"
CREATE TABLE IF NOT EXISTS drivers (
    id BIGSERIAL PRIMARY KEY,
    user_id UUID NOT NULL UNIQUE,
    latitude NUMERIC(10, 5),
    longitude NUMERIC(10, 5),
    available BOOLEAN NOT NULL DEFAULT TRUE
);
"#,
    r#"
CREATE TABLE IF NOT EXISTS trips (
    id BIGSERIAL PRIMARY KEY,
    driver_id BIGINT REFERENCES drivers(id),
    customer_id BIGINT NOT NULL REFERENCES customers(id),
    from_address VARCHAR(255) NOT NULL,
    from_lat NUMERIC(10, 5) NOT NULL,
    from_lng NUMERIC(10, 5) NOT NULL,
    to_address VARCHAR(255) NOT NULL,
    to_lat NUMERIC(10, 5) NOT NULL,
    to_lng NUMERIC(10, 5) NOT NULL,
    scheduled_time TIMESTAMPTZ NOT NULL,
    from_time TIMESTAMPTZ,
    to_time TIMESTAMPTZ,
    return_time TIMESTAMPTZ,
    round_trip BOOLEAN NOT NULL DEFAULT FALSE,
    km INT4 NOT NULL,
    passenger_count INT4 NOT NULL DEFAULT 1,
    total_amount NUMERIC(10, 2) NOT NULL,
    payment VARCHAR NOT NULL,
    trip_type VARCHAR,
    status VARCHAR NOT NULL,
    created_at TIMESTAMPTZ NOT NULL,
    deleted_at TIMESTAMPTZ,
    CONSTRAINT return_after_schedule CHECK (return_time IS NULL OR return_time > scheduled_time)
);
"#,
    r#"
CREATE TABLE IF NOT EXISTS trip_stops (
    trip_id BIGINT NOT NULL REFERENCES trips(id) ON DELETE CASCADE,
    stop_order INT4 NOT NULL,
    address VARCHAR(255) NOT NULL,
    latitude NUMERIC(10, 5) NOT NULL,
    longitude NUMERIC(10, 5) NOT NULL,
    PRIMARY KEY (trip_id, stop_order)
);
"#,
    r#"
CREATE INDEX IF NOT EXISTS trips_customer_schedule_idx ON trips (customer_id, scheduled_time);
"#,
];

pub const INSERT_CUSTOMER: &str = r#"
INSERT INTO customers (user_id) VALUES ($1) RETURNING id, user_id;
"#;

pub const CUSTOMER_EXISTS: &str = r#"
SELECT EXISTS (SELECT 1 FROM customers WHERE id = $1) AS found;
"#;

pub const INSERT_DRIVER: &str = r#"
INSERT INTO drivers (user_id, latitude, longitude, available)
VALUES ($1, $2, $3, TRUE)
RETURNING id, user_id, latitude, longitude, available;
"#;

pub const SELECT_DRIVER: &str = r#"
SELECT id, user_id, latitude, longitude, available FROM drivers WHERE id = $1;
"#;

pub const UPDATE_DRIVER_LOCATION: &str = r#"
UPDATE drivers SET latitude = $2, longitude = $3 WHERE id = $1
RETURNING id, user_id, latitude, longitude, available;
"#;

pub const UPDATE_DRIVER_AVAILABILITY: &str = r#"
UPDATE drivers SET available = $2 WHERE id = $1
RETURNING id, user_id, latitude, longitude, available;
"#;

pub const SELECT_CANDIDATE_DRIVERS: &str = r#"
SELECT id, user_id, latitude, longitude, available
FROM drivers
WHERE available = TRUE AND latitude IS NOT NULL AND longitude IS NOT NULL
ORDER BY id;
"#;

pub const SELECT_BUSY_WINDOWS: &str = r#"
SELECT t.driver_id, t.from_time, t.to_time
FROM trips t
JOIN drivers d ON d.id = t.driver_id
WHERE d.available = TRUE
    AND t.from_time IS NOT NULL
    AND t.to_time IS NOT NULL
    AND t.deleted_at IS NULL
    AND ($1::BIGINT IS NULL OR t.id <> $1);
"#;

pub const RESERVE_DRIVER: &str = r#"
UPDATE drivers SET available = FALSE WHERE id = $1 AND available = TRUE
RETURNING id, user_id, latitude, longitude, available;
"#;

pub const RELEASE_DRIVER: &str = r#"
UPDATE drivers SET available = TRUE WHERE id = $1;
"#;

pub const INSERT_TRIP: &str = r#"
INSERT INTO trips (
    driver_id, customer_id,
    from_address, from_lat, from_lng,
    to_address, to_lat, to_lng,
    scheduled_time, return_time, round_trip,
    km, passenger_count, total_amount, payment, trip_type,
    status, created_at
) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
RETURNING id;
"#;

pub const INSERT_TRIP_STOP: &str = r#"
INSERT INTO trip_stops (trip_id, stop_order, address, latitude, longitude)
VALUES ($1, $2, $3, $4, $5);
"#;

const TRIP_COLUMNS: &str = "id, driver_id, customer_id, from_address, from_lat, from_lng, \
    to_address, to_lat, to_lng, scheduled_time, from_time, to_time, return_time, round_trip, \
    km, passenger_count, total_amount, payment, trip_type, status, created_at, deleted_at";

pub fn select_trip() -> String {
    format!(
        "SELECT {} FROM trips WHERE id = $1 AND deleted_at IS NULL",
        TRIP_COLUMNS
    )
}

/// `$1` customer, `$2` statuses, `$3` now.
pub fn select_customer_trips(upcoming: bool) -> String {
    let window = if upcoming {
        "scheduled_time > $3"
    } else {
        "scheduled_time <= $3"
    };

    format!(
        "SELECT {} FROM trips \
         WHERE customer_id = $1 AND deleted_at IS NULL AND status = ANY($2) AND {} \
         ORDER BY scheduled_time ASC, id ASC",
        TRIP_COLUMNS, window
    )
}

pub const SELECT_TRIP_STOPS: &str = r#"
SELECT trip_id, stop_order, address, latitude, longitude
FROM trip_stops
WHERE trip_id = ANY($1)
ORDER BY trip_id, stop_order;
"#;

pub const UPDATE_TRIP_IF_STATUS: &str = r#"
UPDATE trips
SET driver_id = $2,
    status = $3,
    from_time = $4,
    to_time = $5
WHERE id = $1 AND status = $6 AND deleted_at IS NULL;
"#;

/// Returns the row as it stood when the delete committed.
pub fn soft_delete_trip() -> String {
    format!(
        "UPDATE trips SET deleted_at = $2 WHERE id = $1 AND deleted_at IS NULL RETURNING {}",
        TRIP_COLUMNS
    )
}
