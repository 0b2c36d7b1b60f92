use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::env;
use std::fmt::{self, Debug, Display};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    pub code: i32,
    pub message: String,
}

const ENV_VAR_ERROR: i32 = 1;
const DATABASE_ERROR: i32 = 2;
const CONFIG_ERROR: i32 = 3;
const UNEXPECTED_ERROR: i32 = 5;

const INVALID_STATE_TRANSITION_ERROR: i32 = 100;
const VALIDATION_ERROR: i32 = 101;
const NOT_FOUND_ERROR: i32 = 102;
const NO_DRIVER_AVAILABLE_ERROR: i32 = 103;
const RESERVATION_CONFLICT_ERROR: i32 = 104;

impl Error {
    pub fn invalid_state_transition_error(from: &str, to: &str) -> Self {
        Self {
            code: INVALID_STATE_TRANSITION_ERROR,
            message: format!("invalid state transition from {} to {}", from, to),
        }
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self {
            code: VALIDATION_ERROR,
            message: message.into(),
        }
    }

    pub fn not_found_error(what: &str) -> Self {
        Self {
            code: NOT_FOUND_ERROR,
            message: format!("{} not found", what),
        }
    }

    pub fn no_driver_available_error() -> Self {
        Self {
            code: NO_DRIVER_AVAILABLE_ERROR,
            message: "no available drivers found".into(),
        }
    }

    pub fn reservation_conflict_error() -> Self {
        Self {
            code: RESERVATION_CONFLICT_ERROR,
            message: "driver was reserved by another booking".into(),
        }
    }

    pub fn env_var_error(_: env::VarError) -> Self {
        Self {
            code: ENV_VAR_ERROR,
            message: "environment variable error".into(),
        }
    }

    pub fn config_error(message: impl Into<String>) -> Self {
        Self {
            code: CONFIG_ERROR,
            message: message.into(),
        }
    }

    pub fn database_error<T: Debug>(err: T) -> Self {
        tracing::error!("database error: {:?}", err);

        Self {
            code: DATABASE_ERROR,
            message: "database error".into(),
        }
    }

    pub fn unexpected_error() -> Self {
        Self {
            code: UNEXPECTED_ERROR,
            message: "unexpected error".into(),
        }
    }

    pub fn is_invalid_state_transition_error(&self) -> bool {
        self.code == INVALID_STATE_TRANSITION_ERROR
    }

    pub fn is_validation_error(&self) -> bool {
        self.code == VALIDATION_ERROR
    }

    pub fn is_not_found_error(&self) -> bool {
        self.code == NOT_FOUND_ERROR
    }

    pub fn is_no_driver_available_error(&self) -> bool {
        self.code == NO_DRIVER_AVAILABLE_ERROR
    }

    pub fn is_reservation_conflict_error(&self) -> bool {
        self.code == RESERVATION_CONFLICT_ERROR
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

impl std::error::Error for Error {}

impl From<env::VarError> for Error {
    fn from(err: env::VarError) -> Self {
        Error::env_var_error(err)
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Error::database_error(err)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_message) = match self.code {
            1..=99 => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
            INVALID_STATE_TRANSITION_ERROR => (StatusCode::BAD_REQUEST, self.message.as_str()),
            VALIDATION_ERROR => (StatusCode::UNPROCESSABLE_ENTITY, self.message.as_str()),
            NOT_FOUND_ERROR | NO_DRIVER_AVAILABLE_ERROR => {
                (StatusCode::NOT_FOUND, self.message.as_str())
            }
            RESERVATION_CONFLICT_ERROR => (StatusCode::CONFLICT, self.message.as_str()),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
        };

        let body = Json(json!({
            "code": self.code,
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

#[test]
fn internal_errors_are_masked() {
    for err in [
        Error::database_error("connection reset"),
        Error::config_error("BIND_ADDR is not an address"),
        Error::unexpected_error(),
    ] {
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

#[test]
fn domain_errors_map_to_client_statuses() {
    let cases = vec![
        (
            Error::invalid_state_transition_error("accepted", "canceled"),
            StatusCode::BAD_REQUEST,
        ),
        (
            Error::validation_error("from_lat is required"),
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
        (Error::not_found_error("trip"), StatusCode::NOT_FOUND),
        (Error::no_driver_available_error(), StatusCode::NOT_FOUND),
        (Error::reservation_conflict_error(), StatusCode::CONFLICT),
    ];

    for (err, status) in cases {
        assert_eq!(err.into_response().status(), status);
    }
}
