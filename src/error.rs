use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::error::DomainError;
use crate::domain::id::{OpportunityKey, ReservationId};

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Reasons the capital guard refuses a reservation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GuardRejection {
    #[error("capital exceeded: {committed} + {requested} > {ceiling}")]
    CapitalExceeded {
        committed: Decimal,
        requested: Decimal,
        ceiling: Decimal,
    },

    #[error("opportunity {key} already has an active reservation")]
    DuplicateOpportunity { key: OpportunityKey },

    #[error("reservation amount must be positive, got {amount}")]
    NonPositiveAmount { amount: Decimal },
}

/// Errors returned when releasing a reservation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReleaseError {
    #[error("unknown reservation {0}")]
    UnknownReservation(ReservationId),

    #[error("reservation {0} was already released")]
    AlreadyReleased(ReservationId),
}

/// Execution-related errors, recorded as failure reasons on execution records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    #[error("no leg filled: {0}")]
    LegFailed(String),

    #[error("one leg filled, the other did not: {0}")]
    PartiallyFilled(String),

    #[error("leg timed out after {timeout_ms}ms")]
    LegTimedOut { timeout_ms: u64 },

    #[error("execution cancelled before any fill")]
    Cancelled,

    #[error("no order client configured for {venue}")]
    OrderClientMissing { venue: String },

    #[error(transparent)]
    Reservation(#[from] GuardRejection),
}

/// Opportunity validation errors.
#[derive(Error, Debug, Clone)]
pub enum ValidationError {
    #[error("validator unavailable: {0}")]
    ValidatorUnavailable(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Guard(#[from] GuardRejection),

    #[error(transparent)]
    Release(#[from] ReleaseError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, Error>;
