//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`HomewiseError`] via `#[from]` (or a boxed source for storage).

/// Top-level error returned by domain validation and application services.
#[derive(Debug, thiserror::Error)]
pub enum HomewiseError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    #[error("conflict")]
    Conflict(#[from] ConflictError),

    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A domain invariant was violated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("brand must not be empty")]
    EmptyBrand,

    #[error("room must not be empty")]
    EmptyRoom,

    #[error("device must belong to a user")]
    MissingOwner,

    #[error("email must be a non-empty address")]
    InvalidEmail,

    #[error("temperature {0} is outside the supported range")]
    TemperatureOutOfRange(String),

    #[error("speed {0} is outside the supported range")]
    SpeedOutOfRange(u8),

    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

/// A looked-up record does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// A record with the same unique key already exists.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} with {field} {value:?} already exists")]
pub struct ConflictError {
    pub entity: &'static str,
    pub field: &'static str,
    pub value: String,
}
