//! Error types for the Pawsibilities discovery core.

use crate::types::PetId;

/// Top-level discovery error, as reported to the user.
#[derive(thiserror::Error, Debug)]
pub enum DiscoveryError {
    #[error("not logged in")]
    NotLoggedIn,

    /// The favorite update was refused; local state has been rolled back.
    #[error("favorite update failed: {0}")]
    UpdateFailed(#[source] ApiError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("invalid pet draft: {0}")]
    InvalidDraft(#[from] DraftError),

    #[error("pet not found: {0}")]
    PetNotFound(PetId),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Failures at the network boundary.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected status {status}: {message}")]
    Status { status: u16, message: String },

    /// The response arrived but did not match the expected schema.
    #[error("response decode error: {0}")]
    Decode(String),

    #[error("timeout")]
    Timeout,
}

/// Submission form validation errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("age must be a whole number, got '{0}'")]
    InvalidAge(String),
}
