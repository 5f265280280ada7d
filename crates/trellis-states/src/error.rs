//! Registration and lookup errors
//!
//! All failures are synchronous and fatal to the single registration or
//! lookup call that raised them; the registry itself is never left with a
//! partial record. These are configuration-time errors, expected to be
//! fixed in the declarations rather than recovered from at runtime.

use thiserror::Error;

use trellis_foundation::StateName;

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, StateError>;

/// Registration and lookup errors
#[derive(Debug, Error)]
pub enum StateError {
    #[error("invalid state name {name:?}: {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("state '{0}' is already registered")]
    DuplicateState(StateName),

    #[error("invalid url for state '{state}': {reason}")]
    InvalidUrl { state: String, reason: String },

    #[error("state '{0}' declares both params and url")]
    ConflictingParamsAndUrl(StateName),

    #[error("invalid params for state '{state}': {reason}")]
    InvalidParams { state: String, reason: String },

    #[error("state '{state}' is missing parameter '{param}' required by its parent")]
    MissingRequiredParameter { state: StateName, param: String },

    #[error("no reference point given for relative path '{0}'")]
    NoReferencePoint(String),

    #[error("path '{path}' is not valid from state '{base}'")]
    InvalidRelativePath { path: String, base: StateName },
}
