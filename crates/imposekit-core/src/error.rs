//! Error handling for ImposeKit
//!
//! Provides error types for the two failure domains of the editor:
//! - Layout errors (validation, referential integrity, malformed payloads)
//! - Service errors (persistence, auto-layout, preview/PDF, upload)
//!
//! All error types use `thiserror` for ergonomic error handling. Layout
//! errors are always raised *before* any model mutation, so a rejected
//! command leaves the editor state untouched.

use thiserror::Error;

/// Layout error type
///
/// Represents errors raised by editor commands and the layout model,
/// including validation failures and referential-integrity violations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// A command's parameters failed validation.
    #[error("Validation failed: {reason}")]
    Validation {
        /// Why the command was rejected.
        reason: String,
    },

    /// A work is still referenced by a slot or design and cannot be deleted.
    #[error("Work '{id}' is still referenced by a slot or design")]
    WorkInUse {
        /// The work identifier.
        id: String,
    },

    /// A slot id did not resolve to a slot in the layout.
    #[error("Slot {id} not found")]
    SlotNotFound {
        /// The slot identifier.
        id: u64,
    },

    /// The command requires a selection but nothing is selected.
    #[error("No slots selected")]
    NothingSelected,

    /// The target slot is locked and excluded from interaction.
    #[error("Slot {id} is locked")]
    LockedSlot {
        /// The slot identifier.
        id: u64,
    },

    /// An externally supplied layout payload could not be interpreted.
    #[error("Malformed layout: {reason}")]
    Format {
        /// Why the payload was rejected.
        reason: String,
    },
}

impl LayoutError {
    /// Create a validation error from a message.
    pub fn validation(reason: impl Into<String>) -> Self {
        LayoutError::Validation {
            reason: reason.into(),
        }
    }
}

/// External service error type
///
/// Represents failures at the boundary with the collaborating services
/// (save endpoint, auto-layout engine, preview/PDF renderer, upload).
/// The in-memory model is never mutated on a service failure.
#[derive(Error, Debug, Clone)]
pub enum ServiceError {
    /// The service could not be reached.
    #[error("Service unavailable: {service}")]
    Unavailable {
        /// The service name.
        service: String,
    },

    /// The service answered with a non-success response.
    #[error("Service rejected request ({status}): {message}")]
    Rejected {
        /// The response status code.
        status: u16,
        /// The response message.
        message: String,
    },

    /// Transport-level failure (network, timeout).
    #[error("Transport error: {reason}")]
    Transport {
        /// The underlying transport failure.
        reason: String,
    },

    /// The service returned a payload the editor could not interpret.
    #[error("Unusable service response: {reason}")]
    BadResponse {
        /// Why the response was unusable.
        reason: String,
    },
}

/// Main error type for ImposeKit
#[derive(Error, Debug)]
pub enum Error {
    /// Layout error
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// External service error
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if this is a validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Layout(LayoutError::Validation { .. }))
    }

    /// Check if this is a service error.
    pub fn is_service_error(&self) -> bool {
        matches!(self, Error::Service(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
