//! # Error Types
//!
//! Domain-specific error types for tabsplit-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tabsplit-core errors (this file)                                      │
//! │  ├── CoreError        - Session bookkeeping failures                   │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  tabsplit-cli errors (in app)                                          │
//! │  └── AppError         - File, JSON and core failures for the terminal  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → AppError → exit code + message    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Is NOT an Error
//! The allocation engine itself never fails. Unknown participant ids in the
//! assignment map, zero-subtotal bills and unassigned items all produce
//! zero contributions instead of errors. Errors only come from the
//! [`Session`](crate::session::Session) mutation API.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Session bookkeeping errors.
///
/// These represent requests that reference state the session does not hold,
/// or that would break one of its limits.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Participant id is not part of the session.
    ///
    /// ## When This Occurs
    /// - Assigning an item to a participant that was already removed
    /// - Removing the same participant twice
    #[error("Participant not found: {0}")]
    ParticipantNotFound(String),

    /// Line item id is not part of the session.
    #[error("Line item not found: {0}")]
    ItemNotFound(String),

    /// An id supplied by the caller is already taken.
    ///
    /// ## When This Occurs
    /// - A bill file lists two participants with the same id
    /// - Re-inserting a participant that is still present
    #[error("{kind} id '{id}' already exists")]
    DuplicateId { kind: &'static str, id: String },

    /// The session already holds the maximum number of entries.
    #[error("Cannot have more than {max} {kind}")]
    LimitReached { kind: &'static str, max: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used by the session before it accepts user input. The allocation engine
/// accepts whatever it is handed, so these never surface from it.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Value is NaN or infinite.
    #[error("{field} must be a finite number")]
    NotFinite { field: String },

    /// Invalid format (e.g., id padded with whitespace).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
