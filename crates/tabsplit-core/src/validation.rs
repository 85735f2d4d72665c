//! # Validation Module
//!
//! Input validation used by the [`Session`](crate::session::Session) before
//! it accepts user input.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Caller (CLI, web form)                                        │
//! │  ├── Type validation (deserialization)                                  │
//! │  └── Immediate user feedback                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Session                                                       │
//! │  └── THIS MODULE: names, prices, quantities, amounts                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Allocation engine                                             │
//! │  └── No validation. Accepts anything well-typed, never fails.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tabsplit_core::validation::{validate_quantity, validate_unit_price};
//!
//! assert!(validate_unit_price(12.5).is_ok());
//! assert!(validate_quantity(0.0).is_err());
//! ```

use crate::error::ValidationError;
use crate::{MAX_LINE_ITEMS, MAX_NAME_LEN, MAX_PARTICIPANTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a display name (participant or line item).
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most [`MAX_NAME_LEN`] characters
///
/// ## Returns
/// The trimmed name.
pub fn validate_name(field: &str, name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(name.to_string())
}

/// Validates a caller-supplied id: non-empty, no surrounding whitespace.
pub fn validate_id(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if id.trim() != id {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must not start or end with whitespace".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

fn require_finite(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a unit price.
///
/// ## Rules
/// - Finite
/// - Non-negative (zero is allowed: complimentary items)
pub fn validate_unit_price(price: f64) -> ValidationResult<()> {
    require_finite("unit price", price)?;

    if price < 0.0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "unit price".to_string(),
        });
    }

    Ok(())
}

/// Validates an item's total quantity.
///
/// ## Rules
/// - Finite
/// - Strictly positive; fractions are fine (0.5 kg)
pub fn validate_quantity(qty: f64) -> ValidationResult<()> {
    require_finite("quantity", qty)?;

    if qty <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a bill adjustment amount. Only finiteness is checked: round-off
/// is signed and negative surcharges are the caller's business.
pub fn validate_adjustment(field: &str, amount: f64) -> ValidationResult<()> {
    require_finite(field, amount)
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Checks there is room for one more participant.
pub fn has_room_for_participant(current: usize) -> bool {
    current < MAX_PARTICIPANTS
}

/// Checks there is room for one more line item.
pub fn has_room_for_item(current: usize) -> bool {
    current < MAX_LINE_ITEMS
}

// =============================================================================
// Unit Tests
// =============================================================================
