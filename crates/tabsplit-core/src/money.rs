//! # Money Module
//!
//! Provides the `Money` type for monetary values on a shared bill.
//!
//! ## Why Not Integer Cents?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  FRACTIONAL SHARES                                                      │
//! │                                                                         │
//! │  A bill split is not a till. Quantities are fractional:                 │
//! │    1 pizza shared by 3 people → 0.333… pizza each                       │
//! │                                                                         │
//! │  Adjustments are apportioned by ratio:                                  │
//! │    service × (my subtotal / bill subtotal)                              │
//! │                                                                         │
//! │  Rounding every intermediate step to cents would move money between    │
//! │  participants. We keep full precision and round only for display.       │
//! │  The price: per-participant totals may drift from the bill total by a   │
//! │  few ulps. Compare with MONEY_TOLERANCE, never with ==.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tabsplit_core::money::Money;
//!
//! let price = Money::new(200.0);
//! let half = price * 0.5;
//! assert_eq!(half.amount(), 100.0);
//!
//! // Proportional share of a 20.00 service charge for 200 of a 400 bill
//! let service = Money::new(20.0).apportion(Money::new(200.0), Money::new(400.0));
//! assert_eq!(service.amount(), 10.0);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

use crate::MONEY_TOLERANCE;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount in major currency units (e.g. 12.5 = twelve and a half).
///
/// ## Design Decisions
/// - **f64**: quantities and apportionment ratios are real numbers
/// - **Signed**: round-off adjustments and negative prices are legal input
/// - **Single field tuple struct**: serializes as a bare JSON number
///
/// ## User Workflow Context
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                    Where Money is Used                                  │
/// │                                                                         │
/// │  LineItem.unit_price ──► × assigned qty ──► ItemDetail.cost             │
/// │                                                  │                      │
/// │                                                  ▼                      │
/// │  BillAdjustments ──► apportion / split_evenly ──► Share.total          │
/// │                                                                         │
/// │  Rounded to cents only by `rounded_to` / `format_with` for display     │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(f64);

impl Money {
    /// Creates a Money value from an amount in major units.
    #[inline]
    pub const fn new(amount: f64) -> Self {
        Money(amount)
    }

    /// Returns the raw amount.
    #[inline]
    pub const fn amount(&self) -> f64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0.0)
    }

    /// Checks if the value is exactly zero.
    ///
    /// Exact on purpose: a participant whose items cost 0.0000001 still
    /// consumed something and takes part in the discount split.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }

    /// Checks whether two amounts agree within [`MONEY_TOLERANCE`].
    ///
    /// ## Example
    /// ```rust
    /// use tabsplit_core::money::Money;
    ///
    /// let third = Money::new(10.0) * (1.0 / 3.0);
    /// assert!((third + third + third).approx_eq(Money::new(10.0)));
    /// ```
    pub fn approx_eq(&self, other: Money) -> bool {
        (self.0 - other.0).abs() <= MONEY_TOLERANCE
    }

    /// Returns `self × (part / whole)`, or zero when `whole` is zero.
    ///
    /// This is the proportional apportionment rule used for service charge,
    /// both tax components and the round-off adjustment.
    ///
    /// ## Zero Guard
    /// ```text
    /// whole == 0 ──► Money::zero()     (no NaN, no infinity)
    /// whole != 0 ──► self × part / whole
    /// ```
    pub fn apportion(&self, part: Money, whole: Money) -> Money {
        if whole.is_zero() {
            return Money::zero();
        }
        Money(self.0 * (part.0 / whole.0))
    }

    /// Splits the amount into `ways` equal parts, or zero when `ways` is 0.
    ///
    /// ## Example
    /// ```rust
    /// use tabsplit_core::money::Money;
    ///
    /// assert_eq!(Money::new(30.0).split_evenly(3).amount(), 10.0);
    /// assert_eq!(Money::new(30.0).split_evenly(0).amount(), 0.0);
    /// ```
    pub fn split_evenly(&self, ways: usize) -> Money {
        if ways == 0 {
            return Money::zero();
        }
        Money(self.0 / ways as f64)
    }

    /// Rounds half away from zero to `decimals` places. Display only.
    pub fn rounded_to(&self, decimals: u8) -> Money {
        let factor = 10f64.powi(i32::from(decimals));
        Money((self.0 * factor).round() / factor)
    }

    /// Formats with a currency symbol and fixed decimals, e.g. `₹220.00`.
    ///
    /// Negative amounts put the sign before the symbol: `-$5.50`.
    pub fn format_with(&self, symbol: &str, decimals: u8) -> String {
        let rounded = self.rounded_to(decimals).0;
        // -0.00 would otherwise print with a sign
        let sign = if rounded < 0.0 { "-" } else { "" };
        format!(
            "{}{}{:.*}",
            sign,
            symbol,
            usize::from(decimals),
            rounded.abs()
        )
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows two decimals without a currency symbol.
///
/// ## Note
/// This is for debugging and logs. Presentation code uses `format_with`
/// so the symbol and precision follow configuration.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_with("", 2))
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

/// Multiplication by a quantity (unit price × assigned quantity).
impl Mul<f64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: f64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
