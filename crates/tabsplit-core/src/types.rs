//! # Domain Types
//!
//! Core domain types used throughout tabsplit.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Inputs (caller-owned)                                                  │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────────┐   │
//! │  │  Participant    │   │    LineItem     │   │  BillAdjustments    │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────────  │   │
//! │  │  id             │   │  id             │   │  service_charge     │   │
//! │  │  name           │   │  name           │   │  tax_a, tax_b       │   │
//! │  └─────────────────┘   │  unit_price     │   │  round_off          │   │
//! │                        │  quantity       │   │  discount           │   │
//! │                        └─────────────────┘   └─────────────────────┘   │
//! │                                                                         │
//! │  Outputs (derived, recomputed on every call)                            │
//! │  ┌─────────────────────────────┐   ┌─────────────────┐                 │
//! │  │  Share                      │──►│   ItemDetail    │                 │
//! │  │  subtotal, adjustments,     │   │  name, qty,     │                 │
//! │  │  discount, total            │   │  cost           │                 │
//! │  └─────────────────────────────┘   └─────────────────┘                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Participants and line items carry an opaque string id. Ids generated by
//! the session are UUID v4; ids loaded from a bill file may be any
//! non-empty string ("alice", "pizza").

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Identifiers
// =============================================================================

/// Identifier of a participant, unique within a session.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Generates a fresh UUID v4 id.
    pub fn generate() -> Self {
        ParticipantId(uuid::Uuid::new_v4().to_string())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ParticipantId {
    fn from(id: &str) -> Self {
        ParticipantId(id.to_string())
    }
}

impl From<String> for ParticipantId {
    fn from(id: String) -> Self {
        ParticipantId(id)
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a line item, unique within a session.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct ItemId(String);

impl ItemId {
    /// Generates a fresh UUID v4 id.
    pub fn generate() -> Self {
        ItemId(uuid::Uuid::new_v4().to_string())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        ItemId(id.to_string())
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        ItemId(id)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Participant
// =============================================================================

/// A person sharing the bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Participant {
    pub id: ParticipantId,

    /// Display name shown in breakdowns and export headers.
    pub name: String,
}

impl Participant {
    pub fn new(id: impl Into<ParticipantId>, name: impl Into<String>) -> Self {
        Participant {
            id: id.into(),
            name: name.into(),
        }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// A purchasable entry on the bill.
///
/// ## Mutability
/// - `unit_price` can be edited after creation (typo on the receipt)
/// - `quantity` is fixed at creation; assignments are clamped against it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    pub id: ItemId,

    pub name: String,

    /// Price of one unit.
    pub unit_price: Money,

    /// Total quantity on the bill. May be fractional (1.5 kg).
    pub quantity: f64,
}

impl LineItem {
    pub fn new(
        id: impl Into<ItemId>,
        name: impl Into<String>,
        unit_price: Money,
        quantity: f64,
    ) -> Self {
        LineItem {
            id: id.into(),
            name: name.into(),
            unit_price,
            quantity,
        }
    }

    /// Cost of `quantity` units of this item.
    #[inline]
    pub fn cost_of(&self, quantity: f64) -> Money {
        self.unit_price * quantity
    }

    /// Cost of the full quantity on the bill.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.cost_of(self.quantity)
    }
}

// =============================================================================
// Bill Adjustments
// =============================================================================

/// Bill-level amounts entered once per calculation.
///
/// ## Apportionment Rules
/// ```text
/// ┌──────────────────┬───────────────────────────────────────────────────┐
/// │ Field            │ Rule                                              │
/// ├──────────────────┼───────────────────────────────────────────────────┤
/// │ service_charge   │ proportional to participant subtotal              │
/// │ tax_a            │ proportional to participant subtotal              │
/// │ tax_b            │ proportional to participant subtotal              │
/// │ round_off        │ proportional to participant subtotal (signed)     │
/// │ discount         │ equal split among participants with subtotal ≠ 0  │
/// └──────────────────┴───────────────────────────────────────────────────┘
/// ```
///
/// Every field is mandatory and defaults to zero here, so no read site
/// needs an "or zero" fallback. Missing JSON fields also deserialize as zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct BillAdjustments {
    pub service_charge: Money,

    /// First tax component (e.g. central GST).
    pub tax_a: Money,

    /// Second tax component (e.g. state GST). Reported separately from
    /// `tax_a` but apportioned identically.
    pub tax_b: Money,

    /// Signed rounding adjustment printed on the bill.
    pub round_off: Money,

    pub discount: Money,
}

impl BillAdjustments {
    /// Net amount the bill would come to for a given items subtotal.
    ///
    /// `subtotal + service + tax_a + tax_b + round_off − discount`
    pub fn net_amount(&self, subtotal: Money) -> Money {
        subtotal + self.service_charge + self.tax_a + self.tax_b + self.round_off
            - self.discount
    }
}

// =============================================================================
// Share (derived)
// =============================================================================

/// One line in a participant's breakdown: what they had and what it cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ItemDetail {
    pub item_id: ItemId,
    pub name: String,
    pub quantity: f64,
    pub cost: Money,
}

/// Computed monetary breakdown for one participant.
///
/// Shares are rebuilt from scratch on every computation and never mutated
/// incrementally by callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Share {
    pub participant_id: ParticipantId,
    pub name: String,
    pub items: Vec<ItemDetail>,
    pub subtotal: Money,
    pub service_charge: Money,
    pub tax_a: Money,
    pub tax_b: Money,
    pub round_off: Money,
    pub discount: Money,
    pub total: Money,
}

impl Share {
    /// A zeroed share with no items.
    pub fn empty(participant: &Participant) -> Self {
        Share {
            participant_id: participant.id.clone(),
            name: participant.name.clone(),
            items: Vec::new(),
            subtotal: Money::zero(),
            service_charge: Money::zero(),
            tax_a: Money::zero(),
            tax_b: Money::zero(),
            round_off: Money::zero(),
            discount: Money::zero(),
            total: Money::zero(),
        }
    }

    /// Sum of the proportional adjustments (everything except discount).
    pub fn adjustments(&self) -> Money {
        self.service_charge + self.tax_a + self.tax_b + self.round_off
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_item_costs() {
        let item = LineItem::new("pizza", "Pizza", Money::new(200.0), 2.0);
        assert_eq!(item.cost_of(0.5).amount(), 100.0);
        assert_eq!(item.line_total().amount(), 400.0);
    }

    #[test]
    fn test_adjustments_default_to_zero() {
        let adj = BillAdjustments::default();
        assert!(adj.service_charge.is_zero());
        assert!(adj.tax_a.is_zero());
        assert!(adj.tax_b.is_zero());
        assert!(adj.round_off.is_zero());
        assert!(adj.discount.is_zero());
    }

    #[test]
    fn test_adjustments_missing_json_fields_are_zero() {
        let adj: BillAdjustments =
            serde_json::from_str(r#"{"service_charge": 20, "discount": 5}"#).unwrap();
        assert_eq!(adj.service_charge.amount(), 20.0);
        assert_eq!(adj.discount.amount(), 5.0);
        assert!(adj.tax_a.is_zero());
        assert!(adj.round_off.is_zero());
    }

    #[test]
    fn test_net_amount() {
        let adj = BillAdjustments {
            service_charge: Money::new(20.0),
            tax_a: Money::new(10.0),
            tax_b: Money::new(10.0),
            round_off: Money::new(-0.5),
            discount: Money::new(30.0),
        };
        assert_eq!(adj.net_amount(Money::new(400.0)).amount(), 409.5);
    }

    #[test]
    fn test_generated_ids_are_uuids() {
        let a = ParticipantId::generate();
        let b = ParticipantId::generate();
        assert_ne!(a, b);
        assert!(uuid::Uuid::parse_str(a.as_str()).is_ok());
        assert!(uuid::Uuid::parse_str(ItemId::generate().as_str()).is_ok());
    }

    #[test]
    fn test_ids_serialize_as_strings() {
        let id = ParticipantId::from("alice");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""alice""#);
        assert_eq!(id.to_string(), "alice");
    }
}
