//! # Assignment Map
//!
//! Records who consumed how much of each line item.
//!
//! ## Shape
//! ```text
//! AssignmentMap
//! ├── "pizza" ──► { "alice": 1.0, "bob": 1.0 }
//! ├── "naan"  ──► { "alice": 0.5, "carol": 2.5 }
//! └── (items with no entries are simply absent)
//! ```
//!
//! ## Invariant
//! For every item, the sum of assigned quantities never exceeds the item's
//! total quantity. [`AssignmentMap::assign`] enforces it on every mutation
//! by routing the request through [`clamp_assignment_update`]. A stored
//! quantity of zero is never kept: assigning 0 removes the entry.
//!
//! ## Update Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  User drags the "Pizza" slider for Bob to 1.5 (pizza qty = 2)           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  clamp_assignment_update(pizza, map, bob, 1.5)                          │
//! │       │   others (alice) = 1.0 → max allowed = 2.0 − 1.0 = 1.0          │
//! │       ▼                                                                 │
//! │  stored: bob = 1.0   (request clamped, caller may warn)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::{ItemId, LineItem, ParticipantId};

/// Sparse item → participant → quantity mapping.
///
/// `BTreeMap` keeps serialization stable; the engine never relies on this
/// map's order, only on the participant and item sequences it is given.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssignmentMap {
    entries: BTreeMap<ItemId, BTreeMap<ParticipantId, f64>>,
}

impl AssignmentMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Quantity of `item_id` assigned to `participant_id` (0 if absent).
    pub fn quantity(&self, item_id: &ItemId, participant_id: &ParticipantId) -> f64 {
        self.entries
            .get(item_id)
            .and_then(|per_participant| per_participant.get(participant_id))
            .copied()
            .unwrap_or(0.0)
    }

    /// All (participant, quantity) entries for an item.
    pub fn for_item<'a>(
        &'a self,
        item_id: &ItemId,
    ) -> impl Iterator<Item = (&'a ParticipantId, f64)> + 'a {
        self.entries
            .get(item_id)
            .into_iter()
            .flat_map(|per_participant| per_participant.iter().map(|(p, q)| (p, *q)))
    }

    /// Sum of quantities assigned to anyone for an item.
    pub fn assigned_total(&self, item_id: &ItemId) -> f64 {
        self.for_item(item_id).map(|(_, qty)| qty).sum()
    }

    /// Sum of quantities assigned for an item to everyone except `participant_id`.
    pub fn assigned_to_others(&self, item_id: &ItemId, participant_id: &ParticipantId) -> f64 {
        self.for_item(item_id)
            .filter(|(p, _)| *p != participant_id)
            .map(|(_, qty)| qty)
            .sum()
    }

    /// Quantity of an item nobody has claimed yet (never negative).
    pub fn remaining(&self, item: &LineItem) -> f64 {
        (item.quantity - self.assigned_total(&item.id)).max(0.0)
    }

    /// Sets a participant's quantity for an item, clamped to what is left.
    ///
    /// ## Returns
    /// The quantity actually stored. Compare it with `requested` to detect
    /// a clamp.
    pub fn assign(
        &mut self,
        item: &LineItem,
        participant_id: &ParticipantId,
        requested: f64,
    ) -> f64 {
        let granted = clamp_assignment_update(item, self, participant_id, requested);

        if granted == 0.0 {
            self.unassign(&item.id, participant_id);
        } else {
            self.entries
                .entry(item.id.clone())
                .or_default()
                .insert(participant_id.clone(), granted);
        }

        granted
    }

    /// Drops one participant's entry for an item.
    pub fn unassign(&mut self, item_id: &ItemId, participant_id: &ParticipantId) {
        if let Some(per_participant) = self.entries.get_mut(item_id) {
            per_participant.remove(participant_id);
            if per_participant.is_empty() {
                self.entries.remove(item_id);
            }
        }
    }

    /// Drops every entry of a participant (cascade on participant removal).
    pub fn remove_participant(&mut self, participant_id: &ParticipantId) {
        self.entries.retain(|_, per_participant| {
            per_participant.remove(participant_id);
            !per_participant.is_empty()
        });
    }

    /// Drops every entry of an item (cascade on item removal).
    pub fn remove_item(&mut self, item_id: &ItemId) {
        self.entries.remove(item_id);
    }

    /// True if any entry mentions the participant.
    pub fn references_participant(&self, participant_id: &ParticipantId) -> bool {
        self.entries
            .values()
            .any(|per_participant| per_participant.contains_key(participant_id))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Item total as `assigned_total` would report it after storing
    /// `quantity` for `participant_id`.
    fn total_with(&self, item_id: &ItemId, participant_id: &ParticipantId, quantity: f64) -> f64 {
        let mut per_participant = self.entries.get(item_id).cloned().unwrap_or_default();
        if quantity == 0.0 {
            per_participant.remove(participant_id);
        } else {
            per_participant.insert(participant_id.clone(), quantity);
        }
        per_participant.values().copied().sum()
    }
}

/// Largest quantity `participant_id` may hold of `item`, given everyone else.
///
/// ## Formula
/// ```text
/// max_allowed = max(0, item.quantity − Σ assignments[item] (other participants))
/// result      = min(max(0, requested), max_allowed)
/// ```
///
/// The floor on `max_allowed` departs from the plain formula: for a map that
/// already over-assigns an item (e.g. deserialized that way) the plain
/// formula returns a negative quantity, this returns 0. Such a map can only
/// shrink. NaN requests resolve to zero.
///
/// ## Float Bound
/// `quantity − others` added back onto `others` can land a few ulps above
/// `quantity`. The result is stepped down until the item total, summed the
/// way [`AssignmentMap::assigned_total`] sums it, fits within `quantity`.
pub fn clamp_assignment_update(
    item: &LineItem,
    assignments: &AssignmentMap,
    participant_id: &ParticipantId,
    requested: f64,
) -> f64 {
    let taken_by_others = assignments.assigned_to_others(&item.id, participant_id);
    let max_allowed = (item.quantity - taken_by_others).max(0.0);
    let mut granted = requested.max(0.0).min(max_allowed);

    for _ in 0..MAX_ULP_STEPS {
        if granted == 0.0
            || assignments.total_with(&item.id, participant_id, granted) <= item.quantity
        {
            return granted;
        }
        // Positive finite f64: the previous bit pattern is the next value down
        granted = f64::from_bits(granted.to_bits() - 1);
    }

    // Others alone stay within quantity (max_allowed > 0), so zero always fits
    0.0
}

/// Steps tried before giving up on a fractional grant.
const MAX_ULP_STEPS: usize = 64;

// =============================================================================
// Unit Tests
// =============================================================================
