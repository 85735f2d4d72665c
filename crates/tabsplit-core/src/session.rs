//! # Split Session
//!
//! Caller-owned state for one bill being split: participants, line items,
//! assignments and adjustments.
//!
//! ## Ownership
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Who Owns What                                        │
//! │                                                                         │
//! │  Caller (CLI, request handler, UI)                                      │
//! │  └── owns Session  ◄── all mutations go through its methods             │
//! │           │                                                             │
//! │           │ &Session (shared borrow, per recomputation)                 │
//! │           ▼                                                             │
//! │  allocation::compute_shares ──► Shares (fresh value, nothing retained)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A session is plain data. Callers that share one across threads wrap it in
//! their own `Mutex`/`RwLock`, the same way a cart is wrapped by the app
//! layer.
//!
//! ## Cascades
//! - Removing a participant drops all of their assignment entries
//! - Removing a line item drops all of its assignment entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::allocation::{compute_shares, find_unassigned_items, Shares};
use crate::assignment::AssignmentMap;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{BillAdjustments, ItemId, LineItem, Participant, ParticipantId};
use crate::validation::{
    has_room_for_item, has_room_for_participant, validate_adjustment, validate_id, validate_name,
    validate_quantity, validate_unit_price,
};
use crate::{MAX_LINE_ITEMS, MAX_PARTICIPANTS};

/// One bill being split.
///
/// ## Invariants
/// - Participant ids are unique; line item ids are unique
/// - Every assignment entry names a participant and item of this session
/// - Per item, assigned quantities never sum above the item's quantity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    participants: Vec<Participant>,
    items: Vec<LineItem>,
    assignments: AssignmentMap,
    adjustments: BillAdjustments,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Creates an empty session.
    pub fn new() -> Self {
        let now = Utc::now();
        Session {
            participants: Vec::new(),
            items: Vec::new(),
            assignments: AssignmentMap::new(),
            adjustments: BillAdjustments::default(),
            created_at: now,
            updated_at: now,
        }
    }

    // =========================================================================
    // Read Access
    // =========================================================================

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn assignments(&self) -> &AssignmentMap {
        &self.assignments
    }

    pub fn adjustments(&self) -> &BillAdjustments {
        &self.adjustments
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn participant(&self, id: &ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| &p.id == id)
    }

    pub fn item(&self, id: &ItemId) -> Option<&LineItem> {
        self.items.iter().find(|i| &i.id == id)
    }

    fn item_position(&self, id: &ItemId) -> CoreResult<usize> {
        self.items
            .iter()
            .position(|i| &i.id == id)
            .ok_or_else(|| CoreError::ItemNotFound(id.to_string()))
    }

    fn require_participant(&self, id: &ParticipantId) -> CoreResult<()> {
        if self.participant(id).is_none() {
            return Err(CoreError::ParticipantNotFound(id.to_string()));
        }
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    // =========================================================================
    // Participants
    // =========================================================================

    /// Adds a participant under a freshly generated id.
    pub fn add_participant(&mut self, name: &str) -> CoreResult<ParticipantId> {
        let id = ParticipantId::generate();
        self.insert_participant(Participant::new(id.clone(), name))?;
        Ok(id)
    }

    /// Adds a participant with a caller-chosen id (e.g. from a bill file).
    pub fn insert_participant(&mut self, participant: Participant) -> CoreResult<()> {
        validate_id("participant id", participant.id.as_str())?;
        let name = validate_name("participant name", &participant.name)?;

        if !has_room_for_participant(self.participants.len()) {
            return Err(CoreError::LimitReached {
                kind: "participants",
                max: MAX_PARTICIPANTS,
            });
        }
        if self.participant(&participant.id).is_some() {
            return Err(CoreError::DuplicateId {
                kind: "participant",
                id: participant.id.to_string(),
            });
        }

        debug!(participant_id = %participant.id, %name, "Participant added");
        self.participants.push(Participant::new(participant.id, name));
        self.touch();
        Ok(())
    }

    /// Removes a participant and every assignment entry they had.
    pub fn remove_participant(&mut self, id: &ParticipantId) -> CoreResult<Participant> {
        let position = self
            .participants
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| CoreError::ParticipantNotFound(id.to_string()))?;

        let removed = self.participants.remove(position);
        self.assignments.remove_participant(id);
        self.touch();

        debug!(participant_id = %id, "Participant removed with assignments");
        Ok(removed)
    }

    // =========================================================================
    // Line Items
    // =========================================================================

    /// Adds a line item under a freshly generated id.
    pub fn add_item(
        &mut self,
        name: &str,
        unit_price: Money,
        quantity: f64,
    ) -> CoreResult<ItemId> {
        let id = ItemId::generate();
        self.insert_item(LineItem::new(id.clone(), name, unit_price, quantity))?;
        Ok(id)
    }

    /// Adds a line item with a caller-chosen id.
    pub fn insert_item(&mut self, item: LineItem) -> CoreResult<()> {
        validate_id("item id", item.id.as_str())?;
        let name = validate_name("item name", &item.name)?;
        validate_unit_price(item.unit_price.amount())?;
        validate_quantity(item.quantity)?;

        if !has_room_for_item(self.items.len()) {
            return Err(CoreError::LimitReached {
                kind: "line items",
                max: MAX_LINE_ITEMS,
            });
        }
        if self.item(&item.id).is_some() {
            return Err(CoreError::DuplicateId {
                kind: "item",
                id: item.id.to_string(),
            });
        }

        debug!(
            item_id = %item.id,
            %name,
            unit_price = %item.unit_price,
            quantity = item.quantity,
            "Line item added"
        );
        self.items.push(LineItem { name, ..item });
        self.touch();
        Ok(())
    }

    /// Removes a line item and every assignment entry for it.
    pub fn remove_item(&mut self, id: &ItemId) -> CoreResult<LineItem> {
        let position = self.item_position(id)?;
        let removed = self.items.remove(position);
        self.assignments.remove_item(id);
        self.touch();

        debug!(item_id = %id, "Line item removed with assignments");
        Ok(removed)
    }

    /// Edits a line item's unit price. Assignments are untouched.
    pub fn update_item_price(&mut self, id: &ItemId, unit_price: Money) -> CoreResult<()> {
        validate_unit_price(unit_price.amount())?;
        let position = self.item_position(id)?;
        let item = &mut self.items[position];

        debug!(item_id = %id, from = %item.unit_price, to = %unit_price, "Unit price edited");
        item.unit_price = unit_price;
        self.touch();
        Ok(())
    }

    /// Quantity of an item nobody has claimed yet.
    pub fn remaining_quantity(&self, id: &ItemId) -> CoreResult<f64> {
        let item = &self.items[self.item_position(id)?];
        Ok(self.assignments.remaining(item))
    }

    // =========================================================================
    // Assignments
    // =========================================================================

    /// Sets how much of an item a participant had.
    ///
    /// The request is clamped to `[0, what others left]`; the granted
    /// quantity is returned. Zero removes the entry.
    ///
    /// ## User Workflow
    /// ```text
    /// Pizza (qty 2): Alice has 1.5
    ///      │
    ///      ▼
    /// assign(pizza, bob, 1.0) ← THIS FUNCTION
    ///      │
    ///      ├── bob unknown?   → Err(ParticipantNotFound)
    ///      ├── pizza unknown? → Err(ItemNotFound)
    ///      │
    ///      ▼
    /// Ok(0.5)  + warn!("Assignment clamped")
    /// ```
    pub fn assign(
        &mut self,
        item_id: &ItemId,
        participant_id: &ParticipantId,
        requested: f64,
    ) -> CoreResult<f64> {
        self.require_participant(participant_id)?;
        let position = self.item_position(item_id)?;
        let item = &self.items[position];

        let granted = self.assignments.assign(item, participant_id, requested);
        if granted != requested {
            warn!(
                item_id = %item_id,
                participant_id = %participant_id,
                requested,
                granted,
                "Assignment clamped"
            );
        }

        self.touch();
        Ok(granted)
    }

    /// Shares an item equally between `participant_ids`, replacing any
    /// existing assignment of that item.
    ///
    /// ## Returns
    /// The quantity each participant received (`quantity / n`).
    pub fn split_item_evenly(
        &mut self,
        item_id: &ItemId,
        participant_ids: &[ParticipantId],
    ) -> CoreResult<f64> {
        for participant_id in participant_ids {
            self.require_participant(participant_id)?;
        }
        let position = self.item_position(item_id)?;

        let mut chosen: Vec<&ParticipantId> = Vec::with_capacity(participant_ids.len());
        for participant_id in participant_ids {
            if !chosen.contains(&participant_id) {
                chosen.push(participant_id);
            }
        }

        self.assignments.remove_item(item_id);
        self.touch();
        if chosen.is_empty() {
            return Ok(0.0);
        }

        let item = &self.items[position];
        let each = item.quantity / chosen.len() as f64;
        for participant_id in &chosen {
            self.assignments.assign(item, participant_id, each);
        }

        debug!(item_id = %item_id, ways = chosen.len(), each, "Item split evenly");
        Ok(each)
    }

    // =========================================================================
    // Adjustments
    // =========================================================================

    /// Replaces the bill-level adjustments.
    pub fn set_adjustments(&mut self, adjustments: BillAdjustments) -> CoreResult<()> {
        validate_adjustment("service charge", adjustments.service_charge.amount())?;
        validate_adjustment("tax a", adjustments.tax_a.amount())?;
        validate_adjustment("tax b", adjustments.tax_b.amount())?;
        validate_adjustment("round off", adjustments.round_off.amount())?;
        validate_adjustment("discount", adjustments.discount.amount())?;

        self.adjustments = adjustments;
        self.touch();
        Ok(())
    }

    // =========================================================================
    // Computation
    // =========================================================================

    /// Recomputes every participant's share from scratch.
    pub fn compute_shares(&self) -> Shares {
        compute_shares(
            &self.participants,
            &self.items,
            &self.assignments,
            &self.adjustments,
        )
    }

    /// Items nobody has claimed any quantity of.
    pub fn unassigned_items(&self) -> Vec<&LineItem> {
        find_unassigned_items(&self.items, &self.assignments)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn dinner() -> (Session, ParticipantId, ParticipantId, ItemId) {
        let mut session = Session::new();
        let alice = session.add_participant("Alice").unwrap();
        let bob = session.add_participant("Bob").unwrap();
        let pizza = session.add_item("Pizza", Money::new(200.0), 2.0).unwrap();
        (session, alice, bob, pizza)
    }

    #[test]
    fn test_add_participant_trims_name() {
        let mut session = Session::new();
        let id = session.add_participant("  Alice  ").unwrap();
        assert_eq!(session.participant(&id).unwrap().name, "Alice");
    }

    #[test]
    fn test_rejects_invalid_input() {
        let mut session = Session::new();
        assert!(matches!(
            session.add_participant(""),
            Err(CoreError::Validation(_))
        ));
        assert!(session.add_item("Soup", Money::new(-1.0), 1.0).is_err());
        assert!(session.add_item("Soup", Money::new(1.0), 0.0).is_err());
        assert!(session.add_item("", Money::new(1.0), 1.0).is_err());
        assert!(session.participants().is_empty());
        assert!(session.items().is_empty());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut session = Session::new();
        session.insert_participant(Participant::new("a", "A")).unwrap();
        let err = session.insert_participant(Participant::new("a", "Other")).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateId { kind: "participant", .. }));

        let item = LineItem::new("x", "X", Money::new(1.0), 1.0);
        session.insert_item(item.clone()).unwrap();
        assert!(matches!(
            session.insert_item(item),
            Err(CoreError::DuplicateId { kind: "item", .. })
        ));
    }

    #[test]
    fn test_participant_limit() {
        let mut session = Session::new();
        for i in 0..MAX_PARTICIPANTS {
            session.add_participant(&format!("P{i}")).unwrap();
        }
        assert!(matches!(
            session.add_participant("One too many"),
            Err(CoreError::LimitReached { max: MAX_PARTICIPANTS, .. })
        ));
    }

    #[test]
    fn test_assign_unknown_ids() {
        let (mut session, alice, _, pizza) = dinner();
        let ghost = ParticipantId::from("ghost");
        assert!(matches!(
            session.assign(&pizza, &ghost, 1.0),
            Err(CoreError::ParticipantNotFound(_))
        ));
        assert!(matches!(
            session.assign(&ItemId::from("nope"), &alice, 1.0),
            Err(CoreError::ItemNotFound(_))
        ));
    }

    #[test]
    fn test_assign_is_clamped() {
        let (mut session, alice, bob, pizza) = dinner();
        assert_eq!(session.assign(&pizza, &alice, 1.5).unwrap(), 1.5);
        assert_eq!(session.assign(&pizza, &bob, 1.0).unwrap(), 0.5);
        assert_eq!(session.remaining_quantity(&pizza).unwrap(), 0.0);
    }

    #[test]
    fn test_remove_participant_cascades() {
        let (mut session, alice, bob, pizza) = dinner();
        session.assign(&pizza, &alice, 1.0).unwrap();
        session.assign(&pizza, &bob, 1.0).unwrap();

        let removed = session.remove_participant(&alice).unwrap();
        assert_eq!(removed.name, "Alice");
        assert!(!session.assignments().references_participant(&alice));

        let shares = session.compute_shares();
        assert!(shares.get(&alice).is_none());
        assert!(shares.iter().all(|s| s.participant_id != alice));
        assert_eq!(shares.bill_subtotal().amount(), 200.0);

        // Alice's half is free again
        assert_eq!(session.remaining_quantity(&pizza).unwrap(), 1.0);
        assert!(session.remove_participant(&alice).is_err());
    }

    #[test]
    fn test_remove_item_cascades() {
        let (mut session, alice, _, pizza) = dinner();
        session.assign(&pizza, &alice, 2.0).unwrap();
        session.remove_item(&pizza).unwrap();

        assert!(session.assignments().is_empty());
        assert!(session.compute_shares().bill_subtotal().is_zero());
    }

    #[test]
    fn test_update_item_price() {
        let (mut session, alice, _, pizza) = dinner();
        session.assign(&pizza, &alice, 1.0).unwrap();
        session.update_item_price(&pizza, Money::new(150.0)).unwrap();

        let shares = session.compute_shares();
        assert_eq!(shares.get(&alice).unwrap().subtotal.amount(), 150.0);
        assert!(session.update_item_price(&pizza, Money::new(f64::NAN)).is_err());
    }

    #[test]
    fn test_split_item_evenly_replaces_existing() {
        let mut session = Session::new();
        let a = session.add_participant("A").unwrap();
        let b = session.add_participant("B").unwrap();
        let c = session.add_participant("C").unwrap();
        let cake = session.add_item("Cake", Money::new(12.0), 1.0).unwrap();

        session.assign(&cake, &a, 1.0).unwrap();
        let each = session
            .split_item_evenly(&cake, &[b.clone(), c.clone(), b.clone()])
            .unwrap();

        assert_eq!(each, 0.5);
        assert_eq!(session.assignments().quantity(&cake, &a), 0.0);
        assert_eq!(session.assignments().quantity(&cake, &b), 0.5);
        assert_eq!(session.assignments().quantity(&cake, &c), 0.5);
    }

    #[test]
    fn test_split_item_evenly_with_nobody_clears_item() {
        let (mut session, alice, _, pizza) = dinner();
        session.assign(&pizza, &alice, 1.0).unwrap();
        assert_eq!(session.split_item_evenly(&pizza, &[]).unwrap(), 0.0);
        assert_eq!(session.unassigned_items().len(), 1);
    }

    #[test]
    fn test_set_adjustments_rejects_non_finite() {
        let mut session = Session::new();
        let bad = BillAdjustments {
            tax_a: Money::new(f64::INFINITY),
            ..Default::default()
        };
        assert!(session.set_adjustments(bad).is_err());
        assert!(session.adjustments().tax_a.is_zero());
    }

    #[test]
    fn test_unassigned_items_warning_does_not_block_computation() {
        let (mut session, alice, bob, pizza) = dinner();
        let soda = session.add_item("Soda", Money::new(30.0), 2.0).unwrap();
        session.assign(&pizza, &alice, 1.0).unwrap();
        session.assign(&pizza, &bob, 1.0).unwrap();

        let unassigned: Vec<&ItemId> = session
            .unassigned_items()
            .into_iter()
            .map(|i| &i.id)
            .collect();
        assert_eq!(unassigned, vec![&soda]);

        let shares = session.compute_shares();
        assert_eq!(shares.bill_subtotal().amount(), 400.0);
    }

    #[test]
    fn test_mutations_touch_updated_at() {
        let mut session = Session::new();
        let before = session.updated_at();
        session.add_participant("A").unwrap();
        assert!(session.updated_at() >= before);
        assert!(session.created_at() <= session.updated_at());
    }
}
