//! # Allocation Engine
//!
//! Turns participants, line items, assignments and bill adjustments into a
//! per-participant breakdown.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       compute_shares()                                  │
//! │                                                                         │
//! │  1. One zeroed Share per participant, in input order                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  2. For each item (input order):                                        │
//! │       assigned qty to known participants == 0 ? ──► skip item           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  3. For each participant with qty ≠ 0:                                  │
//! │       cost = unit_price × qty ──► ItemDetail, subtotal                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  4. service, tax_a, tax_b, round_off:                                   │
//! │       amount × (subtotal / bill_subtotal)    (0 if bill_subtotal == 0) │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  5. discount ÷ count(subtotal ≠ 0), only to those participants          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  6. total = subtotal + adjustments − discount   (no reconciliation)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Purity
//! Everything here takes shared references and returns fresh values. No
//! state survives a call, so the functions are safe to call concurrently
//! from any number of threads.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::assignment::AssignmentMap;
use crate::money::Money;
use crate::types::{BillAdjustments, ItemDetail, LineItem, Participant, ParticipantId, Share};

// =============================================================================
// Shares
// =============================================================================

/// Ordered mapping from participant id to [`Share`].
///
/// Iteration order matches the participant order handed to
/// [`compute_shares`]; renderers and exporters depend on it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Shares {
    shares: Vec<Share>,
    bill_subtotal: Money,
}

impl Shares {
    /// Share of one participant, if they were part of the computation.
    pub fn get(&self, participant_id: &ParticipantId) -> Option<&Share> {
        self.shares.iter().find(|s| &s.participant_id == participant_id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Share> {
        self.shares.iter()
    }

    pub fn len(&self) -> usize {
        self.shares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    /// Sum of every participant's subtotal.
    pub fn bill_subtotal(&self) -> Money {
        self.bill_subtotal
    }

    /// Sum of every participant's total.
    pub fn grand_total(&self) -> Money {
        self.shares.iter().map(|s| s.total).sum()
    }

    /// How far the participant totals are from the bill's net amount.
    ///
    /// Read-only diagnostic: nothing is corrected. A non-zero value comes
    /// from floating point apportionment, or from adjustments that could
    /// not be apportioned because nobody was assigned anything.
    pub fn unreconciled_difference(&self, adjustments: &BillAdjustments) -> Money {
        self.grand_total() - adjustments.net_amount(self.bill_subtotal)
    }
}

impl<'a> IntoIterator for &'a Shares {
    type Item = &'a Share;
    type IntoIter = std::slice::Iter<'a, Share>;

    fn into_iter(self) -> Self::IntoIter {
        self.shares.iter()
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Computes every participant's share of the bill.
///
/// Assignments naming participants that are not in `participants` are
/// ignored. Negative prices, quantities and adjustments are used as given.
///
/// ## Example
/// ```rust
/// use tabsplit_core::{compute_shares, AssignmentMap, BillAdjustments, LineItem, Money, Participant};
///
/// let people = vec![Participant::new("a", "A"), Participant::new("b", "B")];
/// let pizza = LineItem::new("pizza", "Pizza", Money::new(200.0), 2.0);
/// let mut assignments = AssignmentMap::new();
/// assignments.assign(&pizza, &"a".into(), 1.0);
/// assignments.assign(&pizza, &"b".into(), 1.0);
/// let adjustments = BillAdjustments {
///     service_charge: Money::new(20.0),
///     ..Default::default()
/// };
///
/// let shares = compute_shares(&people, &[pizza], &assignments, &adjustments);
/// assert_eq!(shares.get(&"a".into()).unwrap().total.amount(), 210.0);
/// ```
pub fn compute_shares(
    participants: &[Participant],
    items: &[LineItem],
    assignments: &AssignmentMap,
    adjustments: &BillAdjustments,
) -> Shares {
    let mut shares: Vec<Share> = participants.iter().map(Share::empty).collect();

    // First occurrence wins if a caller passes duplicate ids
    let mut index: HashMap<&ParticipantId, usize> = HashMap::with_capacity(participants.len());
    for (position, participant) in participants.iter().enumerate() {
        index.entry(&participant.id).or_insert(position);
    }

    for item in items {
        let known: Vec<(usize, f64)> = assignments
            .for_item(&item.id)
            .filter_map(|(participant_id, qty)| index.get(participant_id).map(|&i| (i, qty)))
            .collect();

        let assigned: f64 = known.iter().map(|(_, qty)| qty).sum();
        if assigned == 0.0 {
            continue;
        }

        for (position, qty) in known {
            if qty == 0.0 {
                continue;
            }
            let cost = item.cost_of(qty);
            let share = &mut shares[position];
            share.items.push(ItemDetail {
                item_id: item.id.clone(),
                name: item.name.clone(),
                quantity: qty,
                cost,
            });
            share.subtotal += cost;
        }
    }

    let bill_subtotal: Money = shares.iter().map(|s| s.subtotal).sum();
    let contributors = shares.iter().filter(|s| !s.subtotal.is_zero()).count();
    let discount_each = adjustments.discount.split_evenly(contributors);

    for share in &mut shares {
        share.service_charge = adjustments.service_charge.apportion(share.subtotal, bill_subtotal);
        share.tax_a = adjustments.tax_a.apportion(share.subtotal, bill_subtotal);
        share.tax_b = adjustments.tax_b.apportion(share.subtotal, bill_subtotal);
        share.round_off = adjustments.round_off.apportion(share.subtotal, bill_subtotal);
        share.discount = if share.subtotal.is_zero() {
            Money::zero()
        } else {
            discount_each
        };
        share.total = share.subtotal + share.adjustments() - share.discount;
    }

    Shares {
        shares,
        bill_subtotal,
    }
}

/// Items nobody has been assigned any quantity of.
///
/// Used by callers to warn before finalizing a split. [`compute_shares`]
/// never calls it and never refuses to run because of unassigned items.
pub fn find_unassigned_items<'a>(
    items: &'a [LineItem],
    assignments: &AssignmentMap,
) -> Vec<&'a LineItem> {
    items
        .iter()
        .filter(|item| assignments.assigned_total(&item.id) == 0.0)
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MONEY_TOLERANCE;

    fn people(ids: &[&str]) -> Vec<Participant> {
        ids.iter()
            .map(|id| Participant::new(*id, id.to_uppercase()))
            .collect()
    }

    fn pid(id: &str) -> ParticipantId {
        ParticipantId::from(id)
    }

    #[test]
    fn test_empty_participants_gives_empty_result() {
        let item = LineItem::new("x", "X", Money::new(5.0), 1.0);
        let shares = compute_shares(&[], &[item], &AssignmentMap::new(), &BillAdjustments::default());
        assert!(shares.is_empty());
        assert!(shares.bill_subtotal().is_zero());
    }

    #[test]
    fn test_pizza_scenario() {
        let participants = people(&["a", "b"]);
        let pizza = LineItem::new("pizza", "Pizza", Money::new(200.0), 2.0);
        let mut assignments = AssignmentMap::new();
        assignments.assign(&pizza, &pid("a"), 1.0);
        assignments.assign(&pizza, &pid("b"), 1.0);
        let adjustments = BillAdjustments {
            service_charge: Money::new(20.0),
            tax_a: Money::new(10.0),
            tax_b: Money::new(10.0),
            ..Default::default()
        };

        let shares = compute_shares(&participants, &[pizza], &assignments, &adjustments);

        assert_eq!(shares.bill_subtotal().amount(), 400.0);
        for id in ["a", "b"] {
            let share = shares.get(&pid(id)).unwrap();
            assert_eq!(share.subtotal.amount(), 200.0);
            assert_eq!(share.service_charge.amount(), 10.0);
            assert_eq!(share.tax_a.amount(), 5.0);
            assert_eq!(share.tax_b.amount(), 5.0);
            assert_eq!(share.total.amount(), 220.0);
            assert_eq!(share.items.len(), 1);
            assert_eq!(share.items[0].name, "Pizza");
            assert_eq!(share.items[0].quantity, 1.0);
        }
    }

    #[test]
    fn test_output_follows_participant_order() {
        let participants = people(&["zed", "amy", "kim"]);
        let shares = compute_shares(
            &participants,
            &[],
            &AssignmentMap::new(),
            &BillAdjustments::default(),
        );
        let order: Vec<&str> = shares.iter().map(|s| s.participant_id.as_str()).collect();
        assert_eq!(order, vec!["zed", "amy", "kim"]);
    }

    #[test]
    fn test_item_details_follow_item_order() {
        let participants = people(&["a"]);
        let soup = LineItem::new("soup", "Soup", Money::new(3.0), 1.0);
        let bread = LineItem::new("bread", "Bread", Money::new(1.0), 1.0);
        let mut assignments = AssignmentMap::new();
        assignments.assign(&bread, &pid("a"), 1.0);
        assignments.assign(&soup, &pid("a"), 1.0);

        let shares = compute_shares(
            &participants,
            &[soup, bread],
            &assignments,
            &BillAdjustments::default(),
        );
        let names: Vec<&str> = shares
            .get(&pid("a"))
            .unwrap()
            .items
            .iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(names, vec!["Soup", "Bread"]);
    }

    #[test]
    fn test_proportional_apportionment() {
        let participants = people(&["a", "b"]);
        let steak = LineItem::new("steak", "Steak", Money::new(300.0), 1.0);
        let salad = LineItem::new("salad", "Salad", Money::new(100.0), 1.0);
        let mut assignments = AssignmentMap::new();
        assignments.assign(&steak, &pid("a"), 1.0);
        assignments.assign(&salad, &pid("b"), 1.0);
        let adjustments = BillAdjustments {
            service_charge: Money::new(40.0),
            round_off: Money::new(-0.4),
            ..Default::default()
        };

        let shares = compute_shares(&participants, &[steak, salad], &assignments, &adjustments);
        let a = shares.get(&pid("a")).unwrap();
        let b = shares.get(&pid("b")).unwrap();

        assert_eq!(a.service_charge.amount(), 30.0);
        assert_eq!(b.service_charge.amount(), 10.0);
        assert!(a.round_off.approx_eq(Money::new(-0.3)));
        assert!(b.round_off.approx_eq(Money::new(-0.1)));
    }

    #[test]
    fn test_discount_split_equally_among_contributors() {
        let participants = people(&["a", "b", "c", "d"]);
        let meal = LineItem::new("meal", "Meal", Money::new(10.0), 6.0);
        let mut assignments = AssignmentMap::new();
        assignments.assign(&meal, &pid("a"), 1.0);
        assignments.assign(&meal, &pid("b"), 2.0);
        assignments.assign(&meal, &pid("c"), 3.0);
        let adjustments = BillAdjustments {
            discount: Money::new(30.0),
            ..Default::default()
        };

        let shares = compute_shares(&participants, &[meal], &assignments, &adjustments);

        for id in ["a", "b", "c"] {
            assert_eq!(shares.get(&pid(id)).unwrap().discount.amount(), 10.0);
        }
        let d = shares.get(&pid("d")).unwrap();
        assert!(d.discount.is_zero());
        assert!(d.total.is_zero());
        assert_eq!(shares.get(&pid("a")).unwrap().total.amount(), 0.0);
    }

    #[test]
    fn test_zero_subtotal_bill_apportions_nothing() {
        let participants = people(&["a", "b"]);
        let item = LineItem::new("x", "X", Money::new(50.0), 1.0);
        let adjustments = BillAdjustments {
            service_charge: Money::new(20.0),
            tax_a: Money::new(5.0),
            tax_b: Money::new(5.0),
            round_off: Money::new(0.2),
            discount: Money::new(10.0),
        };

        let shares = compute_shares(&participants, &[item], &AssignmentMap::new(), &adjustments);

        for share in &shares {
            assert!(share.service_charge.is_zero());
            assert!(share.tax_a.is_zero());
            assert!(share.round_off.is_zero());
            assert!(share.discount.is_zero());
            assert!(share.total.is_zero());
            assert!(share.total.is_finite());
        }
    }

    #[test]
    fn test_unknown_participant_in_assignments_is_ignored() {
        let participants = people(&["a"]);
        let item = LineItem::new("x", "X", Money::new(10.0), 2.0);
        let mut assignments = AssignmentMap::new();
        assignments.assign(&item, &pid("a"), 1.0);
        assignments.assign(&item, &pid("ghost"), 1.0);

        let shares = compute_shares(&participants, &[item], &assignments, &BillAdjustments::default());

        assert_eq!(shares.len(), 1);
        assert_eq!(shares.bill_subtotal().amount(), 10.0);
        assert!(shares.get(&pid("ghost")).is_none());
    }

    #[test]
    fn test_item_assigned_only_to_unknown_participant_is_skipped() {
        let participants = people(&["a"]);
        let item = LineItem::new("x", "X", Money::new(10.0), 1.0);
        let mut assignments = AssignmentMap::new();
        assignments.assign(&item, &pid("ghost"), 1.0);

        let shares = compute_shares(&participants, &[item], &assignments, &BillAdjustments::default());
        assert!(shares.get(&pid("a")).unwrap().items.is_empty());
    }

    #[test]
    fn test_negative_price_contributes_negative_cost() {
        let participants = people(&["a"]);
        let coupon = LineItem::new("coupon", "Coupon", Money::new(-5.0), 1.0);
        let mut assignments = AssignmentMap::new();
        assignments.assign(&coupon, &pid("a"), 1.0);

        let shares = compute_shares(&participants, &[coupon], &assignments, &BillAdjustments::default());
        assert_eq!(shares.get(&pid("a")).unwrap().subtotal.amount(), -5.0);
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let participants = people(&["a", "b"]);
        let items = vec![LineItem::new("x", "X", Money::new(10.0), 2.0)];
        let mut assignments = AssignmentMap::new();
        assignments.assign(&items[0], &pid("a"), 2.0);
        let adjustments = BillAdjustments {
            discount: Money::new(1.0),
            ..Default::default()
        };

        let (p0, i0, a0) = (participants.clone(), items.clone(), assignments.clone());
        let d0 = adjustments;
        let first = compute_shares(&participants, &items, &assignments, &adjustments);
        let second = compute_shares(&participants, &items, &assignments, &adjustments);

        assert_eq!(participants, p0);
        assert_eq!(items, i0);
        assert_eq!(assignments, a0);
        assert_eq!(adjustments, d0);
        assert_eq!(first, second);
    }

    #[test]
    fn test_thirds_sum_back_to_line_total() {
        let participants = people(&["a", "b", "c"]);
        let cake = LineItem::new("cake", "Cake", Money::new(10.0), 1.0);
        let mut assignments = AssignmentMap::new();
        for id in ["a", "b", "c"] {
            assignments.assign(&cake, &pid(id), 1.0 / 3.0);
        }

        let shares = compute_shares(&participants, &[cake.clone()], &assignments, &BillAdjustments::default());
        let item_cost: Money = shares.iter().flat_map(|s| s.items.iter()).map(|d| d.cost).sum();
        assert!((item_cost - cake.line_total()).amount().abs() <= MONEY_TOLERANCE);
    }

    #[test]
    fn test_find_unassigned_items() {
        let a = LineItem::new("a", "A", Money::new(1.0), 1.0);
        let b = LineItem::new("b", "B", Money::new(1.0), 1.0);
        let c = LineItem::new("c", "C", Money::new(1.0), 1.0);
        let mut assignments = AssignmentMap::new();
        assignments.assign(&b, &pid("x"), 0.5);

        let items = vec![a, b, c];
        let unassigned: Vec<&str> = find_unassigned_items(&items, &assignments)
            .into_iter()
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(unassigned, vec!["A", "C"]);
    }

    #[test]
    fn test_unreconciled_difference_is_zero_for_exact_amounts() {
        let participants = people(&["a", "b"]);
        let pizza = LineItem::new("pizza", "Pizza", Money::new(200.0), 2.0);
        let mut assignments = AssignmentMap::new();
        assignments.assign(&pizza, &pid("a"), 1.0);
        assignments.assign(&pizza, &pid("b"), 1.0);
        let adjustments = BillAdjustments {
            service_charge: Money::new(20.0),
            discount: Money::new(10.0),
            ..Default::default()
        };

        let shares = compute_shares(&participants, &[pizza], &assignments, &adjustments);
        assert!(shares.unreconciled_difference(&adjustments).is_zero());
        assert_eq!(shares.grand_total().amount(), 410.0);
    }
}
