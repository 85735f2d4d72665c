//! # tabsplit-core: Pure Bill-Splitting Logic
//!
//! This crate is the **heart** of tabsplit. It contains the allocation
//! engine and the session bookkeeping around it, as pure code with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        tabsplit Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    tabsplit-cli                                 │   │
//! │  │    bill.json ──► Session ──► text breakdown / JSON report       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ tabsplit-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │  ┌──────────┐ ┌────────────┐ ┌────────────┐ ┌──────────────┐   │   │
//! │  │  │  types   │ │ assignment │ │ allocation │ │   session    │   │   │
//! │  │  │  Share   │ │  clamping  │ │  engine    │ │ caller state │   │   │
//! │  │  └──────────┘ └────────────┘ └────────────┘ └──────────────┘   │   │
//! │  │  ┌──────────┐ ┌────────────┐ ┌────────────┐                    │   │
//! │  │  │  money   │ │ validation │ │   export   │                    │   │
//! │  │  └──────────┘ └────────────┘ └────────────┘                    │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO GLOBAL STATE • PURE FUNCTIONS                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Participant, LineItem, BillAdjustments, Share
//! - [`money`] - Money type with apportionment helpers
//! - [`assignment`] - Assignment map and the clamping rule
//! - [`allocation`] - `compute_shares` and `find_unassigned_items`
//! - [`session`] - Caller-owned state with cascading removals
//! - [`export`] - Summary table and cost matrix
//! - [`validation`] - Input checks used by the session
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use tabsplit_core::{BillAdjustments, Money, Session};
//!
//! let mut session = Session::new();
//! let a = session.add_participant("A").unwrap();
//! let b = session.add_participant("B").unwrap();
//! let pizza = session.add_item("Pizza", Money::new(200.0), 2.0).unwrap();
//! session.assign(&pizza, &a, 1.0).unwrap();
//! session.assign(&pizza, &b, 1.0).unwrap();
//! session
//!     .set_adjustments(BillAdjustments {
//!         service_charge: Money::new(20.0),
//!         tax_a: Money::new(10.0),
//!         tax_b: Money::new(10.0),
//!         ..Default::default()
//!     })
//!     .unwrap();
//!
//! let shares = session.compute_shares();
//! assert_eq!(shares.get(&a).unwrap().total.amount(), 220.0);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod allocation;
pub mod assignment;
pub mod error;
pub mod export;
pub mod money;
pub mod session;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use allocation::{compute_shares, find_unassigned_items, Shares};
pub use assignment::{clamp_assignment_update, AssignmentMap};
pub use error::{CoreError, CoreResult, ValidationError};
pub use export::SplitReport;
pub use money::Money;
pub use session::Session;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Tolerance for comparing amounts that went through float apportionment.
pub const MONEY_TOLERANCE: f64 = 1e-9;

/// Maximum participants in one session.
///
/// ## Business Reason
/// A shared bill with more people than this is a fundraiser, not a dinner.
/// Keeps the cost matrix printable.
pub const MAX_PARTICIPANTS: usize = 50;

/// Maximum line items in one session.
pub const MAX_LINE_ITEMS: usize = 200;

/// Maximum length of a participant or item name, in characters.
pub const MAX_NAME_LEN: usize = 100;
