//! # Bill Files
//!
//! JSON description of one bill, loaded into a [`Session`].
//!
//! ## Format
//! ```json
//! {
//!   "participants": [{ "id": "asha", "name": "Asha" }],
//!   "items": [{ "id": "naan", "name": "Butter Naan", "unit_price": 65, "quantity": 4 }],
//!   "even_splits": { "naan": ["asha", "ben"] },
//!   "assignments": { "biryani": { "asha": 1, "ben": 0.5 } },
//!   "adjustments": { "service_charge": 20, "tax_a": 9, "tax_b": 9, "round_off": -0.3 }
//! }
//! ```
//!
//! Everything except `participants` and `items` may be omitted. Loading goes
//! through the session API, so names are validated, every assignment is
//! clamped, and references to unknown ids are rejected.
//!
//! ## Load Order
//! participants → items → even_splits → assignments → adjustments.
//! Explicit assignments come after even splits, so they can fine-tune one.
//!
//! Within one item, explicit assignments are applied in participant id
//! order, not the order written in the file, and each one is clamped
//! against those applied before it. On a quantity-2 item,
//! `{ "zed": 2, "amy": 1 }` gives amy 1 and zed the remaining 1.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

use tabsplit_core::{BillAdjustments, ItemId, LineItem, Participant, ParticipantId, Session};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BillFile {
    pub participants: Vec<Participant>,

    pub items: Vec<LineItem>,

    #[serde(default)]
    pub even_splits: BTreeMap<ItemId, Vec<ParticipantId>>,

    #[serde(default)]
    pub assignments: BTreeMap<ItemId, BTreeMap<ParticipantId, f64>>,

    #[serde(default)]
    pub adjustments: BillAdjustments,
}

impl BillFile {
    /// Reads and parses a bill file.
    pub fn load(path: &Path) -> AppResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| AppError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let bill = Self::parse(&raw).map_err(|source| AppError::BillFormat {
            path: path.to_path_buf(),
            source,
        })?;

        info!(
            path = %path.display(),
            participants = bill.participants.len(),
            items = bill.items.len(),
            "Bill file loaded"
        );
        Ok(bill)
    }

    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Builds a session from the file contents.
    pub fn into_session(self) -> AppResult<Session> {
        let mut session = Session::new();

        for participant in self.participants {
            session.insert_participant(participant)?;
        }
        for item in self.items {
            session.insert_item(item)?;
        }
        for (item_id, participant_ids) in &self.even_splits {
            session.split_item_evenly(item_id, participant_ids)?;
        }
        for (item_id, per_participant) in &self.assignments {
            for (participant_id, quantity) in per_participant {
                session.assign(item_id, participant_id, *quantity)?;
            }
        }
        session.set_adjustments(self.adjustments)?;

        debug!(
            participants = session.participants().len(),
            items = session.items().len(),
            "Session built from bill file"
        );
        Ok(session)
    }
}
