//! # Commands
//!
//! One function per subcommand. Each returns the text to print on stdout;
//! `lib.rs` owns printing and exit status.
//!
//! ## Command Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  tabsplit split bill.json                                               │
//! │       │                                                                 │
//! │       ├── BillFile::load ──► into_session (validated + clamped)         │
//! │       ├── unassigned items? ──► warn! (or Err in strict mode)           │
//! │       ├── compute_shares                                                │
//! │       └── render_shares (text) │ SplitReport::to_json (json)            │
//! │                                                                         │
//! │  tabsplit check bill.json                                               │
//! │       │                                                                 │
//! │       ├── BillFile::load ──► into_session                               │
//! │       ├── remaining quantity per item                                   │
//! │       └── CheckReport::status: Err if any item has no assignee          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::Path;

use clap::ValueEnum;
use tracing::{debug, warn};

use tabsplit_core::{Session, SplitReport, MONEY_TOLERANCE};

use crate::bill::BillFile;
use crate::config::CliConfig;
use crate::error::{AppError, AppResult};
use crate::render::{render_check, render_shares, ItemRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

// =============================================================================
// split
// =============================================================================

/// Loads a bill file and returns every participant's share.
pub fn split(path: &Path, format: OutputFormat, config: &CliConfig) -> AppResult<String> {
    let session = BillFile::load(path)?.into_session()?;
    split_session(&session, format, config)
}

/// Computes and renders the shares of an already-built session.
///
/// ## Unassigned Items
/// Items nobody claimed contribute to no one's share. That is reported,
/// not fixed: a warning per item, or `Err(Unassigned)` when
/// `fail_on_unassigned` is set.
pub fn split_session(
    session: &Session,
    format: OutputFormat,
    config: &CliConfig,
) -> AppResult<String> {
    let unassigned = session.unassigned_items();
    for item in &unassigned {
        warn!(item_id = %item.id, item = %item.name, "Line item is not assigned to anyone");
    }
    if config.fail_on_unassigned && !unassigned.is_empty() {
        return Err(AppError::Unassigned {
            count: unassigned.len(),
        });
    }

    let shares = session.compute_shares();
    debug!(
        participants = shares.len(),
        bill_subtotal = shares.bill_subtotal().amount(),
        "Shares computed"
    );

    match format {
        OutputFormat::Text => Ok(render_shares(&shares, session.adjustments(), config)),
        OutputFormat::Json => {
            let report = SplitReport::build(session.items(), &shares, session.adjustments());
            Ok(report.to_json()?)
        }
    }
}

// =============================================================================
// check
// =============================================================================

/// Result of `check`: the listing, plus how many items nobody claimed.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckReport {
    pub text: String,
    pub unassigned: usize,
}

impl CheckReport {
    /// `Err(Unassigned)` when any item has no assignee at all. Partially
    /// assigned items are listed but allowed.
    pub fn status(&self) -> AppResult<()> {
        if self.unassigned > 0 {
            return Err(AppError::Unassigned {
                count: self.unassigned,
            });
        }
        Ok(())
    }
}

/// Loads a bill file and lists items that are not fully assigned.
pub fn check(path: &Path, config: &CliConfig) -> AppResult<CheckReport> {
    let session = BillFile::load(path)?.into_session()?;
    check_session(&session, config)
}

/// Lists unassigned and partially assigned items.
pub fn check_session(session: &Session, config: &CliConfig) -> AppResult<CheckReport> {
    let mut listed = Vec::new();
    for item in session.items() {
        let left = session.remaining_quantity(&item.id)?;
        if left <= MONEY_TOLERANCE {
            continue;
        }
        let fully_unassigned = session.assignments().assigned_total(&item.id) == 0.0;
        listed.push((
            ItemRef {
                item,
                fully_unassigned,
            },
            left,
        ));
    }

    let unassigned = listed
        .iter()
        .filter(|(item, _)| item.fully_unassigned)
        .count();
    debug!(listed = listed.len(), unassigned, "Assignment check finished");

    Ok(CheckReport {
        text: render_check(session.items(), &listed, config),
        unassigned,
    })
}
