//! # Split Report
//!
//! Lays computed shares out as two tables for an exporter or a screen.
//!
//! ## Tables
//! ```text
//! Summary (one row per participant)
//! ┌────────┬──────────┬─────────┬───────┬───────┬───────────┬──────────┬────────┐
//! │ Name   │ Subtotal │ Service │ Tax A │ Tax B │ Round Off │ Discount │ Total  │
//! ├────────┼──────────┼─────────┼───────┼───────┼───────────┼──────────┼────────┤
//! │ A      │   200.00 │   10.00 │  5.00 │  5.00 │      0.00 │     0.00 │ 220.00 │
//! └────────┴──────────┴─────────┴───────┴───────┴───────────┴──────────┴────────┘
//!
//! Cost matrix (items × participants, then trailing rows)
//! ┌────────────────┬────────┬────────┬────────┐
//! │ Item           │ A      │ B      │ Total  │
//! ├────────────────┼────────┼────────┼────────┤
//! │ Pizza          │ 200.00 │ 200.00 │ 400.00 │
//! │ Subtotal       │ 200.00 │ 200.00 │ 400.00 │
//! │ Service Charge │  10.00 │  10.00 │  20.00 │
//! │ …              │        │        │        │
//! │ Total          │ 220.00 │ 220.00 │ 440.00 │
//! └────────────────┴────────┴────────┴────────┘
//! ```
//!
//! Amounts are carried at full precision. Rounding for display is the
//! renderer's job, so a spreadsheet built from this report can recompute
//! its own totals without compounding rounding error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::allocation::Shares;
use crate::money::Money;
use crate::types::{BillAdjustments, LineItem, Share};

/// Labels of the rows appended below the item rows of the cost matrix.
pub const TRAILING_ROW_LABELS: [&str; 7] = [
    "Subtotal",
    "Service Charge",
    "Tax A",
    "Tax B",
    "Round Off",
    "Discount",
    "Total",
];

/// One participant's line in the summary table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SummaryRow {
    pub name: String,
    pub subtotal: Money,
    pub service_charge: Money,
    pub tax_a: Money,
    pub tax_b: Money,
    pub round_off: Money,
    pub discount: Money,
    pub total: Money,
}

impl From<&Share> for SummaryRow {
    fn from(share: &Share) -> Self {
        SummaryRow {
            name: share.name.clone(),
            subtotal: share.subtotal,
            service_charge: share.service_charge,
            tax_a: share.tax_a,
            tax_b: share.tax_b,
            round_off: share.round_off,
            discount: share.discount,
            total: share.total,
        }
    }
}

/// One row of the cost matrix: a label, one cell per participant, and the
/// row total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MatrixRow {
    pub label: String,
    pub cells: Vec<Money>,
    pub total: Money,
}

impl MatrixRow {
    fn new(label: impl Into<String>, cells: Vec<Money>) -> Self {
        let total = cells.iter().sum();
        MatrixRow {
            label: label.into(),
            cells,
            total,
        }
    }
}

/// Items × participants cost table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CostMatrix {
    /// Participant names, one per cell column.
    pub columns: Vec<String>,
    /// One row per line item, in bill order, including unassigned items.
    pub item_rows: Vec<MatrixRow>,
    /// Subtotal, adjustments, discount and total rows.
    pub trailing_rows: Vec<MatrixRow>,
}

/// Everything an exporter needs to write the split out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SplitReport {
    #[ts(as = "String")]
    pub generated_at: DateTime<Utc>,
    pub adjustments: BillAdjustments,
    pub bill_subtotal: Money,
    /// `bill_subtotal` plus adjustments minus discount.
    pub net_amount: Money,
    /// Sum of participant totals. May differ from `net_amount`; see
    /// `unreconciled_difference`.
    pub grand_total: Money,
    pub unreconciled_difference: Money,
    pub summary: Vec<SummaryRow>,
    pub matrix: CostMatrix,
}

impl SplitReport {
    /// Builds the report from shares computed over `items`.
    pub fn build(items: &[LineItem], shares: &Shares, adjustments: &BillAdjustments) -> Self {
        let columns: Vec<String> = shares.iter().map(|s| s.name.clone()).collect();

        let item_rows = items
            .iter()
            .map(|item| {
                let cells: Vec<Money> = shares
                    .iter()
                    .map(|share| {
                        share
                            .items
                            .iter()
                            .filter(|detail| detail.item_id == item.id)
                            .map(|detail| detail.cost)
                            .sum::<Money>()
                    })
                    .collect();
                MatrixRow::new(item.name.clone(), cells)
            })
            .collect();

        let column =
            |pick: fn(&Share) -> Money| -> Vec<Money> { shares.iter().map(pick).collect() };
        let trailing_rows = vec![
            MatrixRow::new(TRAILING_ROW_LABELS[0], column(|s| s.subtotal)),
            MatrixRow::new(TRAILING_ROW_LABELS[1], column(|s| s.service_charge)),
            MatrixRow::new(TRAILING_ROW_LABELS[2], column(|s| s.tax_a)),
            MatrixRow::new(TRAILING_ROW_LABELS[3], column(|s| s.tax_b)),
            MatrixRow::new(TRAILING_ROW_LABELS[4], column(|s| s.round_off)),
            MatrixRow::new(TRAILING_ROW_LABELS[5], column(|s| s.discount)),
            MatrixRow::new(TRAILING_ROW_LABELS[6], column(|s| s.total)),
        ];

        SplitReport {
            generated_at: Utc::now(),
            adjustments: *adjustments,
            bill_subtotal: shares.bill_subtotal(),
            net_amount: adjustments.net_amount(shares.bill_subtotal()),
            grand_total: shares.grand_total(),
            unreconciled_difference: shares.unreconciled_difference(adjustments),
            summary: shares.iter().map(SummaryRow::from).collect(),
            matrix: CostMatrix {
                columns,
                item_rows,
                trailing_rows,
            },
        }
    }

    /// Pretty-printed JSON, for piping into a spreadsheet writer.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
