//! # Text Rendering
//!
//! Presentation layer: turns computed shares into the breakdown printed on
//! the terminal. Rendering builds a `String` so it can be tested without
//! capturing stdout.
//!
//! ```text
//! Asha
//!   Pizza                    × 1          200.00
//!   Naan                     × 1.5         60.00
//!   Subtotal                              260.00
//!   Service charge                         13.00
//!   ...
//!   Total                                 286.00
//! ```

use std::fmt::Write;

use tabsplit_core::{BillAdjustments, LineItem, Money, Share, Shares, MONEY_TOLERANCE};

use crate::config::CliConfig;

const LABEL_WIDTH: usize = 24;
const AMOUNT_WIDTH: usize = 14;

/// Quantity without trailing zeros: `1`, `1.5`, `0.33`.
fn format_quantity(qty: f64) -> String {
    let fixed = format!("{qty:.2}");
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}

struct Renderer<'a> {
    config: &'a CliConfig,
    out: String,
}

impl<'a> Renderer<'a> {
    fn money(&self, amount: Money) -> String {
        amount.format_with(&self.config.currency_symbol, self.config.decimals)
    }

    fn line(&mut self, indent: usize, label: &str, amount: Money) {
        let amount = self.money(amount);
        // Writing to a String cannot fail
        let _ = writeln!(
            self.out,
            "{:indent$}{:<width$}{:>amount_width$}",
            "",
            label,
            amount,
            width = LABEL_WIDTH + 10 - indent,
            amount_width = AMOUNT_WIDTH,
        );
    }

    fn share(&mut self, share: &Share) {
        let _ = writeln!(self.out, "{}", share.name);

        if self.config.show_items {
            for detail in &share.items {
                let label = format!(
                    "{:<LABEL_WIDTH$}× {}",
                    detail.name,
                    format_quantity(detail.quantity)
                );
                self.line(2, &label, detail.cost);
            }
        }

        self.line(2, "Subtotal", share.subtotal);
        self.line(2, "Service charge", share.service_charge);
        self.line(2, "Tax A", share.tax_a);
        self.line(2, "Tax B", share.tax_b);
        if !share.round_off.is_zero() {
            self.line(2, "Round off", share.round_off);
        }
        if !share.discount.is_zero() {
            self.line(2, "Discount", -share.discount);
        }
        self.line(2, "Total", share.total);
        self.out.push('\n');
    }
}

/// Renders every participant's breakdown followed by bill totals.
pub fn render_shares(shares: &Shares, adjustments: &BillAdjustments, config: &CliConfig) -> String {
    let mut renderer = Renderer {
        config,
        out: String::new(),
    };

    if shares.is_empty() {
        renderer.out.push_str("No participants.\n");
        return renderer.out;
    }

    for share in shares {
        renderer.share(share);
    }

    renderer.line(0, "Bill subtotal", shares.bill_subtotal());
    renderer.line(0, "Bill net amount", adjustments.net_amount(shares.bill_subtotal()));
    renderer.line(0, "Sum of shares", shares.grand_total());

    let drift = shares.unreconciled_difference(adjustments);
    if drift.amount().abs() > MONEY_TOLERANCE {
        renderer.line(0, "Unallocated difference", drift);
    }

    renderer.out
}

/// Renders the unassigned-items check.
pub fn render_check(items: &[LineItem], remaining: &[(ItemRef<'_>, f64)], config: &CliConfig) -> String {
    let mut out = String::new();
    let unassigned = remaining.iter().filter(|(item, _)| item.fully_unassigned).count();

    if remaining.is_empty() {
        let _ = writeln!(out, "All {} line item(s) are fully assigned.", items.len());
        return out;
    }

    for (item, left) in remaining {
        let status = if item.fully_unassigned {
            "UNASSIGNED"
        } else {
            "partial"
        };
        let _ = writeln!(
            out,
            "{:<12}{:<LABEL_WIDTH$}{} of {} left ({} each)",
            status,
            item.item.name,
            format_quantity(*left),
            format_quantity(item.item.quantity),
            item.item.unit_price.format_with(&config.currency_symbol, config.decimals),
        );
    }
    let _ = writeln!(out, "{unassigned} unassigned, {} partial", remaining.len() - unassigned);
    out
}

/// An item listed by [`render_check`].
pub struct ItemRef<'a> {
    pub item: &'a LineItem,
    pub fully_unassigned: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabsplit_core::{compute_shares, AssignmentMap, Participant};

    fn pizza_shares() -> (Shares, BillAdjustments) {
        let participants = vec![Participant::new("a", "Asha"), Participant::new("b", "Ben")];
        let pizza = LineItem::new("pizza", "Pizza", Money::new(200.0), 2.0);
        let mut assignments = AssignmentMap::new();
        assignments.assign(&pizza, &"a".into(), 1.0);
        assignments.assign(&pizza, &"b".into(), 1.0);
        let adjustments = BillAdjustments {
            service_charge: Money::new(20.0),
            tax_a: Money::new(10.0),
            tax_b: Money::new(10.0),
            ..Default::default()
        };
        let shares = compute_shares(&participants, &[pizza], &assignments, &adjustments);
        (shares, adjustments)
    }

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(1.0), "1");
        assert_eq!(format_quantity(1.5), "1.5");
        assert_eq!(format_quantity(1.0 / 3.0), "0.33");
    }

    #[test]
    fn test_render_shares() {
        let (shares, adjustments) = pizza_shares();
        let text = render_shares(&shares, &adjustments, &CliConfig::default());

        assert!(text.starts_with("Asha\n"));
        assert!(text.contains("Ben\n"));
        assert!(text.contains("× 1"));
        assert!(text.contains("$220.00"));
        assert!(text.contains("$440.00"));
        assert!(!text.contains("Discount"));
        assert!(!text.contains("Unallocated difference"));
    }

    #[test]
    fn test_render_hides_items_when_configured() {
        let (shares, adjustments) = pizza_shares();
        let config = CliConfig {
            show_items: false,
            ..CliConfig::default()
        };
        let text = render_shares(&shares, &adjustments, &config);
        assert!(!text.contains("Pizza"));
        assert!(text.contains("Subtotal"));
    }

    #[test]
    fn test_render_check() {
        let wine = LineItem::new("wine", "Wine", Money::new(900.0), 1.0);
        let naan = LineItem::new("naan", "Naan", Money::new(40.0), 3.0);
        let items = vec![wine.clone(), naan.clone()];
        let remaining = vec![
            (ItemRef { item: &wine, fully_unassigned: true }, 1.0),
            (ItemRef { item: &naan, fully_unassigned: false }, 0.5),
        ];

        let text = render_check(&items, &remaining, &CliConfig::default());
        assert!(text.contains("UNASSIGNED"));
        assert!(text.contains("0.5 of 3 left"));
        assert!(text.ends_with("1 unassigned, 1 partial\n"));

        let text = render_check(&items, &[], &CliConfig::default());
        assert_eq!(text, "All 2 line item(s) are fully assigned.\n");
    }
}
