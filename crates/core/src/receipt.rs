//! Receipt

use std::io;

use smallvec::{SmallVec, smallvec};
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::CartState,
    pricing::{CheckoutPolicy, OrderSummary, SummaryError},
};

/// Errors that can occur when rendering a cart receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// IO error
    #[error("IO error")]
    IO,
}

/// Rendered view of a cart and its derived order summary.
#[derive(Debug)]
pub struct CartReceipt<'a> {
    cart: &'a CartState,
    summary: OrderSummary,
}

impl<'a> CartReceipt<'a> {
    /// Create a receipt from a cart and a precomputed summary.
    #[must_use]
    pub fn new(cart: &'a CartState, summary: OrderSummary) -> Self {
        Self { cart, summary }
    }

    /// Create a receipt for a cart under the given checkout policy.
    ///
    /// # Errors
    ///
    /// Returns a [`SummaryError`] if the order summary cannot be derived.
    pub fn for_cart(cart: &'a CartState, policy: &CheckoutPolicy) -> Result<Self, SummaryError> {
        let summary = OrderSummary::for_cart(cart, policy)?;

        Ok(Self { cart, summary })
    }

    /// The derived order summary this receipt renders.
    #[must_use]
    pub fn summary(&self) -> &OrderSummary {
        &self.summary
    }

    /// Prints the cart table and order summary.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if the receipt cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["", "Item", "Category", "Unit Price", "Qty", "Line Total"]);

        for (idx, line) in self.cart.items().iter().enumerate() {
            builder.push_record([
                format!("#{:<3}", idx + 1),
                line.name().to_string(),
                line.category().to_string(),
                format!("{}", line.price()),
                line.quantity().to_string(),
                format!("{}", line.line_total()),
            ]);
        }

        write_cart_table(&mut out, builder)?;

        write_order_summary(&mut out, &self.summary)?;

        Ok(())
    }
}

fn write_cart_table(out: &mut impl io::Write, builder: Builder) -> Result<(), ReceiptError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(3..6), Alignment::right());

    let table_str = colorize_borders(&table.to_string());

    writeln!(out, "\n{table_str}").map_err(|_err| ReceiptError::IO)
}

fn write_order_summary(
    out: &mut impl io::Write,
    summary: &OrderSummary,
) -> Result<(), ReceiptError> {
    let shipping_val = if summary.free_shipping() {
        "FREE  ".to_string()
    } else {
        format!("{}  ", summary.shipping())
    };

    let rows: SmallVec<[(String, String); 4]> = smallvec![
        (" Subtotal:".to_string(), format!("{}  ", summary.subtotal())),
        (" Shipping:".to_string(), shipping_val),
        (" Tax:".to_string(), format!("{}  ", summary.tax())),
        (
            " \x1b[1mTotal:\x1b[0m".to_string(),
            format!("\x1b[1m{}  \x1b[0m", summary.grand_total()),
        ),
    ];

    let label_width = rows
        .iter()
        .map(|(label, _)| visible_width(label))
        .max()
        .unwrap_or(0);

    let value_width = rows
        .iter()
        .map(|(_, value)| visible_width(value))
        .max()
        .unwrap_or(0);

    for (label, value) in &rows {
        write_summary_line(out, label, value, label_width, value_width)?;
    }

    writeln!(out).map_err(|_err| ReceiptError::IO)
}

/// Wraps runs of box-drawing characters (U+2500..U+257F) in dark-grey ANSI
/// escapes, leaving cell content untouched.
fn colorize_borders(table: &str) -> String {
    fn is_border(ch: char) -> bool {
        ('\u{2500}'..='\u{257F}').contains(&ch)
    }

    let mut out = String::with_capacity(table.len() + 256);
    let mut run = false;

    for ch in table.chars() {
        match (is_border(ch), run) {
            (true, false) => {
                out.push_str("\x1b[90m");
                run = true;
            }
            (false, true) => {
                out.push_str("\x1b[0m");
                run = false;
            }
            _ => {}
        }

        out.push(ch);
    }

    if run {
        out.push_str("\x1b[0m");
    }

    out
}

/// Returns the display width of a string, skipping ANSI escape sequences.
fn visible_width(s: &str) -> usize {
    let mut width = 0usize;
    let mut escaped = false;

    for ch in s.chars() {
        match (escaped, ch) {
            (true, c) if c.is_ascii_alphabetic() => escaped = false,
            (true, _) => {}
            (false, '\x1b') => escaped = true,
            (false, _) => width += 1,
        }
    }

    width
}

/// Writes one summary row with the label right-aligned and the value padded
/// out to a fixed column.
fn write_summary_line(
    out: &mut impl io::Write,
    label: &str,
    value: &str,
    label_col_width: usize,
    value_col_width: usize,
) -> Result<(), ReceiptError> {
    let label_pad = " ".repeat(label_col_width.saturating_sub(visible_width(label)));
    let value_pad = " ".repeat(value_col_width.saturating_sub(visible_width(value)));

    writeln!(out, "{label_pad}{label}  {value_pad}{value}").map_err(|_err| ReceiptError::IO)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rusty_money::iso::INR;
    use testresult::TestResult;

    use crate::{
        cart::{CartAction, CartState},
        catalog::{RawProduct, normalize},
        products::Product,
    };

    use super::*;

    fn product(id: i64, name: &str, price_major: i64) -> Product {
        let raw = RawProduct {
            id: Some(id),
            name: Some(name.to_string()),
            price: Some(Decimal::new(price_major, 0)),
            category: Some("Electronics".to_string()),
            ..RawProduct::default()
        };

        normalize(raw, INR).expect("test product should normalize")
    }

    fn cart_with_items() -> CartState {
        CartState::new(INR)
            .apply(&CartAction::AddToCart {
                product: product(1, "Premium Wireless Headphones", 24_999),
                quantity: 1,
            })
            .apply(&CartAction::AddToCart {
                product: product(7, "Handcrafted Ceramic Mug", 1_665),
                quantity: 2,
            })
    }

    #[test]
    fn write_to_renders_lines_and_summary() -> TestResult {
        let cart = cart_with_items();
        let receipt = CartReceipt::for_cart(&cart, &CheckoutPolicy::standard(INR))?;

        let mut out = Vec::new();
        receipt.write_to(&mut out)?;

        let output = String::from_utf8(out)?;

        assert!(output.contains("Premium Wireless Headphones"));
        assert!(output.contains("Handcrafted Ceramic Mug"));
        assert!(output.contains("Electronics"));
        assert!(output.contains("Subtotal:"));
        assert!(output.contains("Shipping:"));
        assert!(output.contains("Tax:"));
        assert!(output.contains("Total:"));

        Ok(())
    }

    #[test]
    fn free_shipping_renders_as_free() -> TestResult {
        // 28,329.00 INR subtotal is above the 4,000.00 threshold.
        let cart = cart_with_items();
        let receipt = CartReceipt::for_cart(&cart, &CheckoutPolicy::standard(INR))?;

        let mut out = Vec::new();
        receipt.write_to(&mut out)?;

        let output = String::from_utf8(out)?;

        assert!(output.contains("FREE"));

        Ok(())
    }

    #[test]
    fn paid_shipping_renders_the_fee() -> TestResult {
        let cart = CartState::new(INR).apply(&CartAction::AddToCart {
            product: product(7, "Handcrafted Ceramic Mug", 1_665),
            quantity: 1,
        });

        let receipt = CartReceipt::for_cart(&cart, &CheckoutPolicy::standard(INR))?;

        let mut out = Vec::new();
        receipt.write_to(&mut out)?;

        let output = String::from_utf8(out)?;

        assert!(!output.contains("FREE"));
        assert!(output.contains(&format!("{}", receipt.summary().shipping())));

        Ok(())
    }

    #[test]
    fn empty_cart_renders_header_and_summary_only() -> TestResult {
        let cart = CartState::new(INR);
        let receipt = CartReceipt::for_cart(&cart, &CheckoutPolicy::standard(INR))?;

        let mut out = Vec::new();
        receipt.write_to(&mut out)?;

        let output = String::from_utf8(out)?;

        assert!(output.contains("Item"));
        assert!(output.contains("Subtotal:"));

        Ok(())
    }

    #[test]
    fn visible_width_ignores_ansi_escapes() {
        assert_eq!(visible_width("\x1b[1mTotal:\x1b[0m"), 6);
        assert_eq!(visible_width("Subtotal:"), 9);
    }
}
