//! Cart

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    pricing::{items_count, items_total},
    products::{Product, ProductId},
};

/// Errors related to cart state construction.
#[derive(Debug, Error)]
pub enum CartError {
    /// A line's currency differs from the cart currency (index, line currency, cart currency).
    #[error("Line {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(usize, &'static str, &'static str),

    /// A line carried a zero quantity (index).
    #[error("Line {0} has a zero quantity")]
    ZeroQuantity(usize),
}

/// One product entry in the cart with its quantity.
///
/// Lines copy their display fields from the product at the time it was
/// added; later catalog changes do not reach into an open cart.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    id: ProductId,
    name: String,
    price: Money<'static, Currency>,
    image: String,
    category: String,
    quantity: u32,
}

impl LineItem {
    /// Create a line for the given product and quantity.
    #[must_use]
    pub fn new(product: &Product, quantity: u32) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            category: product.category.clone(),
            quantity,
        }
    }

    /// Reassemble a line from stored fields.
    ///
    /// Intended for persistence layers; cart invariants (quantity ≥ 1, one
    /// currency per cart) are enforced by [`CartState::with_items`].
    #[must_use]
    pub fn from_parts(
        id: ProductId,
        name: String,
        price: Money<'static, Currency>,
        image: String,
        category: String,
        quantity: u32,
    ) -> Self {
        Self {
            id,
            name,
            price,
            image,
            category,
            quantity,
        }
    }

    /// Id of the product this line holds.
    #[must_use]
    pub fn id(&self) -> ProductId {
        self.id
    }

    /// Product name as captured when the line was created.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit price of the product.
    #[must_use]
    pub fn price(&self) -> Money<'static, Currency> {
        self.price
    }

    /// Image URI as captured when the line was created.
    #[must_use]
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Category label as captured when the line was created.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Quantity of this product in the cart.
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Money<'static, Currency> {
        let minor_units = self.price.to_minor_units() * i64::from(self.quantity);

        Money::from_minor(minor_units, self.price.currency())
    }
}

/// Commands accepted by the cart store.
///
/// The command set is closed: every reachable cart state is the result of
/// folding these over an empty cart.
#[derive(Debug, Clone)]
pub enum CartAction {
    /// Add a product to the cart.
    ///
    /// Merges into an existing line with the same id by incrementing its
    /// quantity; otherwise appends a new line at the end. A quantity of zero
    /// is treated as one (the add-to-cart default).
    AddToCart {
        /// The product to add
        product: Product,
        /// How many units to add
        quantity: u32,
    },

    /// Remove the line with the given product id.
    ///
    /// Unknown ids leave the cart unchanged.
    RemoveFromCart(ProductId),

    /// Set the quantity of the line with the given product id.
    ///
    /// Zero or negative quantities remove the line, exactly like
    /// [`CartAction::RemoveFromCart`]. Unknown ids leave the cart unchanged.
    UpdateQuantity {
        /// Id of the line to update
        id: ProductId,
        /// The absolute quantity to set
        quantity: i64,
    },

    /// Empty the cart.
    ClearCart,
}

/// Aggregate cart view: ordered line items plus derived totals.
///
/// `total` and `item_count` are recomputed from `items` on every transition;
/// they are never adjusted incrementally and never trusted from outside.
#[derive(Debug, Clone, PartialEq)]
pub struct CartState {
    items: Vec<LineItem>,
    total: Money<'static, Currency>,
    item_count: u64,
    currency: &'static Currency,
}

impl CartState {
    /// Create an empty cart in the given currency.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Self::from_lines(Vec::new(), currency)
    }

    /// Create a cart from existing lines, validating cart invariants.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if any line's currency differs from the cart
    /// currency, or if a line carries a zero quantity.
    pub fn with_items(
        items: impl Into<Vec<LineItem>>,
        currency: &'static Currency,
    ) -> Result<Self, CartError> {
        let items = items.into();

        items.iter().enumerate().try_for_each(|(i, line)| {
            let line_currency = line.price.currency();

            if line_currency != currency {
                return Err(CartError::CurrencyMismatch(
                    i,
                    line_currency.iso_alpha_code,
                    currency.iso_alpha_code,
                ));
            }

            if line.quantity == 0 {
                return Err(CartError::ZeroQuantity(i));
            }

            Ok(())
        })?;

        Ok(Self::from_lines(items, currency))
    }

    /// Apply a command and produce the next state.
    ///
    /// Pure transition: the receiver is never mutated, totals are recomputed
    /// from the resulting lines, and no command can fail.
    #[must_use]
    pub fn apply(&self, action: &CartAction) -> Self {
        let items = match action {
            CartAction::AddToCart { product, quantity } => {
                self.lines_with_added(product, (*quantity).max(1))
            }
            CartAction::RemoveFromCart(id) => self.lines_without(*id),
            CartAction::UpdateQuantity { id, quantity } => {
                self.lines_with_quantity(*id, *quantity)
            }
            CartAction::ClearCart => Vec::new(),
        };

        Self::from_lines(items, self.currency)
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Look up a line by product id.
    #[must_use]
    pub fn line(&self, id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|line| line.id == id)
    }

    /// Sum of unit price times quantity over all lines.
    #[must_use]
    pub fn total(&self) -> Money<'static, Currency> {
        self.total
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.item_count
    }

    /// The cart currency.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Number of distinct lines in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn from_lines(items: Vec<LineItem>, currency: &'static Currency) -> Self {
        let total = items_total(&items, currency);
        let item_count = items_count(&items);

        Self {
            items,
            total,
            item_count,
            currency,
        }
    }

    fn lines_with_added(&self, product: &Product, quantity: u32) -> Vec<LineItem> {
        let mut items = self.items.clone();

        if let Some(line) = items.iter_mut().find(|line| line.id == product.id) {
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            items.push(LineItem::new(product, quantity));
        }

        items
    }

    fn lines_without(&self, id: ProductId) -> Vec<LineItem> {
        self.items
            .iter()
            .filter(|line| line.id != id)
            .cloned()
            .collect()
    }

    fn lines_with_quantity(&self, id: ProductId, quantity: i64) -> Vec<LineItem> {
        if quantity <= 0 {
            return self.lines_without(id);
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        let mut items = self.items.clone();

        if let Some(line) = items.iter_mut().find(|line| line.id == id) {
            line.quantity = quantity;
        }

        items
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rusty_money::iso::{self, INR};
    use testresult::TestResult;

    use crate::catalog::{RawProduct, normalize};

    use super::*;

    fn product(id: i64, name: &str, price_major: i64) -> Product {
        let raw = RawProduct {
            id: Some(id),
            name: Some(name.to_string()),
            price: Some(Decimal::new(price_major, 0)),
            ..RawProduct::default()
        };

        normalize(raw, INR).unwrap()
    }

    fn add(product: &Product, quantity: u32) -> CartAction {
        CartAction::AddToCart {
            product: product.clone(),
            quantity,
        }
    }

    #[test]
    fn new_cart_is_empty_with_zero_totals() {
        let cart = CartState::new(INR);

        assert!(cart.is_empty());
        assert_eq!(cart.total(), Money::from_minor(0, INR));
        assert_eq!(cart.item_count(), 0);
        assert_eq!(cart.currency(), INR);
    }

    #[test]
    fn add_appends_new_line_at_end() {
        let first = product(1, "Headphones", 100);
        let second = product(2, "Speaker", 50);

        let cart = CartState::new(INR)
            .apply(&add(&first, 1))
            .apply(&add(&second, 2));

        let ids: Vec<ProductId> = cart.items().iter().map(LineItem::id).collect();

        assert_eq!(ids, [ProductId::new(1), ProductId::new(2)]);
    }

    #[test]
    fn add_merges_quantity_for_existing_id() {
        let item = product(1, "Headphones", 100);

        let cart = CartState::new(INR)
            .apply(&add(&item, 1))
            .apply(&add(&item, 2));

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.line(ProductId::new(1)).map(LineItem::quantity), Some(3));
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn add_with_zero_quantity_behaves_as_one() {
        let item = product(1, "Headphones", 100);

        let cart = CartState::new(INR).apply(&add(&item, 0));

        assert_eq!(cart.line(ProductId::new(1)).map(LineItem::quantity), Some(1));
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn merge_keeps_original_line_position() {
        let first = product(1, "Headphones", 100);
        let second = product(2, "Speaker", 50);

        let cart = CartState::new(INR)
            .apply(&add(&first, 1))
            .apply(&add(&second, 1))
            .apply(&add(&first, 1));

        let ids: Vec<ProductId> = cart.items().iter().map(LineItem::id).collect();

        assert_eq!(ids, [ProductId::new(1), ProductId::new(2)]);
        assert_eq!(cart.line(ProductId::new(1)).map(LineItem::quantity), Some(2));
    }

    #[test]
    fn remove_drops_line_and_preserves_order() {
        let first = product(1, "Headphones", 100);
        let second = product(2, "Speaker", 50);
        let third = product(3, "Backpack", 75);

        let cart = CartState::new(INR)
            .apply(&add(&first, 1))
            .apply(&add(&second, 1))
            .apply(&add(&third, 1))
            .apply(&CartAction::RemoveFromCart(ProductId::new(2)));

        let ids: Vec<ProductId> = cart.items().iter().map(LineItem::id).collect();

        assert_eq!(ids, [ProductId::new(1), ProductId::new(3)]);
    }

    #[test]
    fn remove_unknown_id_is_a_no_op() {
        let item = product(1, "Headphones", 100);

        let before = CartState::new(INR).apply(&add(&item, 1));
        let after = before.apply(&CartAction::RemoveFromCart(ProductId::new(99)));

        assert_eq!(after, before);
    }

    #[test]
    fn remove_twice_equals_remove_once() {
        let item = product(1, "Headphones", 100);
        let remove = CartAction::RemoveFromCart(ProductId::new(1));

        let once = CartState::new(INR).apply(&add(&item, 1)).apply(&remove);
        let twice = once.apply(&remove);

        assert_eq!(twice, once);
    }

    #[test]
    fn update_quantity_sets_absolute_value() {
        let item = product(1, "Headphones", 100);

        let cart = CartState::new(INR).apply(&add(&item, 5)).apply(
            &CartAction::UpdateQuantity {
                id: ProductId::new(1),
                quantity: 2,
            },
        );

        assert_eq!(cart.line(ProductId::new(1)).map(LineItem::quantity), Some(2));
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn update_quantity_zero_equals_remove() {
        let item = product(1, "Headphones", 100);
        let start = CartState::new(INR).apply(&add(&item, 3));

        let updated = start.apply(&CartAction::UpdateQuantity {
            id: ProductId::new(1),
            quantity: 0,
        });
        let removed = start.apply(&CartAction::RemoveFromCart(ProductId::new(1)));

        assert_eq!(updated, removed);
        assert!(updated.is_empty());
    }

    #[test]
    fn update_quantity_negative_equals_remove() {
        let item = product(1, "Headphones", 100);
        let start = CartState::new(INR).apply(&add(&item, 3));

        let updated = start.apply(&CartAction::UpdateQuantity {
            id: ProductId::new(1),
            quantity: -4,
        });
        let removed = start.apply(&CartAction::RemoveFromCart(ProductId::new(1)));

        assert_eq!(updated, removed);
    }

    #[test]
    fn update_quantity_unknown_id_is_a_no_op() {
        let item = product(1, "Headphones", 100);

        let before = CartState::new(INR).apply(&add(&item, 1));
        let after = before.apply(&CartAction::UpdateQuantity {
            id: ProductId::new(42),
            quantity: 7,
        });

        assert_eq!(after, before);
    }

    #[test]
    fn clear_empties_cart_and_zeroes_totals() {
        let first = product(1, "Headphones", 100);
        let second = product(2, "Speaker", 50);

        let cart = CartState::new(INR)
            .apply(&add(&first, 1))
            .apply(&add(&second, 2))
            .apply(&CartAction::ClearCart);

        assert!(cart.is_empty());
        assert_eq!(cart.total(), Money::from_minor(0, INR));
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn clear_on_empty_cart_stays_empty() {
        let cart = CartState::new(INR).apply(&CartAction::ClearCart);

        assert!(cart.is_empty());
        assert_eq!(cart.total(), Money::from_minor(0, INR));
    }

    #[test]
    fn apply_never_mutates_the_receiver() {
        let item = product(1, "Headphones", 100);
        let before = CartState::new(INR).apply(&add(&item, 1));

        let _next = before.apply(&add(&item, 5));

        assert_eq!(before.item_count(), 1);
        assert_eq!(before.total(), Money::from_minor(10_000, INR));
    }

    #[test]
    fn totals_track_every_transition() {
        let first = product(1, "Headphones", 100);
        let second = product(2, "Speaker", 50);

        let mut cart = CartState::new(INR);

        for action in [
            add(&first, 1),
            add(&second, 2),
            add(&first, 2),
            CartAction::UpdateQuantity {
                id: ProductId::new(2),
                quantity: 1,
            },
            CartAction::RemoveFromCart(ProductId::new(1)),
        ] {
            cart = cart.apply(&action);

            let expected_total: i64 = cart
                .items()
                .iter()
                .map(|line| line.price().to_minor_units() * i64::from(line.quantity()))
                .sum();
            let expected_count: u64 = cart
                .items()
                .iter()
                .map(|line| u64::from(line.quantity()))
                .sum();

            assert_eq!(cart.total(), Money::from_minor(expected_total, INR));
            assert_eq!(cart.item_count(), expected_count);
        }
    }

    #[test]
    fn line_total_multiplies_price_by_quantity() {
        let item = product(1, "Headphones", 100);
        let line = LineItem::new(&item, 3);

        assert_eq!(line.line_total(), Money::from_minor(30_000, INR));
    }

    #[test]
    fn with_items_rejects_currency_mismatch() {
        let rupee_line = LineItem::new(&product(1, "Headphones", 100), 1);
        let dollar_line = LineItem::from_parts(
            ProductId::new(2),
            "Import".to_string(),
            Money::from_minor(100, iso::USD),
            String::new(),
            String::new(),
            1,
        );

        let result = CartState::with_items([rupee_line, dollar_line], INR);

        match result {
            Err(CartError::CurrencyMismatch(idx, line_currency, cart_currency)) => {
                assert_eq!(idx, 1);
                assert_eq!(line_currency, iso::USD.iso_alpha_code);
                assert_eq!(cart_currency, INR.iso_alpha_code);
            }
            other => panic!("expected CurrencyMismatch error, got {other:?}"),
        }
    }

    #[test]
    fn with_items_rejects_zero_quantity() {
        let line = LineItem::new(&product(1, "Headphones", 100), 0);

        let result = CartState::with_items([line], INR);

        assert!(matches!(result, Err(CartError::ZeroQuantity(0))));
    }

    #[test]
    fn with_items_recomputes_totals() -> TestResult {
        let lines = [
            LineItem::new(&product(1, "Headphones", 100), 2),
            LineItem::new(&product(2, "Speaker", 50), 1),
        ];

        let cart = CartState::with_items(lines, INR)?;

        assert_eq!(cart.total(), Money::from_minor(25_000, INR));
        assert_eq!(cart.item_count(), 3);

        Ok(())
    }
}
