//! Cart snapshot records.

use barrow::{
    cart::{CartState, LineItem},
    products::ProductId,
};
use jiff::Timestamp;
use rusty_money::{Findable, Money, iso::Currency};
use serde::{Deserialize, Serialize};

use crate::storage::StorageError;

/// Serialized form of a saved cart.
///
/// Only the lines and the currency are authoritative; totals are derived
/// again when the snapshot is restored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartSnapshotRecord {
    /// ISO 4217 code of the cart currency.
    pub currency: String,

    /// When the snapshot was written.
    pub saved_at: Timestamp,

    /// Cart lines in insertion order.
    pub items: Vec<LineItemRecord>,
}

/// Serialized form of one cart line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItemRecord {
    /// Product id.
    pub id: i64,

    /// Product name as captured when the line was created.
    pub name: String,

    /// Unit price in minor currency units.
    pub price_minor: i64,

    /// Image URI.
    #[serde(default)]
    pub image: String,

    /// Category label.
    #[serde(default)]
    pub category: String,

    /// Units of this product in the cart.
    pub quantity: u32,
}

impl From<&CartState> for CartSnapshotRecord {
    fn from(state: &CartState) -> Self {
        Self {
            currency: state.currency().iso_alpha_code.to_string(),
            saved_at: Timestamp::now(),
            items: state.items().iter().map(LineItemRecord::from).collect(),
        }
    }
}

impl From<&LineItem> for LineItemRecord {
    fn from(line: &LineItem) -> Self {
        Self {
            id: line.id().value(),
            name: line.name().to_string(),
            price_minor: line.price().to_minor_units(),
            image: line.image().to_string(),
            category: line.category().to_string(),
            quantity: line.quantity(),
        }
    }
}

impl CartSnapshotRecord {
    /// Rebuild the cart state this record describes.
    ///
    /// Lines with a zero quantity are silently dropped; totals are
    /// recomputed from the surviving lines rather than trusted from disk.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the currency code is unknown or a
    /// line fails cart validation.
    pub fn into_state(self) -> Result<CartState, StorageError> {
        let Some(currency) = Currency::find(&self.currency) else {
            return Err(StorageError::UnknownCurrency(self.currency));
        };

        let items: Vec<LineItem> = self
            .items
            .into_iter()
            .filter(|item| item.quantity > 0)
            .map(|item| {
                LineItem::from_parts(
                    ProductId::new(item.id),
                    item.name,
                    Money::from_minor(item.price_minor, currency),
                    item.image,
                    item.category,
                    item.quantity,
                )
            })
            .collect();

        Ok(CartState::with_items(items, currency)?)
    }
}
