//! Store

use std::{fmt, sync::Arc};

use rusty_money::iso::Currency;
use slotmap::{SlotMap, new_key_type};

use crate::{
    cart::{CartAction, CartState},
    products::Product,
};

new_key_type! {
    /// Key identifying one cart subscription
    pub struct SubscriptionKey;
}

type Listener = Box<dyn Fn(&CartState) + Send + Sync>;

/// Single-owner cart store.
///
/// All mutation flows through [`CartStore::dispatch`], which folds a
/// [`CartAction`] over the current snapshot and publishes the result.
/// Requiring `&mut self` for dispatch makes interleaved mutation
/// unrepresentable; readers hold cheap `Arc` snapshots that never change
/// underneath them.
pub struct CartStore {
    state: Arc<CartState>,
    listeners: SlotMap<SubscriptionKey, Listener>,
}

impl CartStore {
    /// Create a store holding an empty cart in the given currency.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Self::seeded(CartState::new(currency))
    }

    /// Create a store seeded with an existing cart state.
    ///
    /// Used when restoring a persisted cart at startup.
    #[must_use]
    pub fn seeded(state: CartState) -> Self {
        Self {
            state: Arc::new(state),
            listeners: SlotMap::with_key(),
        }
    }

    /// The current cart snapshot.
    #[must_use]
    pub fn state(&self) -> Arc<CartState> {
        Arc::clone(&self.state)
    }

    /// Apply a command, publish the new snapshot to subscribers, and
    /// return it.
    ///
    /// Commands never fail: unknown ids are no-ops and quantities at or
    /// below zero remove their line.
    pub fn dispatch(&mut self, action: &CartAction) -> Arc<CartState> {
        let next = Arc::new(self.state.apply(action));

        self.state = Arc::clone(&next);

        for listener in self.listeners.values() {
            listener(&next);
        }

        next
    }

    /// Add one unit of a product to the cart.
    pub fn add(&mut self, product: &Product) -> Arc<CartState> {
        self.add_many(product, 1)
    }

    /// Add several units of a product to the cart.
    pub fn add_many(&mut self, product: &Product, quantity: u32) -> Arc<CartState> {
        self.dispatch(&CartAction::AddToCart {
            product: product.clone(),
            quantity,
        })
    }

    /// Register a listener called with every new snapshot.
    ///
    /// Listeners run synchronously, in registration order, after each
    /// dispatch.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionKey
    where
        F: Fn(&CartState) + Send + Sync + 'static,
    {
        self.listeners.insert(Box::new(listener))
    }

    /// Remove a previously registered listener.
    ///
    /// Returns `false` if the key was already unsubscribed.
    pub fn unsubscribe(&mut self, key: SubscriptionKey) -> bool {
        self.listeners.remove(key).is_some()
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
