//! Storefront session orchestration.

use std::sync::Arc;

use barrow::{
    cart::{CartAction, CartState},
    catalog::Catalog,
    pricing::{CheckoutPolicy, OrderSummary, SummaryError},
    products::ProductId,
    store::{CartStore, SubscriptionKey},
};
use thiserror::Error;
use tracing::info;

use crate::{
    auth::{AuthError, AuthService, Credentials, User},
    notify::{Notice, Notifier},
};

#[derive(Debug, Error)]
pub enum StorefrontError {
    #[error("no product with id {0} in the catalog")]
    UnknownProduct(ProductId),

    #[error("product {0} is out of stock")]
    OutOfStock(ProductId),

    #[error("sign in to manage the cart")]
    SignInRequired,

    #[error("the cart is empty")]
    EmptyCart,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Summary(#[from] SummaryError),
}

/// Gating rules applied before cart mutations.
///
/// Both gates are optional: the cart itself accepts any command, and a
/// storefront that wants the open behavior simply leaves the defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CartPolicy {
    /// Require a signed-in user before changing the cart.
    pub require_sign_in: bool,

    /// Refuse to add products marked out of stock.
    pub enforce_stock: bool,
}

/// One shopper session over a catalog.
///
/// Owns the cart store and wires the auth, notification, and pricing
/// collaborators around it. All cart access from the application goes
/// through here; the store itself never learns about users or stock.
pub struct Storefront {
    catalog: Catalog,
    store: CartStore,
    auth: Arc<dyn AuthService>,
    notifier: Arc<dyn Notifier>,
    cart_policy: CartPolicy,
    checkout_policy: CheckoutPolicy,
}

impl Storefront {
    #[must_use]
    pub fn new(
        catalog: Catalog,
        store: CartStore,
        auth: Arc<dyn AuthService>,
        notifier: Arc<dyn Notifier>,
        cart_policy: CartPolicy,
        checkout_policy: CheckoutPolicy,
    ) -> Self {
        Self {
            catalog,
            store,
            auth,
            notifier,
            cart_policy,
            checkout_policy,
        }
    }

    /// The catalog this storefront sells from.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The current cart snapshot.
    #[must_use]
    pub fn state(&self) -> Arc<CartState> {
        self.store.state()
    }

    /// The checkout policy used for order summaries.
    #[must_use]
    pub fn checkout_policy(&self) -> &CheckoutPolicy {
        &self.checkout_policy
    }

    /// Register a listener called with every new cart snapshot.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionKey
    where
        F: Fn(&CartState) + Send + Sync + 'static,
    {
        self.store.subscribe(listener)
    }

    /// Remove a previously registered cart listener.
    pub fn unsubscribe(&mut self, key: SubscriptionKey) -> bool {
        self.store.unsubscribe(key)
    }

    /// Sign a shopper in through the auth service.
    ///
    /// # Errors
    ///
    /// Returns a [`StorefrontError`] if the credentials are rejected.
    pub async fn sign_in(&self, credentials: Credentials) -> Result<User, StorefrontError> {
        let user = self.auth.sign_in(credentials).await?;

        self.notifier.notify(&Notice::success(
            "Signed In",
            format!("Welcome back, {}.", user.email),
        ));

        Ok(user)
    }

    /// Sign the current shopper out.
    ///
    /// # Errors
    ///
    /// Returns a [`StorefrontError`] if no user is signed in.
    pub async fn sign_out(&self) -> Result<(), StorefrontError> {
        self.auth.sign_out().await?;

        self.notifier
            .notify(&Notice::info("Signed Out", "You have been signed out."));

        Ok(())
    }

    /// Add a catalog product to the cart.
    ///
    /// A quantity of zero adds a single unit, matching the add-to-cart
    /// default everywhere else.
    ///
    /// # Errors
    ///
    /// Returns a [`StorefrontError`] if the product is unknown, or when a
    /// policy gate (sign-in, stock) refuses the add.
    #[tracing::instrument(
        name = "storefront.add_to_cart",
        skip(self),
        fields(product_id = %id),
        err
    )]
    pub async fn add_to_cart(
        &mut self,
        id: ProductId,
        quantity: u32,
    ) -> Result<Arc<CartState>, StorefrontError> {
        self.ensure_signed_in().await?;

        let Some(product) = self.catalog.get(id) else {
            return Err(StorefrontError::UnknownProduct(id));
        };

        if self.cart_policy.enforce_stock && !product.in_stock {
            self.notifier.notify(&Notice::warning(
                "Out of Stock",
                "This product is currently unavailable.",
            ));

            return Err(StorefrontError::OutOfStock(id));
        }

        let state = self.store.add_many(product, quantity.max(1));

        self.notifier.notify(&Notice::success(
            "Added to Cart",
            format!("{} has been added to your cart.", product.name),
        ));

        Ok(state)
    }

    /// Remove a line from the cart.
    ///
    /// Unknown ids leave the cart unchanged and raise no notice.
    pub async fn remove_from_cart(
        &mut self,
        id: ProductId,
    ) -> Result<Arc<CartState>, StorefrontError> {
        self.ensure_signed_in().await?;

        let known = self.store.state().line(id).is_some();
        let state = self.store.dispatch(&CartAction::RemoveFromCart(id));

        if known {
            self.notifier.notify(&Notice::info(
                "Item Removed",
                "Product has been removed from your cart.",
            ));
        }

        Ok(state)
    }

    /// Set the absolute quantity of a cart line.
    ///
    /// Quantities at or below zero remove the line; unknown ids leave the
    /// cart unchanged.
    pub async fn update_quantity(
        &mut self,
        id: ProductId,
        quantity: i64,
    ) -> Result<Arc<CartState>, StorefrontError> {
        self.ensure_signed_in().await?;

        let known = self.store.state().line(id).is_some();
        let state = self.store.dispatch(&CartAction::UpdateQuantity { id, quantity });

        if known && quantity <= 0 {
            self.notifier.notify(&Notice::info(
                "Item Removed",
                "Product has been removed from your cart.",
            ));
        }

        Ok(state)
    }

    /// Empty the cart.
    pub async fn clear_cart(&mut self) -> Result<Arc<CartState>, StorefrontError> {
        self.ensure_signed_in().await?;

        let state = self.store.dispatch(&CartAction::ClearCart);

        self.notifier.notify(&Notice::info(
            "Cart Cleared",
            "All items were removed from your cart.",
        ));

        Ok(state)
    }

    /// Derive the order summary for the current cart.
    ///
    /// # Errors
    ///
    /// Returns a [`StorefrontError`] if the summary cannot be derived.
    pub fn summary(&self) -> Result<OrderSummary, StorefrontError> {
        Ok(OrderSummary::for_cart(
            &self.store.state(),
            &self.checkout_policy,
        )?)
    }

    /// Place the order: derive the final summary and empty the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`StorefrontError`] if the cart is empty, the sign-in gate
    /// refuses, or the summary cannot be derived.
    #[tracing::instrument(name = "storefront.checkout", skip(self), err)]
    pub async fn checkout(&mut self) -> Result<OrderSummary, StorefrontError> {
        self.ensure_signed_in().await?;

        if self.store.state().is_empty() {
            return Err(StorefrontError::EmptyCart);
        }

        let summary = self.summary()?;

        self.store.dispatch(&CartAction::ClearCart);

        info!(
            grand_total = summary.grand_total().to_minor_units(),
            "order placed"
        );

        self.notifier.notify(&Notice::success(
            "Order Placed",
            "Thank you for your purchase. Your order has been successfully placed.",
        ));

        Ok(summary)
    }

    async fn ensure_signed_in(&self) -> Result<(), StorefrontError> {
        if !self.cart_policy.require_sign_in {
            return Ok(());
        }

        if self.auth.current_user().await.is_some() {
            return Ok(());
        }

        self.notifier.notify(&Notice::warning(
            "Authentication Required",
            "Please sign in to add products to your cart.",
        ));

        Err(StorefrontError::SignInRequired)
    }
}
