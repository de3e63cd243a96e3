//! Pricing

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::cart::{CartState, LineItem};

/// Free-shipping threshold of the standard policy, in minor units.
const STANDARD_FREE_SHIPPING_THRESHOLD_MINOR: i64 = 400_000;

/// Flat shipping fee of the standard policy, in minor units.
const STANDARD_FLAT_SHIPPING_FEE_MINOR: i64 = 82_900;

/// Tax rate of the standard policy.
const STANDARD_TAX_RATE: f64 = 0.18;

/// Errors that can occur while deriving an order summary.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// The cart and the pricing policy use different currencies.
    #[error("Cart has currency {cart}, but pricing policy has currency {policy}")]
    CurrencyMismatch {
        /// The cart's currency code
        cart: &'static str,
        /// The policy's currency code
        policy: &'static str,
    },

    /// The policy's own amounts use different currencies.
    #[error("Shipping fee has currency {fee}, but free-shipping threshold has currency {threshold}")]
    PolicyCurrencyMismatch {
        /// The threshold's currency code
        threshold: &'static str,
        /// The fee's currency code
        fee: &'static str,
    },

    /// Tax calculation could not be safely converted to minor units.
    #[error("tax conversion overflowed or was not finite")]
    TaxConversion,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Calculates the total of a list of cart lines in the given currency.
///
/// Infallible: an empty list totals zero, and the lines' currencies are
/// validated against the cart currency when the lines are constructed.
#[must_use]
pub fn items_total(items: &[LineItem], currency: &'static Currency) -> Money<'static, Currency> {
    let minor_units: i64 = items
        .iter()
        .map(|line| line.price().to_minor_units() * i64::from(line.quantity()))
        .sum();

    Money::from_minor(minor_units, currency)
}

/// Calculates the number of units across a list of cart lines.
#[must_use]
pub fn items_count(items: &[LineItem]) -> u64 {
    items.iter().map(|line| u64::from(line.quantity())).sum()
}

/// Checkout display policy: how shipping and tax derive from a cart total.
#[derive(Debug, Clone)]
pub struct CheckoutPolicy {
    free_shipping_threshold: Money<'static, Currency>,
    flat_shipping_fee: Money<'static, Currency>,
    tax_rate: Percentage,
}

impl CheckoutPolicy {
    /// Create a policy from explicit amounts.
    ///
    /// # Errors
    ///
    /// Returns a [`SummaryError`] if the threshold and fee use different
    /// currencies.
    pub fn new(
        free_shipping_threshold: Money<'static, Currency>,
        flat_shipping_fee: Money<'static, Currency>,
        tax_rate: Percentage,
    ) -> Result<Self, SummaryError> {
        if free_shipping_threshold.currency() != flat_shipping_fee.currency() {
            return Err(SummaryError::PolicyCurrencyMismatch {
                threshold: free_shipping_threshold.currency().iso_alpha_code,
                fee: flat_shipping_fee.currency().iso_alpha_code,
            });
        }

        Ok(Self {
            free_shipping_threshold,
            flat_shipping_fee,
            tax_rate,
        })
    }

    /// The standard storefront policy in the given currency: free shipping
    /// above 4,000.00, a flat 829.00 fee below it, and 18% tax.
    #[must_use]
    pub fn standard(currency: &'static Currency) -> Self {
        Self {
            free_shipping_threshold: Money::from_minor(
                STANDARD_FREE_SHIPPING_THRESHOLD_MINOR,
                currency,
            ),
            flat_shipping_fee: Money::from_minor(STANDARD_FLAT_SHIPPING_FEE_MINOR, currency),
            tax_rate: Percentage::from(STANDARD_TAX_RATE),
        }
    }

    /// Order total above which shipping is free.
    #[must_use]
    pub fn free_shipping_threshold(&self) -> Money<'static, Currency> {
        self.free_shipping_threshold
    }

    /// Shipping fee charged at or below the free-shipping threshold.
    #[must_use]
    pub fn flat_shipping_fee(&self) -> Money<'static, Currency> {
        self.flat_shipping_fee
    }

    /// Tax rate applied to the cart subtotal.
    #[must_use]
    pub fn tax_rate(&self) -> Percentage {
        self.tax_rate
    }

    /// The policy currency.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.free_shipping_threshold.currency()
    }
}

/// Presentation-only totals derived from a cart and a checkout policy.
///
/// Never stored in cart state; derived fresh for display whenever the cart
/// changes.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSummary {
    subtotal: Money<'static, Currency>,
    shipping: Money<'static, Currency>,
    tax: Money<'static, Currency>,
    grand_total: Money<'static, Currency>,
}

impl OrderSummary {
    /// Derive the order summary for a cart under a checkout policy.
    ///
    /// Shipping is free when the subtotal strictly exceeds the policy
    /// threshold; tax is the policy rate applied to the subtotal, rounded
    /// half away from zero to whole minor units.
    ///
    /// # Errors
    ///
    /// Returns a [`SummaryError`] if the cart and policy currencies differ,
    /// or if the tax calculation cannot be represented.
    pub fn for_cart(cart: &CartState, policy: &CheckoutPolicy) -> Result<Self, SummaryError> {
        let currency = cart.currency();

        if policy.currency() != currency {
            return Err(SummaryError::CurrencyMismatch {
                cart: currency.iso_alpha_code,
                policy: policy.currency().iso_alpha_code,
            });
        }

        let subtotal = cart.total();
        let subtotal_minor = subtotal.to_minor_units();

        let shipping_minor = if subtotal_minor > policy.free_shipping_threshold.to_minor_units() {
            0
        } else {
            policy.flat_shipping_fee.to_minor_units()
        };

        let tax_minor = tax_of_minor(policy.tax_rate, subtotal_minor)?;

        let shipping = Money::from_minor(shipping_minor, currency);
        let tax = Money::from_minor(tax_minor, currency);
        let grand_total = subtotal.add(shipping)?.add(tax)?;

        Ok(Self {
            subtotal,
            shipping,
            tax,
            grand_total,
        })
    }

    /// Sum of unit price times quantity over the cart.
    #[must_use]
    pub fn subtotal(&self) -> Money<'static, Currency> {
        self.subtotal
    }

    /// Shipping charge for this order.
    #[must_use]
    pub fn shipping(&self) -> Money<'static, Currency> {
        self.shipping
    }

    /// Whether this order qualified for free shipping.
    #[must_use]
    pub fn free_shipping(&self) -> bool {
        self.shipping.to_minor_units() == 0
    }

    /// Tax charged on the subtotal.
    #[must_use]
    pub fn tax(&self) -> Money<'static, Currency> {
        self.tax
    }

    /// Subtotal plus shipping plus tax.
    #[must_use]
    pub fn grand_total(&self) -> Money<'static, Currency> {
        self.grand_total
    }
}

/// Calculate the tax amount in minor units for a rate and a minor unit amount.
fn tax_of_minor(rate: Percentage, minor: i64) -> Result<i64, SummaryError> {
    let minor = Decimal::from_i64(minor).ok_or(SummaryError::TaxConversion)?;

    (rate * Decimal::ONE) // decimal_percentage doesn't expose the underlying Decimal
        .checked_mul(minor)
        .ok_or(SummaryError::TaxConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(SummaryError::TaxConversion)
}
