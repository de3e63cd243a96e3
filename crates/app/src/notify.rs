//! User-facing notifications.

use mockall::automock;
use tracing::{info, warn};

/// How prominently a notice should be surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Neutral status update
    Info,

    /// A shopper action completed
    Success,

    /// A shopper action was refused
    Warning,
}

/// One user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Short headline, e.g. `"Added to Cart"`.
    pub title: String,

    /// Sentence-length detail line.
    pub body: String,

    /// Display severity.
    pub severity: Severity,
}

impl Notice {
    /// Create an informational notice.
    #[must_use]
    pub fn info(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            severity: Severity::Info,
        }
    }

    /// Create a success notice.
    #[must_use]
    pub fn success(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            severity: Severity::Success,
        }
    }

    /// Create a warning notice.
    #[must_use]
    pub fn warning(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            severity: Severity::Warning,
        }
    }
}

/// Notifier that emits notices through the tracing log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: &Notice) {
        match notice.severity {
            Severity::Info | Severity::Success => {
                info!(title = %notice.title, "{}", notice.body);
            }
            Severity::Warning => {
                warn!(title = %notice.title, "{}", notice.body);
            }
        }
    }
}

#[automock]
/// Sink for user-facing notifications.
pub trait Notifier: Send + Sync {
    /// Delivers one notice to the shopper.
    fn notify(&self, notice: &Notice);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_the_severity() {
        let added = Notice::success("Added to Cart", "Bluetooth Speaker is in your cart.");
        let refused = Notice::warning("Sign In Required", "Please sign in first.");

        assert_eq!(added.severity, Severity::Success);
        assert_eq!(refused.severity, Severity::Warning);
        assert_eq!(added.title, "Added to Cart");
    }

    #[test]
    fn mock_notifier_records_expectations() {
        let mut notifier = MockNotifier::new();

        notifier
            .expect_notify()
            .withf(|notice| notice.severity == Severity::Info)
            .times(1)
            .return_const(());

        notifier.notify(&Notice::info("Cart Cleared", "All items were removed."));
    }
}
