//! Auth data models.

use std::fmt;

use jiff::Timestamp;
use uuid::Uuid;
use zeroize::Zeroizing;

/// Signed-in shopper session data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique session user identifier.
    pub uuid: Uuid,

    /// Email address the user signed in with.
    pub email: String,

    /// When the session started.
    pub signed_in_at: Timestamp,
}

/// Sign-in payload.
///
/// The password is wiped from memory when the credentials are dropped and
/// never appears in debug output.
#[derive(Clone)]
pub struct Credentials {
    /// Email address to sign in with.
    pub email: String,

    /// Account password.
    pub password: Zeroizing<String>,
}

impl Credentials {
    /// Create credentials from an email and password pair.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: Zeroizing::new(password.into()),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"**redacted**")
            .finish()
    }
}
