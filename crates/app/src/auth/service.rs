//! Auth service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::auth::{AuthError, Credentials, User};

/// Session-scoped auth service.
///
/// Accepts any well-formed credential pair and keeps the resulting user in
/// memory for the lifetime of the process. Stands in for a real identity
/// provider while exercising the same gating surface.
#[derive(Debug, Default)]
pub struct SessionAuthService {
    current: Mutex<Option<User>>,
}

impl SessionAuthService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuthService for SessionAuthService {
    async fn sign_in(&self, credentials: Credentials) -> Result<User, AuthError> {
        if credentials.email.trim().is_empty() || credentials.password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let user = User {
            uuid: Uuid::now_v7(),
            email: credentials.email.clone(),
            signed_in_at: Timestamp::now(),
        };

        *self.current.lock().await = Some(user.clone());

        info!(email = %user.email, "user signed in");

        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let mut current = self.current.lock().await;

        if current.take().is_none() {
            return Err(AuthError::NotSignedIn);
        }

        info!("user signed out");

        Ok(())
    }

    async fn current_user(&self) -> Option<User> {
        self.current.lock().await.clone()
    }
}

#[automock]
#[async_trait]
/// Shopper identity operations.
pub trait AuthService: Send + Sync {
    /// Validates credentials and starts a session.
    async fn sign_in(&self, credentials: Credentials) -> Result<User, AuthError>;

    /// Ends the current session.
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Returns the signed-in user, if any.
    async fn current_user(&self) -> Option<User>;
}
