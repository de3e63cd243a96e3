//! Auth service errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("no user is signed in")]
    NotSignedIn,
}
