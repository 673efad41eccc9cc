//! Driving port for account registration.

use async_trait::async_trait;

use crate::domain::{Error, RegistrationDraft, User};

/// Domain use-case port for creating accounts.
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Validate the draft, store a hashed credential and return the profile.
    ///
    /// Malformed or already-taken email and username values fail with
    /// [`crate::domain::ErrorCode::InvalidRequest`].
    async fn register(&self, draft: RegistrationDraft) -> Result<User, Error>;
}
