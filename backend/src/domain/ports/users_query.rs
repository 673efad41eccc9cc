//! Driving port for user-facing profile queries.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// Domain use-case port for reading profiles.
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Profile of the identity in context; unauthorised when there is none.
    async fn current_user(&self, actor: Option<&UserId>) -> Result<User, Error>;
}
