//! Port abstraction for review persistence.

use async_trait::async_trait;

use crate::domain::{Review, ReviewId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by review repository adapters.
    pub enum ReviewPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "review repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "review repository query failed: {message}",
    }
}

/// Content store for reviews.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Persist a new review.
    async fn insert(&self, review: &Review) -> Result<(), ReviewPersistenceError>;

    /// Fetch a review by id.
    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, ReviewPersistenceError>;

    /// Fetch the reviews that exist among `ids`, in the order given.
    async fn find_many(&self, ids: &[ReviewId]) -> Result<Vec<Review>, ReviewPersistenceError>;

    /// Delete one review; `false` when it did not exist.
    async fn delete(&self, id: &ReviewId) -> Result<bool, ReviewPersistenceError>;

    /// Delete exactly the listed reviews, returning the number removed.
    async fn delete_many(&self, ids: &[ReviewId]) -> Result<u64, ReviewPersistenceError>;
}
