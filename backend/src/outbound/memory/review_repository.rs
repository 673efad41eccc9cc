//! In-memory review store.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::lock;
use crate::domain::ports::{ReviewPersistenceError, ReviewRepository};
use crate::domain::{Review, ReviewId};

#[derive(Debug, Default)]
pub struct InMemoryReviewRepository {
    reviews: Mutex<HashMap<ReviewId, Review>>,
}

fn query_error(message: String) -> ReviewPersistenceError {
    ReviewPersistenceError::query(message)
}

#[async_trait]
impl ReviewRepository for InMemoryReviewRepository {
    async fn insert(&self, review: &Review) -> Result<(), ReviewPersistenceError> {
        let mut reviews = lock(&self.reviews, query_error)?;
        if reviews.contains_key(review.id()) {
            return Err(ReviewPersistenceError::query(format!(
                "review {} already exists",
                review.id()
            )));
        }
        reviews.insert(*review.id(), review.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, ReviewPersistenceError> {
        let reviews = lock(&self.reviews, query_error)?;
        Ok(reviews.get(id).cloned())
    }

    async fn find_many(&self, ids: &[ReviewId]) -> Result<Vec<Review>, ReviewPersistenceError> {
        let reviews = lock(&self.reviews, query_error)?;
        Ok(ids.iter().filter_map(|id| reviews.get(id).cloned()).collect())
    }

    async fn delete(&self, id: &ReviewId) -> Result<bool, ReviewPersistenceError> {
        let mut reviews = lock(&self.reviews, query_error)?;
        Ok(reviews.remove(id).is_some())
    }

    async fn delete_many(&self, ids: &[ReviewId]) -> Result<u64, ReviewPersistenceError> {
        let mut reviews = lock(&self.reviews, query_error)?;
        let removed = ids.iter().filter(|id| reviews.remove(*id).is_some()).count();
        Ok(u64::try_from(removed).unwrap_or(u64::MAX))
    }
}
