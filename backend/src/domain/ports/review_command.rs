//! Driving port for review mutations.

use async_trait::async_trait;

use crate::domain::{CampgroundId, Error, Review, ReviewDraft, ReviewId, UserId};

/// Domain use-case port for adding and removing reviews.
#[async_trait]
pub trait ReviewCommand: Send + Sync {
    /// Write a review and link it from its campground.
    async fn create(
        &self,
        actor: Option<&UserId>,
        campground_id: &CampgroundId,
        draft: ReviewDraft,
    ) -> Result<Review, Error>;

    /// Unlink a review from its campground and delete it; only its author may do so.
    async fn delete(
        &self,
        actor: Option<&UserId>,
        campground_id: &CampgroundId,
        review_id: &ReviewId,
    ) -> Result<(), Error>;
}
