//! Review use cases: write-then-link on create, unlink-then-delete on delete.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use super::policy::{PolicyDenial, authorize_mutation, require_actor};
use super::ports::{CampgroundRepository, ReviewCommand, ReviewRepository};
use super::service_errors::{map_campground_error, map_review_error};
use super::{CampgroundId, Error, Review, ReviewDraft, ReviewId, UserId, validate_review};

const CAMPGROUND_MISSING: PolicyDenial = PolicyDenial::NotFound { kind: "campground" };
const REVIEW_MISSING: PolicyDenial = PolicyDenial::NotFound { kind: "review" };

/// Review service implementing [`ReviewCommand`].
#[derive(Clone)]
pub struct ReviewService<C, R> {
    campgrounds: Arc<C>,
    reviews: Arc<R>,
}

impl<C, R> ReviewService<C, R>
where
    C: CampgroundRepository,
    R: ReviewRepository,
{
    pub fn new(campgrounds: Arc<C>, reviews: Arc<R>) -> Self {
        Self {
            campgrounds,
            reviews,
        }
    }

    /// Remove a review that could not be linked. Failures only log: the
    /// orphan is unreachable and the caller already sees the link error.
    async fn discard_orphan(&self, review_id: &ReviewId) {
        if let Err(error) = self.reviews.delete(review_id).await {
            warn!(
                review_id = %review_id,
                %error,
                "failed to discard unlinked review; leaving orphan"
            );
        }
    }
}

#[async_trait]
impl<C, R> ReviewCommand for ReviewService<C, R>
where
    C: CampgroundRepository,
    R: ReviewRepository,
{
    async fn create(
        &self,
        actor: Option<&UserId>,
        campground_id: &CampgroundId,
        draft: ReviewDraft,
    ) -> Result<Review, Error> {
        let author = require_actor(actor)?;
        let content = validate_review(&draft)?;
        self.campgrounds
            .find_by_id(campground_id)
            .await
            .map_err(map_campground_error)?
            .ok_or(CAMPGROUND_MISSING)?;

        let review = Review::create(*author, content);
        self.reviews
            .insert(&review)
            .await
            .map_err(map_review_error)?;

        match self.campgrounds.append_review(campground_id, review.id()).await {
            Ok(true) => {}
            Ok(false) => {
                self.discard_orphan(review.id()).await;
                return Err(CAMPGROUND_MISSING.into());
            }
            Err(error) => {
                self.discard_orphan(review.id()).await;
                return Err(map_campground_error(error));
            }
        }

        info!(
            campground_id = %campground_id,
            review_id = %review.id(),
            user_id = %author,
            "review created"
        );
        Ok(review)
    }

    async fn delete(
        &self,
        actor: Option<&UserId>,
        campground_id: &CampgroundId,
        review_id: &ReviewId,
    ) -> Result<(), Error> {
        require_actor(actor)?;
        let campground = self
            .campgrounds
            .find_by_id(campground_id)
            .await
            .map_err(map_campground_error)?
            .ok_or(CAMPGROUND_MISSING)?;
        if !campground.reviews().contains(review_id) {
            return Err(REVIEW_MISSING.into());
        }
        let review = self
            .reviews
            .find_by_id(review_id)
            .await
            .map_err(map_review_error)?;
        authorize_mutation(actor, review)?;

        let unlinked = self
            .campgrounds
            .remove_review(campground_id, review_id)
            .await
            .map_err(map_campground_error)?;
        if !unlinked {
            return Err(CAMPGROUND_MISSING.into());
        }
        self.reviews
            .delete(review_id)
            .await
            .map_err(map_review_error)?;

        info!(
            campground_id = %campground_id,
            review_id = %review_id,
            "review deleted"
        );
        Ok(())
    }
}
