//! Campground use cases: create, update, cascade delete and reads.
//!
//! Every mutation passes through [`authorize_mutation`], and attached image
//! references through [`authorize_images`]. Linked writes follow a
//! child-before-parent order so an interruption leaves at worst an
//! unreferenced review, never a campground listing a missing one.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use super::policy::{authorize_images, authorize_mutation, require_actor};
use super::ports::{
    CampgroundCommand, CampgroundQuery, CampgroundRepository, CampgroundView,
    CreateCampgroundRequest, Geocoder, ImageStore, ReviewRepository, ReviewView,
    UpdateCampgroundRequest, UserRepository,
};
use super::service_errors::{map_campground_error, map_review_error, map_user_error};
use super::{
    Campground, CampgroundId, Error, GeoPoint, ImageRef, UserId, policy::PolicyDenial,
    validate_campground,
};

/// Campground service implementing the command and query driving ports.
#[derive(Clone)]
pub struct CampgroundService<C, R, U> {
    campgrounds: Arc<C>,
    reviews: Arc<R>,
    users: Arc<U>,
    geocoder: Arc<dyn Geocoder>,
    images: Arc<dyn ImageStore>,
}

/// Outcome of removing a batch of images from a campground.
#[derive(Debug, Default)]
struct ImageDeletion {
    /// References safe to drop: deleted on the host, or never the host's to delete.
    unlinked: Vec<String>,
    /// References kept because the host deletion was not confirmed.
    failed: Vec<String>,
}

impl<C, R, U> CampgroundService<C, R, U>
where
    C: CampgroundRepository,
    R: ReviewRepository,
    U: UserRepository,
{
    /// Create a new service over the given stores and collaborators.
    pub fn new(
        campgrounds: Arc<C>,
        reviews: Arc<R>,
        users: Arc<U>,
        geocoder: Arc<dyn Geocoder>,
        images: Arc<dyn ImageStore>,
    ) -> Self {
        Self {
            campgrounds,
            reviews,
            users,
            geocoder,
            images,
        }
    }

    async fn find(&self, id: &CampgroundId) -> Result<Option<Campground>, Error> {
        self.campgrounds
            .find_by_id(id)
            .await
            .map_err(map_campground_error)
    }

    /// Best-effort geocode; absence or failure leaves the geometry unset.
    async fn geocode(&self, location: &str) -> Option<GeoPoint> {
        match self.geocoder.lookup(location).await {
            Ok(Some(point)) => Some(point),
            Ok(None) => {
                warn!(location, "geocoder returned no match; geometry left unset");
                None
            }
            Err(error) => {
                warn!(location, %error, "geocoder failed; geometry left unset");
                None
            }
        }
    }

    /// Whether removing `image` from `campground` should also delete the asset.
    ///
    /// Only the author's own uploads that no other campground references are
    /// deleted on the host; anything else is merely unlinked.
    async fn owns_hosted_asset(&self, campground: &Campground, image: &ImageRef) -> Result<bool, Error> {
        if !image.is_uploaded_by(campground.author()) {
            return Ok(false);
        }
        let shared = self
            .campgrounds
            .image_in_use_elsewhere(&image.filename, campground.id())
            .await
            .map_err(map_campground_error)?;
        Ok(!shared)
    }

    /// Remove each requested image attached to `campground`.
    ///
    /// Filenames not attached to the campground are skipped so callers cannot
    /// remove unrelated hosted assets.
    async fn delete_hosted_images(
        &self,
        campground: &Campground,
        requested: &[String],
    ) -> ImageDeletion {
        let mut outcome = ImageDeletion::default();
        let unique: BTreeSet<&String> = requested.iter().collect();
        for filename in unique {
            let Some(image) = campground.images().iter().find(|i| &i.filename == filename) else {
                warn!(
                    campground_id = %campground.id(),
                    filename = %filename,
                    "ignoring deletion of an image not attached to the campground"
                );
                continue;
            };
            match self.owns_hosted_asset(campground, image).await {
                Ok(true) => {}
                Ok(false) => {
                    info!(
                        campground_id = %campground.id(),
                        filename = %filename,
                        "unlinking image without deleting the hosted asset"
                    );
                    outcome.unlinked.push(filename.clone());
                    continue;
                }
                Err(_) => {
                    outcome.failed.push(filename.clone());
                    continue;
                }
            }
            match self.images.delete(filename).await {
                Ok(()) => outcome.unlinked.push(filename.clone()),
                Err(error) => {
                    warn!(
                        campground_id = %campground.id(),
                        filename = %filename,
                        %error,
                        "image host deletion failed; keeping the reference"
                    );
                    outcome.failed.push(filename.clone());
                }
            }
        }
        outcome
    }

    fn vanished(id: &CampgroundId) -> Error {
        warn!(campground_id = %id, "campground disappeared during update");
        PolicyDenial::NotFound { kind: "campground" }.into()
    }
}

#[async_trait]
impl<C, R, U> CampgroundCommand for CampgroundService<C, R, U>
where
    C: CampgroundRepository,
    R: ReviewRepository,
    U: UserRepository,
{
    async fn create(
        &self,
        actor: Option<&UserId>,
        request: CreateCampgroundRequest,
    ) -> Result<Campground, Error> {
        let author = require_actor(actor)?;
        let details = validate_campground(&request.draft)?;
        authorize_images(author, &request.images)?;
        let geometry = self.geocode(&details.location).await;
        let campground = Campground::create(*author, details, geometry, request.images);
        self.campgrounds
            .insert(&campground)
            .await
            .map_err(map_campground_error)?;
        info!(
            campground_id = %campground.id(),
            user_id = %author,
            "campground created"
        );
        Ok(campground)
    }

    async fn update(
        &self,
        actor: Option<&UserId>,
        request: UpdateCampgroundRequest,
    ) -> Result<Campground, Error> {
        let UpdateCampgroundRequest {
            id,
            draft,
            new_images,
            delete_images,
        } = request;
        let author = require_actor(actor)?;
        let current = authorize_mutation(actor, self.find(&id).await?)?;
        let details = validate_campground(&draft)?;
        authorize_images(author, &new_images)?;

        let geometry = if details.location == current.location() {
            current.geometry().copied()
        } else {
            self.geocode(&details.location).await
        };
        let found = self
            .campgrounds
            .update_details(&id, &details, geometry)
            .await
            .map_err(map_campground_error)?;
        if !found {
            return Err(Self::vanished(&id));
        }

        // Already-attached filenames are skipped so a retried update does not
        // list the same image twice.
        let mut appended: Vec<ImageRef> = Vec::with_capacity(new_images.len());
        for image in new_images {
            let seen = current.has_image(&image.filename)
                || appended.iter().any(|kept| kept.filename == image.filename);
            if !seen {
                appended.push(image);
            }
        }
        if !appended.is_empty() {
            self.campgrounds
                .append_images(&id, &appended)
                .await
                .map_err(map_campground_error)?;
        }

        let deletion = self.delete_hosted_images(&current, &delete_images).await;
        if !deletion.unlinked.is_empty() {
            self.campgrounds
                .remove_images(&id, &deletion.unlinked)
                .await
                .map_err(map_campground_error)?;
        }

        let updated = self.find(&id).await?.ok_or_else(|| Self::vanished(&id))?;
        info!(
            campground_id = %id,
            added_images = appended.len(),
            removed_images = deletion.unlinked.len(),
            "campground updated"
        );

        if deletion.failed.is_empty() {
            Ok(updated)
        } else {
            Err(
                Error::service_unavailable("Some images could not be deleted; please retry")
                    .with_details(json!({ "failedImages": deletion.failed })),
            )
        }
    }

    async fn delete(&self, actor: Option<&UserId>, id: &CampgroundId) -> Result<(), Error> {
        require_actor(actor)?;
        let campground = authorize_mutation(actor, self.find(id).await?)?;

        let removed_reviews = self
            .reviews
            .delete_many(campground.reviews())
            .await
            .map_err(map_review_error)?;
        let removed = self
            .campgrounds
            .delete(id)
            .await
            .map_err(map_campground_error)?;
        if !removed {
            return Err(PolicyDenial::NotFound { kind: "campground" }.into());
        }
        info!(
            campground_id = %id,
            removed_reviews,
            "campground deleted with its reviews"
        );
        Ok(())
    }
}

#[async_trait]
impl<C, R, U> CampgroundQuery for CampgroundService<C, R, U>
where
    C: CampgroundRepository,
    R: ReviewRepository,
    U: UserRepository,
{
    async fn list(&self) -> Result<Vec<Campground>, Error> {
        self.campgrounds.list().await.map_err(map_campground_error)
    }

    async fn show(&self, id: &CampgroundId) -> Result<CampgroundView, Error> {
        let campground = self
            .find(id)
            .await?
            .ok_or_else(|| Error::from(PolicyDenial::NotFound { kind: "campground" }))?;
        let reviews = self
            .reviews
            .find_many(campground.reviews())
            .await
            .map_err(map_review_error)?;

        let mut author_ids: Vec<UserId> = Vec::with_capacity(reviews.len() + 1);
        for author in std::iter::once(campground.author()).chain(reviews.iter().map(|r| r.author()))
        {
            if !author_ids.contains(author) {
                author_ids.push(*author);
            }
        }
        let authors = self
            .users
            .find_many(&author_ids)
            .await
            .map_err(map_user_error)?;
        let profile = |id: &UserId| authors.iter().find(|user| user.id() == id).cloned();

        let reviews = reviews
            .into_iter()
            .map(|review| ReviewView {
                author: profile(review.author()),
                review,
            })
            .collect();
        Ok(CampgroundView {
            author: profile(campground.author()),
            campground,
            reviews,
        })
    }
}

#[cfg(test)]
mod tests;
