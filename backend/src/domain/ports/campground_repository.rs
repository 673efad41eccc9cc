//! Port abstraction for campground persistence.
//!
//! Each method touches a single record. Linked operations across campgrounds
//! and reviews are sequenced by the domain services.

use async_trait::async_trait;

use crate::domain::{Campground, CampgroundDetails, CampgroundId, GeoPoint, ImageRef, ReviewId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by campground repository adapters.
    pub enum CampgroundPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "campground repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "campground repository query failed: {message}",
    }
}

/// Content store for campgrounds.
///
/// Mutators return `false` when the campground does not exist.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CampgroundRepository: Send + Sync {
    /// Persist a new campground.
    async fn insert(&self, campground: &Campground) -> Result<(), CampgroundPersistenceError>;

    /// Fetch a campground by id.
    async fn find_by_id(
        &self,
        id: &CampgroundId,
    ) -> Result<Option<Campground>, CampgroundPersistenceError>;

    /// List every campground.
    async fn list(&self) -> Result<Vec<Campground>, CampgroundPersistenceError>;

    /// Overwrite the scalar fields and geometry. The author is never written.
    async fn update_details(
        &self,
        id: &CampgroundId,
        details: &CampgroundDetails,
        geometry: Option<GeoPoint>,
    ) -> Result<bool, CampgroundPersistenceError>;

    /// Append image references after the existing ones.
    async fn append_images(
        &self,
        id: &CampgroundId,
        images: &[ImageRef],
    ) -> Result<bool, CampgroundPersistenceError>;

    /// Drop image references whose filename is listed.
    async fn remove_images(
        &self,
        id: &CampgroundId,
        filenames: &[String],
    ) -> Result<bool, CampgroundPersistenceError>;

    /// Whether a campground other than `except` references `filename`.
    async fn image_in_use_elsewhere(
        &self,
        filename: &str,
        except: &CampgroundId,
    ) -> Result<bool, CampgroundPersistenceError>;

    /// Link a review id at the end of the review list.
    async fn append_review(
        &self,
        id: &CampgroundId,
        review: &ReviewId,
    ) -> Result<bool, CampgroundPersistenceError>;

    /// Unlink a review id.
    async fn remove_review(
        &self,
        id: &CampgroundId,
        review: &ReviewId,
    ) -> Result<bool, CampgroundPersistenceError>;

    /// Delete the campground record only.
    async fn delete(&self, id: &CampgroundId) -> Result<bool, CampgroundPersistenceError>;

    /// Delete every campground, returning the number removed.
    async fn delete_all(&self) -> Result<u64, CampgroundPersistenceError>;
}
