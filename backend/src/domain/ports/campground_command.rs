//! Driving port for campground mutations.

use async_trait::async_trait;

use crate::domain::{Campground, CampgroundDraft, CampgroundId, Error, ImageRef, UserId};

/// Input for creating a campground.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateCampgroundRequest {
    pub draft: CampgroundDraft,
    pub images: Vec<ImageRef>,
}

/// Input for updating a campground.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateCampgroundRequest {
    pub id: CampgroundId,
    pub draft: CampgroundDraft,
    /// Appended after the existing images.
    pub new_images: Vec<ImageRef>,
    /// Filenames to delete from the image host and then unlink.
    pub delete_images: Vec<String>,
}

/// Domain use-case port for creating, editing and deleting campgrounds.
#[async_trait]
pub trait CampgroundCommand: Send + Sync {
    /// Create a campground authored by `actor`.
    async fn create(
        &self,
        actor: Option<&UserId>,
        request: CreateCampgroundRequest,
    ) -> Result<Campground, Error>;

    /// Update a campground; only its author may do so.
    async fn update(
        &self,
        actor: Option<&UserId>,
        request: UpdateCampgroundRequest,
    ) -> Result<Campground, Error>;

    /// Delete a campground and every review it lists; only its author may do so.
    async fn delete(&self, actor: Option<&UserId>, id: &CampgroundId) -> Result<(), Error>;
}
