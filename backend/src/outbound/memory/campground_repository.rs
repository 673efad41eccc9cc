//! In-memory campground store.

use std::sync::Mutex;

use async_trait::async_trait;

use super::lock;
use crate::domain::ports::{CampgroundPersistenceError, CampgroundRepository};
use crate::domain::{
    Campground, CampgroundDetails, CampgroundId, CampgroundParts, GeoPoint, ImageRef, ReviewId,
};

/// Campgrounds kept in creation order.
#[derive(Debug, Default)]
pub struct InMemoryCampgroundRepository {
    campgrounds: Mutex<Vec<Campground>>,
}

fn query_error(message: String) -> CampgroundPersistenceError {
    CampgroundPersistenceError::query(message)
}

impl InMemoryCampgroundRepository {
    /// Apply `change` to the stored parts of `id`; `false` when absent.
    fn modify(
        &self,
        id: &CampgroundId,
        change: impl FnOnce(&mut CampgroundParts),
    ) -> Result<bool, CampgroundPersistenceError> {
        let mut campgrounds = lock(&self.campgrounds, query_error)?;
        let Some(slot) = campgrounds.iter_mut().find(|c| c.id() == id) else {
            return Ok(false);
        };
        let mut parts = slot.clone().into_parts();
        change(&mut parts);
        *slot = Campground::from(parts);
        Ok(true)
    }
}

#[async_trait]
impl CampgroundRepository for InMemoryCampgroundRepository {
    async fn insert(&self, campground: &Campground) -> Result<(), CampgroundPersistenceError> {
        let mut campgrounds = lock(&self.campgrounds, query_error)?;
        if campgrounds.iter().any(|c| c.id() == campground.id()) {
            return Err(CampgroundPersistenceError::query(format!(
                "campground {} already exists",
                campground.id()
            )));
        }
        campgrounds.push(campground.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &CampgroundId,
    ) -> Result<Option<Campground>, CampgroundPersistenceError> {
        let campgrounds = lock(&self.campgrounds, query_error)?;
        Ok(campgrounds.iter().find(|c| c.id() == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Campground>, CampgroundPersistenceError> {
        let campgrounds = lock(&self.campgrounds, query_error)?;
        Ok(campgrounds.clone())
    }

    async fn update_details(
        &self,
        id: &CampgroundId,
        details: &CampgroundDetails,
        geometry: Option<GeoPoint>,
    ) -> Result<bool, CampgroundPersistenceError> {
        self.modify(id, |parts| {
            parts.details = details.clone();
            parts.geometry = geometry;
        })
    }

    async fn append_images(
        &self,
        id: &CampgroundId,
        images: &[ImageRef],
    ) -> Result<bool, CampgroundPersistenceError> {
        self.modify(id, |parts| parts.images.extend_from_slice(images))
    }

    async fn remove_images(
        &self,
        id: &CampgroundId,
        filenames: &[String],
    ) -> Result<bool, CampgroundPersistenceError> {
        self.modify(id, |parts| {
            parts.images.retain(|image| !filenames.contains(&image.filename));
        })
    }

    async fn image_in_use_elsewhere(
        &self,
        filename: &str,
        except: &CampgroundId,
    ) -> Result<bool, CampgroundPersistenceError> {
        let campgrounds = lock(&self.campgrounds, query_error)?;
        Ok(campgrounds
            .iter()
            .any(|c| c.id() != except && c.has_image(filename)))
    }

    async fn append_review(
        &self,
        id: &CampgroundId,
        review: &ReviewId,
    ) -> Result<bool, CampgroundPersistenceError> {
        self.modify(id, |parts| parts.reviews.push(*review))
    }

    async fn remove_review(
        &self,
        id: &CampgroundId,
        review: &ReviewId,
    ) -> Result<bool, CampgroundPersistenceError> {
        self.modify(id, |parts| parts.reviews.retain(|linked| linked != review))
    }

    async fn delete(&self, id: &CampgroundId) -> Result<bool, CampgroundPersistenceError> {
        let mut campgrounds = lock(&self.campgrounds, query_error)?;
        let before = campgrounds.len();
        campgrounds.retain(|c| c.id() != id);
        Ok(campgrounds.len() != before)
    }

    async fn delete_all(&self) -> Result<u64, CampgroundPersistenceError> {
        let mut campgrounds = lock(&self.campgrounds, query_error)?;
        let removed = campgrounds.len();
        campgrounds.clear();
        Ok(u64::try_from(removed).unwrap_or(u64::MAX))
    }
}
