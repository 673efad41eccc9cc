//! Driving port for campground reads.

use async_trait::async_trait;

use crate::domain::{Campground, CampgroundId, Error, Review, User};

/// Review joined with its author's profile.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewView {
    pub review: Review,
    /// `None` when the author record cannot be resolved.
    pub author: Option<User>,
}

/// Campground joined with its author and reviews.
#[derive(Debug, Clone, PartialEq)]
pub struct CampgroundView {
    pub campground: Campground,
    pub author: Option<User>,
    pub reviews: Vec<ReviewView>,
}

/// Domain use-case port for browsing campgrounds.
#[async_trait]
pub trait CampgroundQuery: Send + Sync {
    /// Every campground.
    async fn list(&self) -> Result<Vec<Campground>, Error>;

    /// One campground with populated author and reviews.
    async fn show(&self, id: &CampgroundId) -> Result<CampgroundView, Error>;
}
