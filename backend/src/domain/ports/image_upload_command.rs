//! Driving port for image uploads.

use async_trait::async_trait;

use super::ImageUpload;
use crate::domain::{Error, ImageRef, UserId};

/// Domain use-case port for hosting campground images.
#[async_trait]
pub trait ImageUploadCommand: Send + Sync {
    /// Host an image for later attachment to a campground.
    async fn upload(&self, actor: Option<&UserId>, upload: ImageUpload) -> Result<ImageRef, Error>;
}
