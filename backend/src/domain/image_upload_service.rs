//! Image upload use case.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use super::policy::require_actor;
use super::ports::{ImageStore, ImageUpload, ImageUploadCommand};
use super::service_errors::map_image_store_error;
use super::{Error, ImageRef, UserId};

/// File extensions the image host accepts.
pub const ALLOWED_IMAGE_EXTENSIONS: [&str; 3] = ["jpeg", "jpg", "png"];

/// Largest accepted upload.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

fn check_upload(upload: &ImageUpload) -> Result<(), Error> {
    let extension = upload
        .file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());
    let allowed = extension
        .as_deref()
        .is_some_and(|ext| ALLOWED_IMAGE_EXTENSIONS.contains(&ext));
    if !allowed {
        return Err(
            Error::invalid_request("images must be jpeg, jpg or png files")
                .with_details(json!({ "field": "fileName", "code": "unsupported_format" })),
        );
    }
    if upload.bytes.is_empty() {
        return Err(Error::invalid_request("image body must not be empty")
            .with_details(json!({ "field": "body", "code": "required" })));
    }
    if upload.bytes.len() > MAX_IMAGE_BYTES {
        return Err(Error::invalid_request("image is too large")
            .with_details(json!({ "field": "body", "code": "too_large", "max": MAX_IMAGE_BYTES })));
    }
    Ok(())
}

/// Upload service implementing [`ImageUploadCommand`].
#[derive(Clone)]
pub struct ImageUploadService {
    images: Arc<dyn ImageStore>,
}

impl ImageUploadService {
    pub fn new(images: Arc<dyn ImageStore>) -> Self {
        Self { images }
    }
}

#[async_trait]
impl ImageUploadCommand for ImageUploadService {
    async fn upload(&self, actor: Option<&UserId>, upload: ImageUpload) -> Result<ImageRef, Error> {
        let actor = require_actor(actor)?;
        check_upload(&upload)?;
        let size = upload.bytes.len();
        let folder = ImageRef::upload_folder(actor);
        let image = self
            .images
            .upload(&folder, upload)
            .await
            .map_err(|error| map_image_store_error(&error))?;
        info!(user_id = %actor, filename = %image.filename, size, "image uploaded");
        Ok(image)
    }
}
