//! Port for the external image host.
//!
//! The host is reached through exactly two calls: store bytes and get back a
//! reference, or delete a previously stored asset by filename.

use async_trait::async_trait;

use crate::domain::ImageRef;

use super::define_port_error;

define_port_error! {
    /// Errors raised by image host adapters.
    pub enum ImageStoreError {
        /// The host did not answer within the configured timeout.
        Timeout { message: String } => "image host timed out: {message}",
        /// Connection or protocol failure.
        Transport { message: String } => "image host request failed: {message}",
        /// The host answered with an error status.
        Rejected { status: u16, message: String } =>
            "image host rejected the request with status {status}: {message}",
        /// The host answered with an unexpected body.
        Decode { message: String } => "image host response could not be decoded: {message}",
    }
}

/// Image bytes submitted for hosting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Narrow image host contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store an image under `folder` and return its hosted reference.
    async fn upload(&self, folder: &str, upload: ImageUpload) -> Result<ImageRef, ImageStoreError>;

    /// Delete a hosted image. Success means the asset is confirmed gone.
    async fn delete(&self, filename: &str) -> Result<(), ImageStoreError>;
}

/// Root folder images are stored under on the host.
pub const IMAGE_FOLDER: &str = "YelpCamp";

/// Image host stand-in used when no host credentials are configured.
///
/// Uploads produce deterministic references and every deletion succeeds.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureImageStore;

#[async_trait]
impl ImageStore for FixtureImageStore {
    async fn upload(&self, folder: &str, upload: ImageUpload) -> Result<ImageRef, ImageStoreError> {
        let stem = upload
            .file_name
            .rsplit_once('.')
            .map_or(upload.file_name.as_str(), |(stem, _)| stem);
        Ok(ImageRef::new(
            format!("https://images.invalid/image/upload/{folder}/{}", upload.file_name),
            format!("{folder}/{stem}"),
        ))
    }

    async fn delete(&self, _filename: &str) -> Result<(), ImageStoreError> {
        Ok(())
    }
}
