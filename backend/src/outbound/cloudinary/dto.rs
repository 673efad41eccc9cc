//! DTOs for decoding Cloudinary upload and destroy responses.

use serde::Deserialize;

use crate::domain::ImageRef;

#[derive(Debug, Deserialize)]
pub(super) struct UploadResponseDto {
    pub(super) secure_url: String,
    pub(super) public_id: String,
}

impl From<UploadResponseDto> for ImageRef {
    fn from(value: UploadResponseDto) -> Self {
        ImageRef::new(value.secure_url, value.public_id)
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct DestroyResponseDto {
    pub(super) result: String,
}

impl DestroyResponseDto {
    /// `"not found"` means the asset is already gone, which also confirms
    /// the deletion.
    pub(super) fn confirms_deletion(&self) -> bool {
        matches!(self.result.as_str(), "ok" | "not found")
    }
}
