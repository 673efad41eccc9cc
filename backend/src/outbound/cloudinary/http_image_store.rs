//! Reqwest-backed Cloudinary image store.
//!
//! Uploads are signed multipart posts into a folder below
//! [`IMAGE_FOLDER`](crate::domain::ports::IMAGE_FOLDER);
//! deletions are signed form posts against the destroy endpoint. The host
//! accepts only `jpeg`, `jpg` or `png` uploads.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockable::Clock;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;
use zeroize::Zeroizing;

use super::dto::{DestroyResponseDto, UploadResponseDto};
use super::signing::{SignatureAlgorithm, sign};
use crate::domain::ImageRef;
use crate::domain::ports::{ImageStore, ImageStoreError, ImageUpload};

/// Public Cloudinary API root.
pub const DEFAULT_CLOUDINARY_ENDPOINT: &str = "https://api.cloudinary.com/v1_1/";

const ALLOWED_FORMATS: &str = "jpeg,jpg,png";

/// Account credentials for a Cloudinary cloud.
#[derive(Clone)]
pub struct CloudinaryCredentials {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: Zeroizing<String>,
    pub signature_algorithm: SignatureAlgorithm,
}

impl std::fmt::Debug for CloudinaryCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryCredentials")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("signature_algorithm", &self.signature_algorithm)
            .finish()
    }
}

/// Image store calling the Cloudinary upload API.
pub struct CloudinaryImageStore {
    client: Client,
    endpoint: Url,
    credentials: CloudinaryCredentials,
    clock: Arc<dyn Clock>,
}

impl CloudinaryImageStore {
    /// Build a store against `endpoint`, normally [`DEFAULT_CLOUDINARY_ENDPOINT`].
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        credentials: CloudinaryCredentials,
        timeout: Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            credentials,
            clock,
        })
    }

    fn action_url(&self, action: &str) -> Result<Url, ImageStoreError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| ImageStoreError::transport("image host endpoint cannot be a base URL"))?
            .pop_if_empty()
            .push(&self.credentials.cloud_name)
            .push("image")
            .push(action);
        Ok(url)
    }

    fn timestamp(&self) -> String {
        self.clock.utc().timestamp().to_string()
    }

    fn signature(&self, params: &[(&str, &str)]) -> String {
        sign(
            params,
            self.credentials.api_secret.as_str(),
            self.credentials.signature_algorithm,
        )
    }
}

#[async_trait]
impl ImageStore for CloudinaryImageStore {
    async fn upload(&self, folder: &str, upload: ImageUpload) -> Result<ImageRef, ImageStoreError> {
        let url = self.action_url("upload")?;
        let timestamp = self.timestamp();
        let signature = self.signature(&[
            ("allowed_formats", ALLOWED_FORMATS),
            ("folder", folder),
            ("timestamp", &timestamp),
        ]);
        let file = Part::bytes(upload.bytes).file_name(upload.file_name);
        let form = Form::new()
            .part("file", file)
            .text("api_key", self.credentials.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", folder.to_owned())
            .text("allowed_formats", ALLOWED_FORMATS)
            .text("signature", signature);

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_transport_error)?;
        let decoded: UploadResponseDto = decode_success(response).await?;
        debug!(public_id = %decoded.public_id, "image uploaded");
        Ok(decoded.into())
    }

    async fn delete(&self, filename: &str) -> Result<(), ImageStoreError> {
        let url = self.action_url("destroy")?;
        let timestamp = self.timestamp();
        let signature = self.signature(&[("public_id", filename), ("timestamp", &timestamp)]);
        let form = [
            ("public_id", filename),
            ("timestamp", timestamp.as_str()),
            ("api_key", self.credentials.api_key.as_str()),
            ("signature", signature.as_str()),
        ];

        let response = self
            .client
            .post(url)
            .form(&form)
            .send()
            .await
            .map_err(map_transport_error)?;
        let decoded: DestroyResponseDto = decode_success(response).await?;
        if decoded.confirms_deletion() {
            Ok(())
        } else {
            Err(ImageStoreError::decode(format!(
                "destroy returned result {:?}",
                decoded.result
            )))
        }
    }
}

async fn decode_success<T: DeserializeOwned>(response: Response) -> Result<T, ImageStoreError> {
    let status = response.status();
    let body = response.bytes().await.map_err(map_transport_error)?;
    if !status.is_success() {
        return Err(map_status_error(status, &body));
    }
    serde_json::from_slice(&body)
        .map_err(|error| ImageStoreError::decode(format!("invalid image host JSON: {error}")))
}

fn map_transport_error(error: reqwest::Error) -> ImageStoreError {
    let error = error.without_url();
    if error.is_timeout() {
        ImageStoreError::timeout(error.to_string())
    } else {
        ImageStoreError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ImageStoreError {
    let message = error_message(body);
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            ImageStoreError::timeout(format!("status {}: {message}", status.as_u16()))
        }
        _ => ImageStoreError::rejected(status.as_u16(), message),
    }
}

/// Cloudinary reports failures as `{"error":{"message":"..."}}`.
fn error_message(body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .and_then(serde_json::Value::as_str)
                .map(str::to_owned)
        })
        .unwrap_or_else(|| "no error message".to_owned())
}
