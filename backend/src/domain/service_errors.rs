//! Classification of driven-port failures into domain errors.
//!
//! Connection failures become `service_unavailable`; everything else a
//! repository reports is an internal fault. Adapter text is logged here and
//! never copied into the returned error, which carries a fixed message.

use tracing::error;

use super::Error;
use super::ports::{
    CampgroundPersistenceError, CredentialHasherError, ImageStoreError, ReviewPersistenceError,
    UserPersistenceError,
};

/// Client-facing message for any storage outage.
pub const STORE_UNAVAILABLE_MESSAGE: &str = "The service is temporarily unavailable; please retry";
/// Client-facing message for an image host failure.
pub const IMAGE_HOST_UNAVAILABLE_MESSAGE: &str =
    "The image host is temporarily unavailable; please retry";
const INTERNAL_MESSAGE: &str = "Internal server error";

fn unavailable(store: &'static str, message: &str) -> Error {
    error!(store, error = message, "repository connection failed");
    Error::service_unavailable(STORE_UNAVAILABLE_MESSAGE)
}

fn internal(store: &'static str, message: &str) -> Error {
    error!(store, error = message, "repository query failed");
    Error::internal(INTERNAL_MESSAGE)
}

pub(crate) fn map_campground_error(error: CampgroundPersistenceError) -> Error {
    match error {
        CampgroundPersistenceError::Connection { message } => unavailable("campgrounds", &message),
        CampgroundPersistenceError::Query { message } => internal("campgrounds", &message),
    }
}

pub(crate) fn map_review_error(error: ReviewPersistenceError) -> Error {
    match error {
        ReviewPersistenceError::Connection { message } => unavailable("reviews", &message),
        ReviewPersistenceError::Query { message } => internal("reviews", &message),
    }
}

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => unavailable("users", &message),
        UserPersistenceError::Query { message } => internal("users", &message),
        UserPersistenceError::DuplicateUsername { .. } => {
            super::RegistrationValidationError::UsernameTaken.into()
        }
        UserPersistenceError::DuplicateEmail { .. } => {
            super::RegistrationValidationError::EmailTaken.into()
        }
    }
}

pub(crate) fn map_hasher_error(error: CredentialHasherError) -> Error {
    error!(%error, "credential hashing failed");
    Error::internal(INTERNAL_MESSAGE)
}

pub(crate) fn map_image_store_error(error: &ImageStoreError) -> Error {
    error!(%error, "image host call failed");
    Error::service_unavailable(IMAGE_HOST_UNAVAILABLE_MESSAGE)
}
