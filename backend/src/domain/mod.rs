//! Domain primitives, aggregates and use-case services.
//!
//! Purpose: Define strongly typed entities for users, campgrounds and
//! reviews, the ownership policy guarding their mutation, and the services
//! that orchestrate the driven ports. Types keep their invariants in private
//! fields; document serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - User / UserId: public identity; credentials stay in `UserAccount`.
//! - Campground / Review: authored content records.
//! - policy: the shared mutation guard.

pub mod auth;
mod campground;
mod campground_service;
pub mod error;
mod identity_service;
mod ids;
mod image_upload_service;
pub mod policy;
pub mod ports;
mod review;
mod review_service;
mod service_errors;
mod text_field;
pub mod trace_id;
pub mod user;

pub use self::auth::{
    LoginCredentials, LoginValidationError, Registration, RegistrationDraft,
    RegistrationValidationError, validate_registration,
};
pub use self::campground::{
    Campground, CampgroundDetails, CampgroundDraft, CampgroundField, CampgroundParts,
    CampgroundValidationError, GeoPoint, GeoPointError, ImageRef, Price, validate_campground,
};
pub use self::campground_service::CampgroundService;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::identity_service::{INVALID_LOGIN_MESSAGE, IdentityService};
pub use self::ids::{CampgroundId, RecordIdError, ReviewId};
pub use self::image_upload_service::{
    ALLOWED_IMAGE_EXTENSIONS, ImageUploadService, MAX_IMAGE_BYTES,
};
pub use self::review::{
    RATING_MAX, RATING_MIN, Rating, Review, ReviewContent, ReviewDraft, ReviewValidationError,
    validate_review,
};
pub use self::review_service::ReviewService;
pub use self::trace_id::TraceId;
pub use self::user::{
    CredentialHash, Email, USERNAME_MAX, User, UserAccount, UserId, UserValidationError, Username,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use yelpcamp::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
