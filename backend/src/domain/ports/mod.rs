//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, image host, geocoder, hasher) expose strongly
//! typed errors generated by `define_port_error!`; services classify them
//! into domain [`crate::domain::Error`] values. Driving ports are the use
//! cases inbound adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod campground_command;
mod campground_query;
mod campground_repository;
mod credential_hasher;
mod geocoder;
mod image_store;
mod image_upload_command;
mod login_service;
mod registration_service;
mod review_command;
mod review_repository;
mod user_repository;
mod users_query;

pub use campground_command::{
    CampgroundCommand, CreateCampgroundRequest, UpdateCampgroundRequest,
};
pub use campground_query::{CampgroundQuery, CampgroundView, ReviewView};
#[cfg(test)]
pub use campground_repository::MockCampgroundRepository;
pub use campground_repository::{CampgroundPersistenceError, CampgroundRepository};
#[cfg(test)]
pub use credential_hasher::MockCredentialHasher;
pub use credential_hasher::{CredentialHasher, CredentialHasherError};
#[cfg(test)]
pub use geocoder::MockGeocoder;
pub use geocoder::{FixtureGeocoder, Geocoder, GeocoderError};
#[cfg(test)]
pub use image_store::MockImageStore;
pub use image_store::{FixtureImageStore, IMAGE_FOLDER, ImageStore, ImageStoreError, ImageUpload};
pub use image_upload_command::ImageUploadCommand;
pub use login_service::LoginService;
pub use registration_service::RegistrationService;
pub use review_command::ReviewCommand;
#[cfg(test)]
pub use review_repository::MockReviewRepository;
pub use review_repository::{ReviewPersistenceError, ReviewRepository};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
pub use users_query::UsersQuery;
