//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    CampgroundCommand, CampgroundQuery, ImageUploadCommand, LoginService, RegistrationService,
    ReviewCommand, UsersQuery,
};

/// Dependency bundle for HTTP handlers.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use yelpcamp::domain::ports::{FixtureGeocoder, FixtureImageStore};
/// use yelpcamp::domain::{CampgroundService, IdentityService, ImageUploadService, ReviewService};
/// use yelpcamp::inbound::http::state::HttpState;
/// use yelpcamp::outbound::argon2_hasher::Argon2CredentialHasher;
/// use yelpcamp::outbound::memory::{
///     InMemoryCampgroundRepository, InMemoryReviewRepository, InMemoryUserRepository,
/// };
///
/// let users = Arc::new(InMemoryUserRepository::default());
/// let campgrounds = Arc::new(InMemoryCampgroundRepository::default());
/// let reviews = Arc::new(InMemoryReviewRepository::default());
/// let images = Arc::new(FixtureImageStore);
/// let hasher = Arc::new(Argon2CredentialHasher::new().expect("hasher"));
///
/// let identity = Arc::new(IdentityService::new(users.clone(), hasher));
/// let campground_service = Arc::new(CampgroundService::new(
///     campgrounds.clone(),
///     reviews.clone(),
///     users,
///     Arc::new(FixtureGeocoder),
///     images.clone(),
/// ));
/// let state = HttpState {
///     registration: identity.clone(),
///     login: identity.clone(),
///     users: identity,
///     campgrounds: campground_service.clone(),
///     campgrounds_query: campground_service,
///     reviews: Arc::new(ReviewService::new(campgrounds, reviews)),
///     uploads: Arc::new(ImageUploadService::new(images)),
/// };
/// let _login = state.login.clone();
/// ```
#[derive(Clone)]
pub struct HttpState {
    pub registration: Arc<dyn RegistrationService>,
    pub login: Arc<dyn LoginService>,
    pub users: Arc<dyn UsersQuery>,
    pub campgrounds: Arc<dyn CampgroundCommand>,
    pub campgrounds_query: Arc<dyn CampgroundQuery>,
    pub reviews: Arc<dyn ReviewCommand>,
    pub uploads: Arc<dyn ImageUploadCommand>,
}
