//! Builders for the HTTP state and its outbound collaborators.

use std::sync::Arc;

use tracing::{info, warn};
use url::Url;
use zeroize::Zeroizing;

use yelpcamp::domain::ports::{
    CampgroundRepository, CredentialHasher, FixtureGeocoder, FixtureImageStore, Geocoder,
    ImageStore, ReviewRepository, UserRepository,
};
use yelpcamp::domain::{CampgroundService, IdentityService, ImageUploadService, ReviewService};
use yelpcamp::inbound::http::state::HttpState;
use yelpcamp::outbound::argon2_hasher::Argon2CredentialHasher;
use yelpcamp::outbound::cloudinary::{
    CloudinaryCredentials, CloudinaryImageStore, DEFAULT_CLOUDINARY_ENDPOINT,
};
use yelpcamp::outbound::mapbox::{DEFAULT_MAPBOX_ENDPOINT, MapboxGeocoder};
use yelpcamp::outbound::memory::{
    InMemoryCampgroundRepository, InMemoryReviewRepository, InMemoryUserRepository,
};
use yelpcamp::outbound::persistence::{
    DieselCampgroundRepository, DieselReviewRepository, DieselUserRepository,
};

use super::config::{AppSettings, ServerConfig};

/// Collaborators shared by every store flavour.
struct Collaborators {
    hasher: Arc<dyn CredentialHasher>,
    geocoder: Arc<dyn Geocoder>,
    images: Arc<dyn ImageStore>,
}

fn build_geocoder(settings: &AppSettings) -> std::io::Result<Arc<dyn Geocoder>> {
    let Some(token) = settings.mapbox_token.as_deref() else {
        warn!("no Mapbox token configured; campgrounds will have no geometry");
        return Ok(Arc::new(FixtureGeocoder));
    };
    let endpoint = Url::parse(DEFAULT_MAPBOX_ENDPOINT).map_err(std::io::Error::other)?;
    let geocoder = MapboxGeocoder::new(endpoint, token, settings.outbound_timeout())
        .map_err(std::io::Error::other)?;
    Ok(Arc::new(geocoder))
}

fn build_image_store(settings: &AppSettings) -> std::io::Result<Arc<dyn ImageStore>> {
    let Some((cloud_name, api_key, api_secret)) = settings.cloudinary() else {
        warn!("Cloudinary credentials incomplete; using the fixture image store");
        return Ok(Arc::new(FixtureImageStore));
    };
    let endpoint = Url::parse(DEFAULT_CLOUDINARY_ENDPOINT).map_err(std::io::Error::other)?;
    let signature_algorithm = settings
        .cloudinary_signature_algorithm()
        .map_err(std::io::Error::other)?;
    info!(%signature_algorithm, "signing Cloudinary requests");
    let store = CloudinaryImageStore::new(
        endpoint,
        CloudinaryCredentials {
            cloud_name: cloud_name.to_owned(),
            api_key: api_key.to_owned(),
            api_secret: Zeroizing::new(api_secret.to_owned()),
            signature_algorithm,
        },
        settings.outbound_timeout(),
        Arc::new(mockable::DefaultClock),
    )
    .map_err(std::io::Error::other)?;
    Ok(Arc::new(store))
}

fn assemble<C, R, U>(
    campgrounds: Arc<C>,
    reviews: Arc<R>,
    users: Arc<U>,
    collaborators: Collaborators,
) -> HttpState
where
    C: CampgroundRepository + 'static,
    R: ReviewRepository + 'static,
    U: UserRepository + 'static,
{
    let Collaborators {
        hasher,
        geocoder,
        images,
    } = collaborators;
    let identity = Arc::new(IdentityService::new(Arc::clone(&users), hasher));
    let campground_service = Arc::new(CampgroundService::new(
        Arc::clone(&campgrounds),
        Arc::clone(&reviews),
        users,
        geocoder,
        Arc::clone(&images),
    ));
    HttpState {
        registration: identity.clone(),
        login: identity.clone(),
        users: identity,
        campgrounds: campground_service.clone(),
        campgrounds_query: campground_service,
        reviews: Arc::new(ReviewService::new(campgrounds, reviews)),
        uploads: Arc::new(ImageUploadService::new(images)),
    }
}

/// Wire the driving ports over PostgreSQL when a pool is configured,
/// otherwise over in-memory stores.
///
/// # Errors
///
/// Fails when an outbound HTTP client or the password hasher cannot be
/// built.
pub(crate) fn build_http_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    let hasher = Argon2CredentialHasher::new().map_err(std::io::Error::other)?;
    let collaborators = Collaborators {
        hasher: Arc::new(hasher),
        geocoder: build_geocoder(&config.settings)?,
        images: build_image_store(&config.settings)?,
    };
    let state = match &config.db_pool {
        Some(pool) => assemble(
            Arc::new(DieselCampgroundRepository::new(pool.clone())),
            Arc::new(DieselReviewRepository::new(pool.clone())),
            Arc::new(DieselUserRepository::new(pool.clone())),
            collaborators,
        ),
        None => {
            info!("no database configured; records live in memory until shutdown");
            assemble(
                Arc::new(InMemoryCampgroundRepository::default()),
                Arc::new(InMemoryReviewRepository::default()),
                Arc::new(InMemoryUserRepository::default()),
                collaborators,
            )
        }
    };
    Ok(state)
}
