//! Test helpers for inbound HTTP components.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use serde_json::json;
use std::sync::Arc;

use super::session_config::{SESSION_COOKIE_NAME, SessionSettings};
use super::state::HttpState;
use super::configure_api;
use crate::domain::ports::{
    CredentialHasher, CredentialHasherError, FixtureGeocoder, FixtureImageStore, ImageStore,
};
use crate::domain::{
    CampgroundService, CredentialHash, IdentityService, ImageUploadService, ReviewService,
};
use crate::outbound::memory::{
    InMemoryCampgroundRepository, InMemoryReviewRepository, InMemoryUserRepository,
};

/// Session middleware with a fresh key and the `Secure` flag off so plain
/// HTTP test requests carry the cookie.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionSettings {
        key: Key::generate(),
        cookie_secure: false,
        same_site: SameSite::Lax,
    }
    .middleware()
}

/// Session cookie set by `response`, if any.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(Cookie::into_owned)
}

/// Reversible stand-in for the Argon2 hasher so handler tests stay fast.
#[derive(Debug, Default)]
pub struct PlainTextHasher;

impl CredentialHasher for PlainTextHasher {
    fn hash(&self, password: &str) -> Result<CredentialHash, CredentialHasherError> {
        CredentialHash::new(format!("plain${password}"))
            .map_err(|err| CredentialHasherError::hash(err.to_string()))
    }

    fn verify(&self, password: &str, hash: &CredentialHash) -> Result<bool, CredentialHasherError> {
        hash.as_str()
            .strip_prefix("plain$")
            .map(|stored| stored == password)
            .ok_or_else(|| CredentialHasherError::malformed_hash("missing plain$ prefix"))
    }

    fn verify_dummy(&self, _password: &str) {}
}

/// Handler state over in-memory stores and fixture collaborators.
pub fn memory_state() -> HttpState {
    memory_state_with_images(Arc::new(FixtureImageStore))
}

/// As [`memory_state`], with a caller-supplied image host.
pub fn memory_state_with_images(images: Arc<dyn ImageStore>) -> HttpState {
    let users = Arc::new(InMemoryUserRepository::default());
    let campgrounds = Arc::new(InMemoryCampgroundRepository::default());
    let reviews = Arc::new(InMemoryReviewRepository::default());

    let identity = Arc::new(IdentityService::new(users.clone(), Arc::new(PlainTextHasher)));
    let campground_service = Arc::new(CampgroundService::new(
        campgrounds.clone(),
        reviews.clone(),
        users,
        Arc::new(FixtureGeocoder),
        images.clone(),
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

/// Full `/api/v1` surface over `state`, behind a fresh session middleware.
///
/// Initialise it once per test so every request shares the session key.
pub fn api_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .service(web::scope("/api/v1").configure(configure_api))
}

/// Register `username` with password `pw` and return the session cookie.
pub async fn register_user<S>(app: &S, username: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/register")
        .set_json(json!({
            "email": format!("{username}@x.com"),
            "username": username,
            "password": "pw",
        }))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert_eq!(response.status(), StatusCode::CREATED, "register {username}");
    session_cookie(&response).expect("register sets a session cookie")
}

/// Upload `file_name` as the session's user and return the `{url, filename}`
/// pair campground bodies carry.
pub async fn upload_photo<S>(app: &S, cookie: &Cookie<'static>, file_name: &str) -> serde_json::Value
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = actix_test::TestRequest::post()
        .uri(&format!("/api/v1/uploads?fileName={file_name}"))
        .cookie(cookie.clone())
        .set_payload(vec![0xff_u8, 0xd8, 0xff])
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert_eq!(response.status(), StatusCode::CREATED, "upload {file_name}");
    let body: serde_json::Value = actix_test::read_body_json(response).await;
    json!({ "url": body["url"], "filename": body["filename"] })
}
