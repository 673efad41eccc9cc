//! OpenAPI documentation for the JSON API.
//!
//! Domain types stay free of utoipa; the document references the wrappers in
//! [`crate::inbound::http::schemas`] plus the request and response DTOs that
//! live next to their handlers. Swagger UI serves it in debug builds and
//! `openapi-dump` writes it out for client generation.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::campgrounds::{
    CampgroundDetailResponse, CampgroundFields, CampgroundResponse, CreateCampgroundBody,
    GeometryResponse, ImageBody, ImageResponse, PopulatedReviewResponse, UpdateCampgroundBody,
};
use crate::inbound::http::health::ProbeStatus;
use crate::inbound::http::reviews::{ReviewBody, ReviewResponse};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::session::{FlashKind, FlashMessage};
use crate::inbound::http::session_config::SESSION_COOKIE_NAME;
use crate::inbound::http::users::{LoginRequest, RedirectResponse, RegisterRequest, UserResponse};

/// Adds the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                SESSION_COOKIE_NAME,
                "Encrypted session cookie issued by POST /api/v1/register or /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "YelpCamp API",
        description = "Campgrounds, reviews and accounts behind a cookie session."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::current_user,
        crate::inbound::http::campgrounds::list_campgrounds,
        crate::inbound::http::campgrounds::create_campground,
        crate::inbound::http::campgrounds::show_campground,
        crate::inbound::http::campgrounds::update_campground,
        crate::inbound::http::campgrounds::delete_campground,
        crate::inbound::http::reviews::create_review,
        crate::inbound::http::reviews::delete_review,
        crate::inbound::http::uploads::upload_image,
        crate::inbound::http::flash::take_flash,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        RegisterRequest,
        LoginRequest,
        UserResponse,
        RedirectResponse,
        CampgroundFields,
        CreateCampgroundBody,
        UpdateCampgroundBody,
        ImageBody,
        ImageResponse,
        GeometryResponse,
        CampgroundResponse,
        CampgroundDetailResponse,
        PopulatedReviewResponse,
        ReviewBody,
        ReviewResponse,
        FlashKind,
        FlashMessage,
        ProbeStatus,
    )),
    tags(
        (name = "users", description = "Registration, login and the current account"),
        (name = "campgrounds", description = "Campground listings"),
        (name = "reviews", description = "Reviews attached to a campground"),
        (name = "uploads", description = "Image hosting"),
        (name = "session", description = "One-shot flash messages"),
        (name = "health", description = "Orchestration probes")
    )
)]
pub struct ApiDoc;
