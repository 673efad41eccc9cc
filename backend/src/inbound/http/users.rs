//! Account and session handlers.
//!
//! ```text
//! POST /api/v1/register {"email":"a@x.com","username":"a","password":"pw"}
//! POST /api/v1/login    {"username":"a","password":"pw"}
//! POST /api/v1/logout
//! GET  /api/v1/users/me
//! ```

use actix_web::{HttpRequest, HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::domain::{
    Error, ErrorCode, INVALID_LOGIN_MESSAGE, LoginCredentials, LoginValidationError,
    RegistrationDraft, User,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::{FlashKind, SessionContext};
use crate::inbound::http::state::HttpState;

/// Where clients land after login or logout when nothing else was requested.
pub const DEFAULT_REDIRECT: &str = "/campgrounds";

/// Registration body for `POST /api/v1/register`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Login body for `POST /api/v1/login`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        let password = Zeroizing::new(value.password);
        Self::try_from_parts(&value.username, &password)
    }
}

/// Public profile returned to clients.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    #[schema(example = "a")]
    pub username: String,
    #[schema(example = "a@x.com")]
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id().to_string(),
            username: user.username().to_string(),
            email: user.email().to_string(),
        }
    }
}

/// Client-side destination after a session change.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RedirectResponse {
    pub redirect_to: String,
}

/// Create an account and log it in.
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created and logged in", body = UserResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid or already registered", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest {
        email,
        username,
        password,
    } = payload.into_inner();
    let draft = RegistrationDraft {
        email,
        username,
        password: Zeroizing::new(password),
    };
    let user = state.registration.register(draft).await?;
    session.persist_user(user.id())?;
    session.flash_success("Welcome to Yelp Camp!")?;
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// Authenticate and establish a session.
///
/// Returns the path stored when the client was last turned away for lack of
/// a session, or the campground index.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = RedirectResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<RedirectResponse>> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(Error::from)?;
    let user_id = match state.login.authenticate(&credentials).await {
        Ok(id) => id,
        Err(error) => {
            if error.code() == ErrorCode::Unauthorized {
                session.flash(FlashKind::Error, INVALID_LOGIN_MESSAGE)?;
            }
            return Err(error);
        }
    };
    let redirect_to = session
        .take_return_to()?
        .unwrap_or_else(|| DEFAULT_REDIRECT.to_owned());
    session.persist_user(&user_id)?;
    session.flash_success("welcome back!")?;
    Ok(web::Json(RedirectResponse { redirect_to }))
}

/// End the session's identity. Anonymous callers succeed too.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses(
        (status = 200, description = "Logged out", body = RedirectResponse),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> ApiResult<web::Json<RedirectResponse>> {
    session.clear_user();
    session.flash_success("Goodbye!")?;
    Ok(web::Json(RedirectResponse {
        redirect_to: DEFAULT_REDIRECT.to_owned(),
    }))
}

/// Profile of the logged-in user.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "No session", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    request: HttpRequest,
) -> ApiResult<web::Json<UserResponse>> {
    let actor = session.actor_or_remember(&request)?;
    let user = state.users.current_user(actor.as_ref()).await?;
    Ok(web::Json(user.into()))
}
