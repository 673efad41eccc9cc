//! Campground handlers.
//!
//! ```text
//! GET    /api/v1/campgrounds
//! POST   /api/v1/campgrounds        {"title":..,"price":15,..,"images":[..]}
//! GET    /api/v1/campgrounds/{id}
//! PUT    /api/v1/campgrounds/{id}   {..,"images":[..],"deleteImages":["YelpCamp/a"]}
//! DELETE /api/v1/campgrounds/{id}
//! ```
//!
//! Images are uploaded separately through `/api/v1/uploads`; bodies here carry
//! the returned references.

use actix_web::{HttpRequest, HttpResponse, delete, get, http::header, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::ports::{
    CampgroundView, CreateCampgroundRequest, ReviewView, UpdateCampgroundRequest,
};
use crate::domain::{Campground, CampgroundDraft, CampgroundId, GeoPoint, ImageRef};
use crate::inbound::http::ApiResult;
use crate::inbound::http::reviews::ReviewResponse;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::{DEFAULT_REDIRECT, RedirectResponse, UserResponse};
use crate::inbound::http::validation::{CAMPGROUND_ID, parse_record_id};

/// Hosted image reference as sent by clients.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageBody {
    #[schema(example = "https://res.cloudinary.com/demo/image/upload/v1/YelpCamp/a.jpg")]
    pub url: String,
    #[schema(example = "YelpCamp/a")]
    pub filename: String,
}

impl From<ImageBody> for ImageRef {
    fn from(value: ImageBody) -> Self {
        ImageRef::new(value.url, value.filename)
    }
}

/// Campground fields shared by create and update.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CampgroundFields {
    #[schema(example = "Pine Ridge")]
    pub title: Option<String>,
    #[schema(example = "Quiet sites under tall pines.")]
    pub description: Option<String>,
    /// Number or numeric string.
    #[schema(value_type = Option<f64>, example = 15)]
    pub price: Option<Value>,
    #[schema(example = "Denver, CO")]
    pub location: Option<String>,
}

impl From<CampgroundFields> for CampgroundDraft {
    fn from(value: CampgroundFields) -> Self {
        Self {
            title: value.title,
            description: value.description,
            price: value.price,
            location: value.location,
        }
    }
}

/// Body for `POST /api/v1/campgrounds`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampgroundBody {
    #[serde(flatten)]
    pub fields: CampgroundFields,
    #[serde(default)]
    pub images: Vec<ImageBody>,
}

/// Body for `PUT /api/v1/campgrounds/{id}`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCampgroundBody {
    #[serde(flatten)]
    pub fields: CampgroundFields,
    /// References appended to the existing images.
    #[serde(default)]
    pub images: Vec<ImageBody>,
    /// Filenames to remove from the image host and the record.
    #[serde(default)]
    pub delete_images: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    pub url: String,
    pub filename: String,
    /// 200px-wide rendition.
    pub thumbnail: String,
}

impl From<&ImageRef> for ImageResponse {
    fn from(image: &ImageRef) -> Self {
        Self {
            url: image.url.clone(),
            filename: image.filename.clone(),
            thumbnail: image.thumbnail(),
        }
    }
}

/// GeoJSON point.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct GeometryResponse {
    #[serde(rename = "type")]
    #[schema(example = "Point")]
    pub kind: String,
    /// `[longitude, latitude]`.
    #[schema(example = json!([-104.99, 39.74]))]
    pub coordinates: [f64; 2],
}

impl From<&GeoPoint> for GeometryResponse {
    fn from(point: &GeoPoint) -> Self {
        Self {
            kind: "Point".to_owned(),
            coordinates: [point.longitude(), point.latitude()],
        }
    }
}

/// Campground as listed on the index.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CampgroundResponse {
    pub id: String,
    /// Author's user id.
    pub author: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub location: String,
    pub geometry: Option<GeometryResponse>,
    pub images: Vec<ImageResponse>,
    /// Review ids in insertion order.
    pub reviews: Vec<String>,
}

impl From<&Campground> for CampgroundResponse {
    fn from(campground: &Campground) -> Self {
        let details = campground.details();
        Self {
            id: campground.id().to_string(),
            author: campground.author().to_string(),
            title: details.title.clone(),
            description: details.description.clone(),
            price: details.price.amount(),
            location: details.location.clone(),
            geometry: campground.geometry().map(GeometryResponse::from),
            images: campground.images().iter().map(ImageResponse::from).collect(),
            reviews: campground
                .reviews()
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

/// Review with its author's profile, if that account still resolves.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PopulatedReviewResponse {
    pub review: ReviewResponse,
    pub author: Option<UserResponse>,
}

impl From<ReviewView> for PopulatedReviewResponse {
    fn from(view: ReviewView) -> Self {
        Self {
            review: ReviewResponse::from(&view.review),
            author: view.author.map(UserResponse::from),
        }
    }
}

/// Campground show page data.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CampgroundDetailResponse {
    pub campground: CampgroundResponse,
    pub author: Option<UserResponse>,
    pub reviews: Vec<PopulatedReviewResponse>,
}

impl From<CampgroundView> for CampgroundDetailResponse {
    fn from(view: CampgroundView) -> Self {
        Self {
            campground: CampgroundResponse::from(&view.campground),
            author: view.author.map(UserResponse::from),
            reviews: view
                .reviews
                .into_iter()
                .map(PopulatedReviewResponse::from)
                .collect(),
        }
    }
}

pub(crate) fn campground_path(id: &CampgroundId) -> String {
    format!("{DEFAULT_REDIRECT}/{id}")
}

/// List every campground.
#[utoipa::path(
    get,
    path = "/api/v1/campgrounds",
    responses(
        (status = 200, description = "All campgrounds", body = [CampgroundResponse]),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["campgrounds"],
    operation_id = "listCampgrounds",
    security([])
)]
#[get("/campgrounds")]
pub async fn list_campgrounds(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<CampgroundResponse>>> {
    let campgrounds = state.campgrounds_query.list().await?;
    Ok(web::Json(
        campgrounds.iter().map(CampgroundResponse::from).collect(),
    ))
}

/// Create a campground authored by the session user.
#[utoipa::path(
    post,
    path = "/api/v1/campgrounds",
    request_body = CreateCampgroundBody,
    responses(
        (status = 201, description = "Created", body = CampgroundResponse,
            headers(("Location" = String, description = "Campground path"))),
        (status = 400, description = "Invalid fields", body = ErrorSchema),
        (status = 401, description = "No session", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["campgrounds"],
    operation_id = "createCampground"
)]
#[post("/campgrounds")]
pub async fn create_campground(
    state: web::Data<HttpState>,
    session: SessionContext,
    request: HttpRequest,
    payload: web::Json<CreateCampgroundBody>,
) -> ApiResult<HttpResponse> {
    let actor = session.actor_or_remember(&request)?;
    let CreateCampgroundBody { fields, images } = payload.into_inner();
    let campground = state
        .campgrounds
        .create(
            actor.as_ref(),
            CreateCampgroundRequest {
                draft: fields.into(),
                images: images.into_iter().map(ImageRef::from).collect(),
            },
        )
        .await?;
    session.flash_success("Successfully made a new campground!")?;
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, campground_path(campground.id())))
        .json(CampgroundResponse::from(&campground)))
}

/// Show one campground with its author and reviews.
#[utoipa::path(
    get,
    path = "/api/v1/campgrounds/{id}",
    params(("id" = String, Path, description = "Campground id")),
    responses(
        (status = 200, description = "Campground", body = CampgroundDetailResponse),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 404, description = "Unknown campground", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["campgrounds"],
    operation_id = "showCampground",
    security([])
)]
#[get("/campgrounds/{id}")]
pub async fn show_campground(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<CampgroundDetailResponse>> {
    let id: CampgroundId = parse_record_id(&path, CAMPGROUND_ID)?;
    let view = state.campgrounds_query.show(&id).await?;
    Ok(web::Json(view.into()))
}

/// Edit a campground the session user authored.
///
/// Requested image deletions that the host does not confirm stay on the
/// record and produce `503` with `details.failedImages` after the rest of the
/// update is saved.
#[utoipa::path(
    put,
    path = "/api/v1/campgrounds/{id}",
    params(("id" = String, Path, description = "Campground id")),
    request_body = UpdateCampgroundBody,
    responses(
        (status = 200, description = "Updated", body = CampgroundResponse),
        (status = 400, description = "Invalid fields or id", body = ErrorSchema),
        (status = 401, description = "No session", body = ErrorSchema),
        (status = 403, description = "Not the author", body = ErrorSchema),
        (status = 404, description = "Unknown campground", body = ErrorSchema),
        (status = 503, description = "Some images could not be deleted", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["campgrounds"],
    operation_id = "updateCampground"
)]
#[put("/campgrounds/{id}")]
pub async fn update_campground(
    state: web::Data<HttpState>,
    session: SessionContext,
    request: HttpRequest,
    path: web::Path<String>,
    payload: web::Json<UpdateCampgroundBody>,
) -> ApiResult<web::Json<CampgroundResponse>> {
    let actor = session.actor_or_remember(&request)?;
    let id: CampgroundId = parse_record_id(&path, CAMPGROUND_ID)?;
    let UpdateCampgroundBody {
        fields,
        images,
        delete_images,
    } = payload.into_inner();
    let campground = state
        .campgrounds
        .update(
            actor.as_ref(),
            UpdateCampgroundRequest {
                id,
                draft: fields.into(),
                new_images: images.into_iter().map(ImageRef::from).collect(),
                delete_images,
            },
        )
        .await?;
    session.flash_success("Successfully updated campground!")?;
    Ok(web::Json(CampgroundResponse::from(&campground)))
}

/// Delete a campground and every review listed on it.
#[utoipa::path(
    delete,
    path = "/api/v1/campgrounds/{id}",
    params(("id" = String, Path, description = "Campground id")),
    responses(
        (status = 200, description = "Deleted", body = RedirectResponse),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 401, description = "No session", body = ErrorSchema),
        (status = 403, description = "Not the author", body = ErrorSchema),
        (status = 404, description = "Unknown campground", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["campgrounds"],
    operation_id = "deleteCampground"
)]
#[delete("/campgrounds/{id}")]
pub async fn delete_campground(
    state: web::Data<HttpState>,
    session: SessionContext,
    request: HttpRequest,
    path: web::Path<String>,
) -> ApiResult<web::Json<RedirectResponse>> {
    let actor = session.actor_or_remember(&request)?;
    let id: CampgroundId = parse_record_id(&path, CAMPGROUND_ID)?;
    state.campgrounds.delete(actor.as_ref(), &id).await?;
    session.flash_success("Successfully deleted campground")?;
    Ok(web::Json(RedirectResponse {
        redirect_to: DEFAULT_REDIRECT.to_owned(),
    }))
}
