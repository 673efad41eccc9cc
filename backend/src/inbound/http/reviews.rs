//! Review handlers nested under a campground.
//!
//! ```text
//! POST   /api/v1/campgrounds/{id}/reviews             {"rating":5,"body":"great"}
//! DELETE /api/v1/campgrounds/{id}/reviews/{reviewId}
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, post, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{CampgroundId, Review, ReviewDraft, ReviewId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::campgrounds::campground_path;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::RedirectResponse;
use crate::inbound::http::validation::{CAMPGROUND_ID, REVIEW_ID, parse_record_id};

/// Body for `POST /api/v1/campgrounds/{id}/reviews`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewBody {
    /// Whole number from 1 to 5; numeric strings are accepted.
    #[schema(value_type = Option<u8>, example = 5)]
    pub rating: Option<Value>,
    #[schema(example = "Great spot, clean toilets.")]
    pub body: Option<String>,
}

impl From<ReviewBody> for ReviewDraft {
    fn from(value: ReviewBody) -> Self {
        Self {
            rating: value.rating,
            body: value.body,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub id: String,
    #[schema(minimum = 1, maximum = 5)]
    pub rating: u8,
    pub body: String,
    /// Author's user id.
    pub author: String,
}

impl From<&Review> for ReviewResponse {
    fn from(review: &Review) -> Self {
        Self {
            id: review.id().to_string(),
            rating: review.rating().stars(),
            body: review.body().to_owned(),
            author: review.author().to_string(),
        }
    }
}

/// Review a campground as the session user.
#[utoipa::path(
    post,
    path = "/api/v1/campgrounds/{id}/reviews",
    params(("id" = String, Path, description = "Campground id")),
    request_body = ReviewBody,
    responses(
        (status = 201, description = "Created", body = ReviewResponse),
        (status = 400, description = "Invalid rating, body or id", body = ErrorSchema),
        (status = 401, description = "No session", body = ErrorSchema),
        (status = 404, description = "Unknown campground", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "createReview"
)]
#[post("/campgrounds/{id}/reviews")]
pub async fn create_review(
    state: web::Data<HttpState>,
    session: SessionContext,
    request: HttpRequest,
    path: web::Path<String>,
    payload: web::Json<ReviewBody>,
) -> ApiResult<HttpResponse> {
    let actor = session.actor_or_remember(&request)?;
    let campground_id: CampgroundId = parse_record_id(&path, CAMPGROUND_ID)?;
    let review = state
        .reviews
        .create(actor.as_ref(), &campground_id, payload.into_inner().into())
        .await?;
    session.flash_success("Created new review!")?;
    Ok(HttpResponse::Created().json(ReviewResponse::from(&review)))
}

/// Delete a review the session user wrote.
#[utoipa::path(
    delete,
    path = "/api/v1/campgrounds/{id}/reviews/{reviewId}",
    params(
        ("id" = String, Path, description = "Campground id"),
        ("reviewId" = String, Path, description = "Review id")
    ),
    responses(
        (status = 200, description = "Deleted", body = RedirectResponse),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 401, description = "No session", body = ErrorSchema),
        (status = 403, description = "Not the author", body = ErrorSchema),
        (status = 404, description = "Unknown review", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "deleteReview"
)]
#[delete("/campgrounds/{id}/reviews/{reviewId}")]
pub async fn delete_review(
    state: web::Data<HttpState>,
    session: SessionContext,
    request: HttpRequest,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<RedirectResponse>> {
    let actor = session.actor_or_remember(&request)?;
    let (raw_campground, raw_review) = path.into_inner();
    let campground_id: CampgroundId = parse_record_id(&raw_campground, CAMPGROUND_ID)?;
    let review_id: ReviewId = parse_record_id(&raw_review, REVIEW_ID)?;
    state
        .reviews
        .delete(actor.as_ref(), &campground_id, &review_id)
        .await?;
    session.flash_success("Successfully deleted review")?;
    Ok(web::Json(RedirectResponse {
        redirect_to: campground_path(&campground_id),
    }))
}
