//! One-shot notices queued by earlier requests.

use actix_web::{get, web};

use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::{FlashMessage, SessionContext};

/// Drain pending flash messages. A second call returns an empty list.
#[utoipa::path(
    get,
    path = "/api/v1/flash",
    responses(
        (status = 200, description = "Pending messages, oldest first", body = [FlashMessage]),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["session"],
    operation_id = "takeFlash",
    security([])
)]
#[get("/flash")]
pub async fn take_flash(session: SessionContext) -> ApiResult<web::Json<Vec<FlashMessage>>> {
    Ok(web::Json(session.take_flash()?))
}
