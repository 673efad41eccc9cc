//! HTTP inbound adapter exposing the JSON API.

pub mod campgrounds;
pub mod error;
pub mod flash;
pub mod health;
pub mod reviews;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod uploads;
pub mod users;
pub mod validation;

use actix_web::web;

use crate::domain::MAX_IMAGE_BYTES;

pub use error::ApiResult;

/// Register every `/api/v1` handler on `cfg`.
///
/// Mount inside `web::scope("/api/v1")`; paths below are relative to it.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PayloadConfig::new(MAX_IMAGE_BYTES))
        .service(users::register)
        .service(users::login)
        .service(users::logout)
        .service(users::current_user)
        .service(campgrounds::list_campgrounds)
        .service(campgrounds::create_campground)
        .service(campgrounds::show_campground)
        .service(campgrounds::update_campground)
        .service(campgrounds::delete_campground)
        .service(reviews::create_review)
        .service(reviews::delete_review)
        .service(uploads::upload_image)
        .service(flash::take_flash);
}
