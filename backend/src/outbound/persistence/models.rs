//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{campgrounds, reviews, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    #[expect(dead_code, reason = "schema field kept for audit queries")]
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}

// ---------------------------------------------------------------------------
// Review models
// ---------------------------------------------------------------------------

/// Row struct for reading from the reviews table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReviewRow {
    pub id: Uuid,
    pub author_id: Uuid,
    pub rating: i16,
    pub body: String,
}

/// Insertable struct for creating new review records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = reviews)]
pub(crate) struct NewReviewRow<'a> {
    pub id: Uuid,
    pub author_id: Uuid,
    pub rating: i16,
    pub body: &'a str,
}

// ---------------------------------------------------------------------------
// Campground models
// ---------------------------------------------------------------------------

/// Row struct for reading from the campgrounds table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = campgrounds)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CampgroundRow {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub location: String,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub images: serde_json::Value,
    pub review_ids: Vec<Uuid>,
}

/// Insertable struct for creating new campground records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = campgrounds)]
pub(crate) struct NewCampgroundRow<'a> {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: &'a str,
    pub description: &'a str,
    pub price: f64,
    pub location: &'a str,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub images: serde_json::Value,
    pub review_ids: Vec<Uuid>,
}

/// Changeset for the editable scalar fields of a campground.
///
/// `treat_none_as_null` lets a failed re-geocode clear stale coordinates.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = campgrounds)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct CampgroundDetailsUpdate<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub price: f64,
    pub location: &'a str,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
}
