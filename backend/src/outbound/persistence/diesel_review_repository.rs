//! PostgreSQL-backed `ReviewRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;
use uuid::Uuid;

use crate::domain::ports::{ReviewPersistenceError, ReviewRepository};
use crate::domain::{Rating, Review, ReviewContent, ReviewId, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewReviewRow, ReviewRow};
use super::pool::{DbPool, PoolError};
use super::schema::reviews;

/// Diesel-backed implementation of the `ReviewRepository` port.
#[derive(Clone)]
pub struct DieselReviewRepository {
    pool: DbPool,
}

impl DieselReviewRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> ReviewPersistenceError {
    map_pool_error(error, ReviewPersistenceError::connection)
}

fn diesel_error(error: diesel::result::Error) -> ReviewPersistenceError {
    map_diesel_error(
        error,
        ReviewPersistenceError::query,
        ReviewPersistenceError::connection,
    )
}

fn row_to_review(row: ReviewRow) -> Result<Review, ReviewPersistenceError> {
    let rating = Rating::new(i64::from(row.rating)).map_err(|_| {
        warn!(review_id = %row.id, rating = row.rating, "stored review has invalid rating");
        ReviewPersistenceError::query("stored review has invalid rating")
    })?;
    Ok(Review::restore(
        ReviewId::from_uuid(row.id),
        UserId::from_uuid(row.author_id),
        ReviewContent {
            rating,
            body: row.body,
        },
    ))
}

/// Order `reviews` to follow `ids`, dropping ids with no stored review.
fn in_requested_order(ids: &[ReviewId], mut reviews: Vec<Review>) -> Vec<Review> {
    let mut ordered = Vec::with_capacity(reviews.len());
    for id in ids {
        if let Some(position) = reviews.iter().position(|review| review.id() == id) {
            ordered.push(reviews.swap_remove(position));
        }
    }
    ordered
}

fn to_uuids(ids: &[ReviewId]) -> Vec<Uuid> {
    ids.iter().map(|id| *id.as_uuid()).collect()
}

#[async_trait]
impl ReviewRepository for DieselReviewRepository {
    async fn insert(&self, review: &Review) -> Result<(), ReviewPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = NewReviewRow {
            id: *review.id().as_uuid(),
            author_id: *review.author().as_uuid(),
            rating: i16::from(review.rating().stars()),
            body: review.body(),
        };
        diesel::insert_into(reviews::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, ReviewPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<ReviewRow> = reviews::table
            .filter(reviews::id.eq(id.as_uuid()))
            .select(ReviewRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_review).transpose()
    }

    async fn find_many(&self, ids: &[ReviewId]) -> Result<Vec<Review>, ReviewPersistenceError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<ReviewRow> = reviews::table
            .filter(reviews::id.eq_any(to_uuids(ids)))
            .select(ReviewRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        let found = rows
            .into_iter()
            .map(row_to_review)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(in_requested_order(ids, found))
    }

    async fn delete(&self, id: &ReviewId) -> Result<bool, ReviewPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let deleted = diesel::delete(reviews::table.filter(reviews::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(deleted > 0)
    }

    async fn delete_many(&self, ids: &[ReviewId]) -> Result<u64, ReviewPersistenceError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let deleted = diesel::delete(reviews::table.filter(reviews::id.eq_any(to_uuids(ids))))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(u64::try_from(deleted).unwrap_or(u64::MAX))
    }
}
