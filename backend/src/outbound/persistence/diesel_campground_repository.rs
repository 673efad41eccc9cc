//! PostgreSQL-backed `CampgroundRepository` implementation using Diesel ORM.
//!
//! Image and review-link mutations are single `UPDATE` statements on the
//! array columns so concurrent appends never overwrite each other.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::{Array, Bool, Jsonb, Text};
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{CampgroundPersistenceError, CampgroundRepository};
use crate::domain::{
    Campground, CampgroundDetails, CampgroundId, CampgroundParts, GeoPoint, ImageRef, Price,
    ReviewId, UserId,
};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{CampgroundDetailsUpdate, CampgroundRow, NewCampgroundRow};
use super::pool::{DbPool, PoolError};
use super::schema::campgrounds;

const APPEND_IMAGES_SQL: &str = "UPDATE campgrounds SET images = images || $1 WHERE id = $2";

const REMOVE_IMAGES_SQL: &str = "UPDATE campgrounds SET images = COALESCE(( \
        SELECT jsonb_agg(elem ORDER BY ord) \
        FROM jsonb_array_elements(images) WITH ORDINALITY AS kept(elem, ord) \
        WHERE NOT (elem->>'filename' = ANY($1)) \
    ), '[]'::jsonb) WHERE id = $2";

const IMAGE_IN_USE_SQL: &str = "SELECT EXISTS ( \
        SELECT 1 FROM campgrounds \
        WHERE id <> $2 \
        AND images @> jsonb_build_array(jsonb_build_object('filename', $1::text)) \
    ) AS in_use";

#[derive(QueryableByName)]
struct ImageInUseRow {
    #[diesel(sql_type = Bool)]
    in_use: bool,
}

const APPEND_REVIEW_SQL: &str =
    "UPDATE campgrounds SET review_ids = array_append(review_ids, $1) WHERE id = $2";

const REMOVE_REVIEW_SQL: &str =
    "UPDATE campgrounds SET review_ids = array_remove(review_ids, $1) WHERE id = $2";

/// Diesel-backed implementation of the `CampgroundRepository` port.
#[derive(Clone)]
pub struct DieselCampgroundRepository {
    pool: DbPool,
}

impl DieselCampgroundRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> CampgroundPersistenceError {
    map_pool_error(error, CampgroundPersistenceError::connection)
}

fn diesel_error(error: diesel::result::Error) -> CampgroundPersistenceError {
    map_diesel_error(
        error,
        CampgroundPersistenceError::query,
        CampgroundPersistenceError::connection,
    )
}

fn images_to_json(images: &[ImageRef]) -> Result<serde_json::Value, CampgroundPersistenceError> {
    serde_json::to_value(images)
        .map_err(|err| CampgroundPersistenceError::query(format!("encode images: {err}")))
}

fn row_to_campground(row: CampgroundRow) -> Result<Campground, CampgroundPersistenceError> {
    let corrupt = |what: &str| {
        warn!(campground_id = %row.id, what, "stored campground row failed validation");
        CampgroundPersistenceError::query(format!("stored campground has invalid {what}"))
    };
    let price = Price::new(row.price).map_err(|_| corrupt("price"))?;
    let geometry = match (row.longitude, row.latitude) {
        (Some(longitude), Some(latitude)) => {
            Some(GeoPoint::new(longitude, latitude).map_err(|_| corrupt("geometry"))?)
        }
        _ => None,
    };
    let images: Vec<ImageRef> =
        serde_json::from_value(row.images).map_err(|_| corrupt("images"))?;
    Ok(Campground::from(CampgroundParts {
        id: CampgroundId::from_uuid(row.id),
        author: UserId::from_uuid(row.author_id),
        details: CampgroundDetails {
            title: row.title,
            description: row.description,
            price,
            location: row.location,
        },
        geometry,
        images,
        reviews: row.review_ids.into_iter().map(ReviewId::from_uuid).collect(),
    }))
}

#[async_trait]
impl CampgroundRepository for DieselCampgroundRepository {
    async fn insert(&self, campground: &Campground) -> Result<(), CampgroundPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let details = campground.details();
        let row = NewCampgroundRow {
            id: *campground.id().as_uuid(),
            author_id: *campground.author().as_uuid(),
            title: &details.title,
            description: &details.description,
            price: details.price.amount(),
            location: &details.location,
            longitude: campground.geometry().map(GeoPoint::longitude),
            latitude: campground.geometry().map(GeoPoint::latitude),
            images: images_to_json(campground.images())?,
            review_ids: campground.reviews().iter().map(|id| *id.as_uuid()).collect(),
        };
        diesel::insert_into(campgrounds::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn find_by_id(
        &self,
        id: &CampgroundId,
    ) -> Result<Option<Campground>, CampgroundPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<CampgroundRow> = campgrounds::table
            .filter(campgrounds::id.eq(id.as_uuid()))
            .select(CampgroundRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_campground).transpose()
    }

    async fn list(&self) -> Result<Vec<Campground>, CampgroundPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<CampgroundRow> = campgrounds::table
            .select(CampgroundRow::as_select())
            .order_by((campgrounds::created_at.asc(), campgrounds::id.asc()))
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(row_to_campground).collect()
    }

    async fn update_details(
        &self,
        id: &CampgroundId,
        details: &CampgroundDetails,
        geometry: Option<GeoPoint>,
    ) -> Result<bool, CampgroundPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let changeset = CampgroundDetailsUpdate {
            title: &details.title,
            description: &details.description,
            price: details.price.amount(),
            location: &details.location,
            longitude: geometry.map(|point| point.longitude()),
            latitude: geometry.map(|point| point.latitude()),
        };
        let updated = diesel::update(campgrounds::table.filter(campgrounds::id.eq(id.as_uuid())))
            .set(&changeset)
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(updated > 0)
    }

    async fn append_images(
        &self,
        id: &CampgroundId,
        images: &[ImageRef],
    ) -> Result<bool, CampgroundPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let updated = diesel::sql_query(APPEND_IMAGES_SQL)
            .bind::<Jsonb, _>(images_to_json(images)?)
            .bind::<diesel::sql_types::Uuid, _>(*id.as_uuid())
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(updated > 0)
    }

    async fn remove_images(
        &self,
        id: &CampgroundId,
        filenames: &[String],
    ) -> Result<bool, CampgroundPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let updated = diesel::sql_query(REMOVE_IMAGES_SQL)
            .bind::<Array<Text>, _>(filenames.to_vec())
            .bind::<diesel::sql_types::Uuid, _>(*id.as_uuid())
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(updated > 0)
    }

    async fn image_in_use_elsewhere(
        &self,
        filename: &str,
        except: &CampgroundId,
    ) -> Result<bool, CampgroundPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: ImageInUseRow = diesel::sql_query(IMAGE_IN_USE_SQL)
            .bind::<Text, _>(filename)
            .bind::<diesel::sql_types::Uuid, _>(*except.as_uuid())
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(row.in_use)
    }

    async fn append_review(
        &self,
        id: &CampgroundId,
        review: &ReviewId,
    ) -> Result<bool, CampgroundPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let updated = diesel::sql_query(APPEND_REVIEW_SQL)
            .bind::<diesel::sql_types::Uuid, _>(*review.as_uuid())
            .bind::<diesel::sql_types::Uuid, _>(*id.as_uuid())
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(updated > 0)
    }

    async fn remove_review(
        &self,
        id: &CampgroundId,
        review: &ReviewId,
    ) -> Result<bool, CampgroundPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let updated = diesel::sql_query(REMOVE_REVIEW_SQL)
            .bind::<diesel::sql_types::Uuid, _>(*review.as_uuid())
            .bind::<diesel::sql_types::Uuid, _>(*id.as_uuid())
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: &CampgroundId) -> Result<bool, CampgroundPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let deleted = diesel::delete(campgrounds::table.filter(campgrounds::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(deleted > 0)
    }

    async fn delete_all(&self) -> Result<u64, CampgroundPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let deleted = diesel::delete(campgrounds::table)
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(u64::try_from(deleted).unwrap_or(u64::MAX))
    }
}
