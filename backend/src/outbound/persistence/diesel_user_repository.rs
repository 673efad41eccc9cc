//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Username and email uniqueness is enforced by the `users_username_key` and
//! `users_email_key` constraints; violations surface as the dedicated
//! duplicate variants of [`UserPersistenceError`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;
use uuid::Uuid;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{CredentialHash, Email, User, UserAccount, UserId, Username};

use super::error_mapping::{map_diesel_error, map_pool_error, unique_violation};
use super::models::{NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: super::pool::PoolError) -> UserPersistenceError {
    map_pool_error(error, UserPersistenceError::connection)
}

fn diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

fn insert_error(error: diesel::result::Error, account: &UserAccount) -> UserPersistenceError {
    match unique_violation(&error) {
        Some("users_email_key") => {
            UserPersistenceError::duplicate_email(account.profile.email().as_ref())
        }
        Some(_) => UserPersistenceError::duplicate_username(account.profile.username().as_ref()),
        None => diesel_error(error),
    }
}

fn row_to_user(row: &UserRow) -> Result<User, UserPersistenceError> {
    let username = Username::new(&row.username);
    let email = Email::new(&row.email);
    match (username, email) {
        (Ok(username), Ok(email)) => Ok(User::new(UserId::from_uuid(row.id), username, email)),
        (Err(error), _) | (_, Err(error)) => {
            warn!(user_id = %row.id, %error, "stored user row failed validation");
            Err(UserPersistenceError::query("stored user row is invalid"))
        }
    }
}

fn row_to_account(row: &UserRow) -> Result<UserAccount, UserPersistenceError> {
    let profile = row_to_user(row)?;
    let credential = CredentialHash::new(row.password_hash.as_str())
        .map_err(|_| UserPersistenceError::query("stored credential hash is empty"))?;
    Ok(UserAccount {
        profile,
        credential,
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, account: &UserAccount) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = NewUserRow {
            id: *account.profile.id().as_uuid(),
            username: account.profile.username().as_ref(),
            email: account.profile.email().as_ref(),
            password_hash: account.credential.as_str(),
        };
        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|error| insert_error(error, account))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.as_ref().map(row_to_user).transpose()
    }

    async fn find_account_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::username.eq(username.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.as_ref().map(row_to_account).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.as_ref().map(row_to_user).transpose()
    }

    async fn find_many(&self, ids: &[UserId]) -> Result<Vec<User>, UserPersistenceError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let uuids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let rows: Vec<UserRow> = users::table
            .filter(users::id.eq_any(uuids))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.iter().map(row_to_user).collect()
    }
}
