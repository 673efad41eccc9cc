//! Identity use cases: registration, login and the current profile.
//!
//! Password hashing is CPU bound, so it runs on tokio's blocking pool with
//! the request's trace id carried along.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};
use zeroize::Zeroizing;

use super::policy::{SIGN_IN_REQUIRED_MESSAGE, require_actor};
use super::ports::{
    CredentialHasher, LoginService, RegistrationService, UserRepository, UsersQuery,
};
use super::service_errors::{map_hasher_error, map_user_error};
use super::{
    Error, LoginCredentials, RegistrationDraft, RegistrationValidationError, TraceId, User,
    UserAccount, UserId, Username, validate_registration,
};

/// Message returned for every failed login.
pub const INVALID_LOGIN_MESSAGE: &str = "Password or username is incorrect";

/// Identity service implementing the login, registration and profile ports.
#[derive(Clone)]
pub struct IdentityService<U> {
    users: Arc<U>,
    hasher: Arc<dyn CredentialHasher>,
}

impl<U> IdentityService<U>
where
    U: UserRepository,
{
    pub fn new(users: Arc<U>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { users, hasher }
    }

    async fn with_hasher<T, F>(&self, work: F) -> Result<T, Error>
    where
        F: FnOnce(&dyn CredentialHasher) -> T + Send + 'static,
        T: Send + 'static,
    {
        let hasher = Arc::clone(&self.hasher);
        TraceId::spawn_blocking(move || work(hasher.as_ref()))
            .await
            .map_err(|err| Error::internal(format!("credential task failed: {err}")))
    }
}

#[async_trait]
impl<U> RegistrationService for IdentityService<U>
where
    U: UserRepository,
{
    async fn register(&self, draft: RegistrationDraft) -> Result<User, Error> {
        let registration = validate_registration(draft)?;
        let username_taken = self
            .users
            .find_account_by_username(registration.username())
            .await
            .map_err(map_user_error)?
            .is_some();
        if username_taken {
            return Err(RegistrationValidationError::UsernameTaken.into());
        }
        let email_taken = self
            .users
            .find_by_email(registration.email())
            .await
            .map_err(map_user_error)?
            .is_some();
        if email_taken {
            return Err(RegistrationValidationError::EmailTaken.into());
        }

        let password = Zeroizing::new(registration.password().to_owned());
        let credential = self
            .with_hasher(move |hasher| hasher.hash(password.as_str()))
            .await?
            .map_err(map_hasher_error)?;

        let profile = User::new(
            UserId::random(),
            registration.username().clone(),
            registration.email().clone(),
        );
        self.users
            .insert(&UserAccount {
                profile: profile.clone(),
                credential,
            })
            .await
            .map_err(map_user_error)?;
        info!(user_id = %profile.id(), username = %profile.username(), "user registered");
        Ok(profile)
    }
}

#[async_trait]
impl<U> LoginService for IdentityService<U>
where
    U: UserRepository,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let account = match Username::new(credentials.username()) {
            Ok(username) => self
                .users
                .find_account_by_username(&username)
                .await
                .map_err(map_user_error)?,
            Err(_) => None,
        };
        let password = Zeroizing::new(credentials.password().to_owned());

        let Some(account) = account else {
            self.with_hasher(move |hasher| hasher.verify_dummy(password.as_str()))
                .await?;
            info!("login rejected: unknown username");
            return Err(Error::unauthorized(INVALID_LOGIN_MESSAGE));
        };

        let stored = account.credential.clone();
        let verified = self
            .with_hasher(move |hasher| hasher.verify(password.as_str(), &stored))
            .await?;
        match verified {
            Ok(true) => {
                info!(user_id = %account.profile.id(), "login succeeded");
                Ok(*account.profile.id())
            }
            Ok(false) => {
                info!(user_id = %account.profile.id(), "login rejected: wrong password");
                Err(Error::unauthorized(INVALID_LOGIN_MESSAGE))
            }
            Err(error) => {
                warn!(user_id = %account.profile.id(), %error, "stored credential unusable");
                Err(map_hasher_error(error))
            }
        }
    }
}

#[async_trait]
impl<U> UsersQuery for IdentityService<U>
where
    U: UserRepository,
{
    async fn current_user(&self, actor: Option<&UserId>) -> Result<User, Error> {
        let actor = require_actor(actor)?;
        self.users
            .find_by_id(actor)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| {
                warn!(user_id = %actor, "session refers to an unknown user");
                Error::unauthorized(SIGN_IN_REQUIRED_MESSAGE)
            })
    }
}
