//! In-memory identity store.

use std::sync::Mutex;

use async_trait::async_trait;

use super::lock;
use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{Email, User, UserAccount, UserId, Username};

/// Accounts kept in registration order.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    accounts: Mutex<Vec<UserAccount>>,
}

fn query_error(message: String) -> UserPersistenceError {
    UserPersistenceError::query(message)
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, account: &UserAccount) -> Result<(), UserPersistenceError> {
        let mut accounts = lock(&self.accounts, query_error)?;
        let profile = &account.profile;
        if accounts
            .iter()
            .any(|existing| existing.profile.username() == profile.username())
        {
            return Err(UserPersistenceError::duplicate_username(
                profile.username().as_ref(),
            ));
        }
        if accounts
            .iter()
            .any(|existing| existing.profile.email() == profile.email())
        {
            return Err(UserPersistenceError::duplicate_email(profile.email().as_ref()));
        }
        accounts.push(account.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let accounts = lock(&self.accounts, query_error)?;
        Ok(accounts
            .iter()
            .find(|account| account.profile.id() == id)
            .map(|account| account.profile.clone()))
    }

    async fn find_account_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let accounts = lock(&self.accounts, query_error)?;
        Ok(accounts
            .iter()
            .find(|account| account.profile.username() == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        let accounts = lock(&self.accounts, query_error)?;
        Ok(accounts
            .iter()
            .find(|account| account.profile.email() == email)
            .map(|account| account.profile.clone()))
    }

    async fn find_many(&self, ids: &[UserId]) -> Result<Vec<User>, UserPersistenceError> {
        let accounts = lock(&self.accounts, query_error)?;
        Ok(accounts
            .iter()
            .filter(|account| ids.contains(account.profile.id()))
            .map(|account| account.profile.clone())
            .collect())
    }
}
