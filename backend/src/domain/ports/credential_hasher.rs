//! Port for one-way password hashing.

use crate::domain::CredentialHash;

use super::define_port_error;

define_port_error! {
    /// Errors raised by credential hashers.
    pub enum CredentialHasherError {
        /// Hashing failed.
        Hash { message: String } => "credential hashing failed: {message}",
        /// A stored hash could not be parsed.
        MalformedHash { message: String } => "stored credential hash is malformed: {message}",
    }
}

/// Salted, slow password hashing.
///
/// Calls are CPU bound; async callers should run them on a blocking thread.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialHasher: Send + Sync {
    /// Hash `password` with a fresh salt.
    fn hash(&self, password: &str) -> Result<CredentialHash, CredentialHasherError>;

    /// Check `password` against a stored hash.
    fn verify(&self, password: &str, hash: &CredentialHash) -> Result<bool, CredentialHasherError>;

    /// Spend the same effort as [`CredentialHasher::verify`] without a stored
    /// hash, so unknown usernames cost as much as wrong passwords.
    fn verify_dummy(&self, password: &str);
}
