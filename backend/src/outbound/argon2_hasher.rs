//! Argon2id credential hasher.
//!
//! Hashes are PHC strings, so parameters and salt travel with each stored
//! credential and older hashes keep verifying after a parameter change.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

use crate::domain::CredentialHash;
use crate::domain::ports::{CredentialHasher, CredentialHasherError};

/// [`CredentialHasher`] backed by Argon2id with the crate's default cost.
pub struct Argon2CredentialHasher {
    argon2: Argon2<'static>,
    dummy_hash: String,
}

impl Argon2CredentialHasher {
    /// Build a hasher and precompute the hash used by
    /// [`CredentialHasher::verify_dummy`].
    ///
    /// # Errors
    ///
    /// Returns [`CredentialHasherError::Hash`] when the dummy hash cannot be
    /// produced.
    pub fn new() -> Result<Self, CredentialHasherError> {
        let argon2 = Argon2::default();
        let dummy_hash = hash_with(&argon2, "not-a-real-password")?;
        Ok(Self { argon2, dummy_hash })
    }
}

impl std::fmt::Debug for Argon2CredentialHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Argon2CredentialHasher").finish_non_exhaustive()
    }
}

fn hash_with(argon2: &Argon2<'_>, password: &str) -> Result<String, CredentialHasherError> {
    let salt = SaltString::generate(&mut OsRng);
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| CredentialHasherError::hash(err.to_string()))
}

impl CredentialHasher for Argon2CredentialHasher {
    fn hash(&self, password: &str) -> Result<CredentialHash, CredentialHasherError> {
        let encoded = hash_with(&self.argon2, password)?;
        CredentialHash::new(encoded).map_err(|err| CredentialHasherError::hash(err.to_string()))
    }

    fn verify(&self, password: &str, hash: &CredentialHash) -> Result<bool, CredentialHasherError> {
        let parsed = PasswordHash::new(hash.as_str())
            .map_err(|err| CredentialHasherError::malformed_hash(err.to_string()))?;
        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(err) => Err(CredentialHasherError::malformed_hash(err.to_string())),
        }
    }

    fn verify_dummy(&self, password: &str) {
        if let Ok(parsed) = PasswordHash::new(&self.dummy_hash) {
            let _ = self.argon2.verify_password(password.as_bytes(), &parsed);
        }
    }
}
