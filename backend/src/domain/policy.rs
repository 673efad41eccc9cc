//! Ownership policy for content mutations.
//!
//! Every campground or review mutation resolves the acting identity and the
//! target record, then passes both through [`authorize_mutation`]. The guard
//! checks, in order: an identity is present, the record exists, the identity
//! authored the record. Image references attached to a campground pass
//! through [`authorize_images`] so nobody can claim another camper's upload.

use std::fmt;

use super::{Campground, Error, ImageRef, Review, UserId};

/// Message shown when an anonymous caller attempts a mutation.
pub const SIGN_IN_REQUIRED_MESSAGE: &str = "You must be signed in first!";
/// Message shown when a caller mutates a record they did not author.
pub const NOT_AUTHOR_MESSAGE: &str = "You do not have permission to do that!";

/// A record with a fixed author.
pub trait Authored {
    /// Human-facing record kind used in messages.
    const KIND: &'static str;

    /// Identity that created the record.
    fn author(&self) -> &UserId;

    /// Whether `actor` may update or delete this record.
    fn can_be_mutated_by(&self, actor: &UserId) -> bool;
}

impl Authored for Campground {
    const KIND: &'static str = "campground";

    fn author(&self) -> &UserId {
        Campground::author(self)
    }

    fn can_be_mutated_by(&self, actor: &UserId) -> bool {
        can_mutate_campground(actor, self)
    }
}

impl Authored for Review {
    const KIND: &'static str = "review";

    fn author(&self) -> &UserId {
        Review::author(self)
    }

    fn can_be_mutated_by(&self, actor: &UserId) -> bool {
        can_mutate_review(actor, self)
    }
}

/// Whether `actor` may update or delete `campground`.
#[must_use]
pub fn can_mutate_campground(actor: &UserId, campground: &Campground) -> bool {
    campground.author() == actor
}

/// Whether `actor` may delete `review`.
#[must_use]
pub fn can_mutate_review(actor: &UserId, review: &Review) -> bool {
    review.author() == actor
}

/// Whether `actor` may attach `image` to a campground they author.
#[must_use]
pub fn can_attach_image(actor: &UserId, image: &ImageRef) -> bool {
    image.is_uploaded_by(actor)
}

/// Outcome of a refused mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyDenial {
    /// No identity in context.
    Unauthenticated,
    /// Target record does not exist.
    NotFound { kind: &'static str },
    /// Identity present but not the record's author.
    NotAuthor { kind: &'static str },
}

impl fmt::Display for PolicyDenial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthenticated => f.write_str(SIGN_IN_REQUIRED_MESSAGE),
            Self::NotFound { kind } => write!(f, "Cannot find that {kind}!"),
            Self::NotAuthor { .. } => f.write_str(NOT_AUTHOR_MESSAGE),
        }
    }
}

impl From<PolicyDenial> for Error {
    fn from(value: PolicyDenial) -> Self {
        let message = value.to_string();
        match value {
            PolicyDenial::Unauthenticated => Error::unauthorized(message),
            PolicyDenial::NotFound { .. } => Error::not_found(message),
            PolicyDenial::NotAuthor { .. } => Error::forbidden(message),
        }
    }
}

/// Resolve the acting identity or refuse as unauthenticated.
pub fn require_actor(actor: Option<&UserId>) -> Result<&UserId, PolicyDenial> {
    actor.ok_or(PolicyDenial::Unauthenticated)
}

/// Shared mutation guard for authored records.
///
/// Returns the record when `actor` authored it. Existence is checked before
/// ownership, so a missing record is never reported as "not yours".
///
/// # Examples
/// ```
/// use yelpcamp::domain::policy::{PolicyDenial, authorize_mutation};
/// use yelpcamp::domain::{Review, UserId};
///
/// let actor = UserId::random();
/// let missing: Option<Review> = None;
/// assert_eq!(
///     authorize_mutation(Some(&actor), missing),
///     Err(PolicyDenial::NotFound { kind: "review" }),
/// );
/// ```
pub fn authorize_mutation<T: Authored>(
    actor: Option<&UserId>,
    record: Option<T>,
) -> Result<T, PolicyDenial> {
    let actor = require_actor(actor)?;
    let record = record.ok_or(PolicyDenial::NotFound { kind: T::KIND })?;
    if record.can_be_mutated_by(actor) {
        Ok(record)
    } else {
        Err(PolicyDenial::NotAuthor { kind: T::KIND })
    }
}

/// Refuse image references the actor did not upload.
pub fn authorize_images(actor: &UserId, images: &[ImageRef]) -> Result<(), PolicyDenial> {
    if images.iter().all(|image| can_attach_image(actor, image)) {
        Ok(())
    } else {
        Err(PolicyDenial::NotAuthor { kind: "image" })
    }
}

#[cfg(test)]
mod tests;
