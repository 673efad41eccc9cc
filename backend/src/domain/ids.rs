//! UUID-backed identifiers for users and content records.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error returned when an identifier string is not a UUID.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} id must be a valid UUID")]
pub struct RecordIdError {
    kind: &'static str,
}

macro_rules! define_record_id {
    ($(#[$meta:meta])* $name:ident => $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Parse an identifier from its hyphenated UUID form.
            pub fn new(raw: impl AsRef<str>) -> Result<Self, RecordIdError> {
                let raw = raw.as_ref();
                if raw.trim() != raw {
                    return Err(RecordIdError { kind: $kind });
                }
                Uuid::parse_str(raw)
                    .map(Self)
                    .map_err(|_| RecordIdError { kind: $kind })
            }

            /// Generate a new random identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an already parsed UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Access the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = RecordIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

define_record_id! {
    /// Identifier of a registered user; also the value kept in the session.
    UserId => "user"
}

define_record_id! {
    /// Identifier of a campground record.
    CampgroundId => "campground"
}

define_record_id! {
    /// Identifier of a review record.
    ReviewId => "review"
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("not-a-uuid")]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    fn rejects_malformed_ids(#[case] raw: &str) {
        let err = CampgroundId::new(raw).expect_err("malformed id");
        assert_eq!(err.to_string(), "campground id must be a valid UUID");
    }

    #[rstest]
    fn parses_and_displays_hyphenated_form() {
        let raw = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
        let id: ReviewId = raw.parse().expect("valid id");
        assert_eq!(id.to_string(), raw);
    }

    #[rstest]
    fn kinds_name_the_record_in_errors() {
        let err = UserId::new("42").expect_err("malformed id");
        assert_eq!(err.to_string(), "user id must be a valid UUID");
    }

    #[rstest]
    fn serialises_as_bare_string() {
        let id = ReviewId::from_uuid(Uuid::nil());
        let value = serde_json::to_value(id).expect("serialises");
        assert_eq!(value, serde_json::json!("00000000-0000-0000-0000-000000000000"));
    }
}
