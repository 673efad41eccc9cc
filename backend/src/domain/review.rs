//! Review record and its input validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::text_field::{TextIssue, required_text};
use super::{Error, ReviewId, UserId};

/// Star rating between one and five inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Rating(u8);

/// Lowest accepted rating.
pub const RATING_MIN: u8 = 1;
/// Highest accepted rating.
pub const RATING_MAX: u8 = 5;

impl Rating {
    /// Accept integers in `1..=5`.
    pub fn new(value: i64) -> Result<Self, ReviewValidationError> {
        u8::try_from(value)
            .ok()
            .filter(|stars| (RATING_MIN..=RATING_MAX).contains(stars))
            .map(Self)
            .ok_or(ReviewValidationError::RatingOutOfRange)
    }

    /// Parse a rating from loosely typed client input.
    ///
    /// Integral JSON numbers (`4`, `4.0`) and integer strings (`"4"`) are
    /// accepted. Fractions, blanks and other types are rejected.
    ///
    /// # Examples
    /// ```
    /// use yelpcamp::domain::{Rating, ReviewValidationError};
    /// use serde_json::json;
    ///
    /// assert_eq!(Rating::parse(&json!(4)).map(|r| r.stars()), Ok(4));
    /// assert_eq!(
    ///     Rating::parse(&json!(3.5)),
    ///     Err(ReviewValidationError::RatingNotInteger),
    /// );
    /// ```
    pub fn parse(value: &Value) -> Result<Self, ReviewValidationError> {
        match value {
            Value::Null => Err(ReviewValidationError::MissingRating),
            Value::Number(number) => {
                if let Some(integer) = number.as_i64() {
                    return Self::new(integer);
                }
                match number.as_f64() {
                    Some(float) if float.is_finite() && float.fract() == 0.0 => {
                        (RATING_MIN..=RATING_MAX)
                            .find(|stars| f64::from(*stars) == float)
                            .map(Self)
                            .ok_or(ReviewValidationError::RatingOutOfRange)
                    }
                    _ => Err(ReviewValidationError::RatingNotInteger),
                }
            }
            Value::String(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Err(ReviewValidationError::MissingRating);
                }
                trimmed
                    .parse::<i64>()
                    .map_err(|_| ReviewValidationError::RatingNotInteger)
                    .and_then(Self::new)
            }
            _ => Err(ReviewValidationError::RatingNotInteger),
        }
    }

    #[must_use]
    pub const fn stars(&self) -> u8 {
        self.0
    }
}

/// Reasons a review draft was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewValidationError {
    MissingRating,
    RatingNotInteger,
    RatingOutOfRange,
    MissingBody,
    BodyContainsHtml,
}

impl ReviewValidationError {
    /// Field the failure relates to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::MissingRating | Self::RatingNotInteger | Self::RatingOutOfRange => "rating",
            Self::MissingBody | Self::BodyContainsHtml => "body",
        }
    }

    /// Stable machine-readable failure code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingRating | Self::MissingBody => "required",
            Self::RatingNotInteger => "not_an_integer",
            Self::RatingOutOfRange => "out_of_range",
            Self::BodyContainsHtml => "contains_html",
        }
    }
}

impl fmt::Display for ReviewValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRating => write!(f, "review rating is required"),
            Self::RatingNotInteger => write!(f, "review rating must be a whole number"),
            Self::RatingOutOfRange => write!(
                f,
                "review rating must be between {RATING_MIN} and {RATING_MAX}"
            ),
            Self::MissingBody => write!(f, "review body is required"),
            Self::BodyContainsHtml => write!(f, "review body must not include HTML"),
        }
    }
}

impl std::error::Error for ReviewValidationError {}

impl From<ReviewValidationError> for Error {
    fn from(value: ReviewValidationError) -> Self {
        Error::invalid_request(value.to_string())
            .with_details(json!({ "field": value.field(), "code": value.code() }))
    }
}

/// Raw review input as received from a client.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDraft {
    pub rating: Option<Value>,
    pub body: Option<String>,
}

/// Validated review content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewContent {
    pub rating: Rating,
    pub body: String,
}

/// Validate a review draft.
pub fn validate_review(draft: &ReviewDraft) -> Result<ReviewContent, ReviewValidationError> {
    let rating = Rating::parse(draft.rating.as_ref().unwrap_or(&Value::Null))?;
    let body = required_text(draft.body.as_deref()).map_err(|issue| match issue {
        TextIssue::Missing => ReviewValidationError::MissingBody,
        TextIssue::ContainsHtml => ReviewValidationError::BodyContainsHtml,
    })?;
    Ok(ReviewContent { rating, body })
}

/// Review record.
///
/// ## Invariants
/// - `author` is set once at creation and has no setter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    id: ReviewId,
    author: UserId,
    content: ReviewContent,
}

impl Review {
    /// Start a new review authored by `author`.
    #[must_use]
    pub fn create(author: UserId, content: ReviewContent) -> Self {
        Self::restore(ReviewId::random(), author, content)
    }

    /// Rebuild a stored review.
    #[must_use]
    pub const fn restore(id: ReviewId, author: UserId, content: ReviewContent) -> Self {
        Self {
            id,
            author,
            content,
        }
    }

    #[must_use]
    pub fn id(&self) -> &ReviewId {
        &self.id
    }

    #[must_use]
    pub fn author(&self) -> &UserId {
        &self.author
    }

    #[must_use]
    pub fn rating(&self) -> Rating {
        self.content.rating
    }

    #[must_use]
    pub fn body(&self) -> &str {
        &self.content.body
    }
}
