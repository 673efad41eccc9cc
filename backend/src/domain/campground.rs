//! Campground aggregate and its input validation.
//!
//! A [`Campground`] is only ever built from validated [`CampgroundDetails`]
//! plus an author fixed at creation. Persistence adapters rebuild stored
//! records through [`CampgroundParts`]; no API mutates the author afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::ports::IMAGE_FOLDER;
use super::text_field::{TextIssue, required_text};
use super::{CampgroundId, Error, ReviewId, UserId};

/// Hosted image reference.
///
/// `filename` is the key the image host uses for deletion. Uploads land in a
/// per-user folder, so the key also records who uploaded the asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    pub url: String,
    pub filename: String,
}

impl ImageRef {
    /// Build a reference from a hosted URL and host-side key.
    pub fn new(url: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            filename: filename.into(),
        }
    }

    /// URL of a 200px-wide rendition.
    ///
    /// The host applies transformations encoded as a path segment directly
    /// after `/upload`; URLs without that segment are returned unchanged.
    ///
    /// # Examples
    /// ```
    /// use yelpcamp::domain::ImageRef;
    ///
    /// let image = ImageRef::new(
    ///     "https://res.cloudinary.com/demo/image/upload/v1/YelpCamp/a.jpg",
    ///     "YelpCamp/a",
    /// );
    /// assert_eq!(
    ///     image.thumbnail(),
    ///     "https://res.cloudinary.com/demo/image/upload/w_200/v1/YelpCamp/a.jpg",
    /// );
    /// ```
    #[must_use]
    pub fn thumbnail(&self) -> String {
        self.url.replacen("/upload", "/upload/w_200", 1)
    }

    /// Host folder that uploads by `owner` are stored under.
    #[must_use]
    pub fn upload_folder(owner: &UserId) -> String {
        format!("{IMAGE_FOLDER}/{owner}")
    }

    /// Whether this reference names an asset `owner` uploaded.
    ///
    /// The key must sit directly in the owner's folder and the URL must serve
    /// that same key.
    ///
    /// # Examples
    /// ```
    /// use yelpcamp::domain::{ImageRef, UserId};
    ///
    /// let owner = UserId::random();
    /// let key = format!("{}/tent", ImageRef::upload_folder(&owner));
    /// let image = ImageRef::new(format!("https://host/image/upload/v1/{key}.jpg"), key);
    /// assert!(image.is_uploaded_by(&owner));
    /// assert!(!image.is_uploaded_by(&UserId::random()));
    /// ```
    #[must_use]
    pub fn is_uploaded_by(&self, owner: &UserId) -> bool {
        let folder = Self::upload_folder(owner);
        let in_folder = self
            .filename
            .strip_prefix(folder.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .is_some_and(|name| !name.is_empty() && !name.contains('/'));
        in_folder && self.url.contains(&format!("/{}.", self.filename))
    }
}

/// Geocoded map position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    longitude: f64,
    latitude: f64,
}

/// Rejected coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("coordinates must be finite with longitude in [-180, 180] and latitude in [-90, 90]")]
pub struct GeoPointError;

impl GeoPoint {
    /// Validate a `(longitude, latitude)` pair.
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, GeoPointError> {
        let valid = longitude.is_finite()
            && latitude.is_finite()
            && (-180.0..=180.0).contains(&longitude)
            && (-90.0..=90.0).contains(&latitude);
        if valid {
            Ok(Self {
                longitude,
                latitude,
            })
        } else {
            Err(GeoPointError)
        }
    }

    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }
}

/// Nightly price; finite and never negative.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Price(f64);

impl Price {
    /// Accept finite, non-negative amounts.
    pub fn new(amount: f64) -> Result<Self, CampgroundValidationError> {
        if !amount.is_finite() {
            return Err(CampgroundValidationError::InvalidPrice);
        }
        if amount < 0.0 {
            return Err(CampgroundValidationError::NegativePrice);
        }
        Ok(Self(amount))
    }

    #[must_use]
    pub const fn amount(&self) -> f64 {
        self.0
    }
}

/// Input fields of a campground.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampgroundField {
    Title,
    Description,
    Price,
    Location,
}

impl CampgroundField {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Price => "price",
            Self::Location => "location",
        }
    }
}

impl fmt::Display for CampgroundField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reasons a campground draft was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampgroundValidationError {
    Missing(CampgroundField),
    ContainsHtml(CampgroundField),
    InvalidPrice,
    NegativePrice,
}

impl CampgroundValidationError {
    fn from_text(field: CampgroundField, issue: TextIssue) -> Self {
        match issue {
            TextIssue::Missing => Self::Missing(field),
            TextIssue::ContainsHtml => Self::ContainsHtml(field),
        }
    }

    /// Field the failure relates to.
    #[must_use]
    pub const fn field(&self) -> CampgroundField {
        match self {
            Self::Missing(field) | Self::ContainsHtml(field) => *field,
            Self::InvalidPrice | Self::NegativePrice => CampgroundField::Price,
        }
    }

    /// Stable machine-readable failure code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Missing(_) => "required",
            Self::ContainsHtml(_) => "contains_html",
            Self::InvalidPrice => "not_a_number",
            Self::NegativePrice => "min",
        }
    }
}

impl fmt::Display for CampgroundValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(field) => write!(f, "campground {field} is required"),
            Self::ContainsHtml(field) => write!(f, "campground {field} must not include HTML"),
            Self::InvalidPrice => write!(f, "campground price must be a number"),
            Self::NegativePrice => write!(f, "campground price must be at least 0"),
        }
    }
}

impl std::error::Error for CampgroundValidationError {}

impl From<CampgroundValidationError> for Error {
    fn from(value: CampgroundValidationError) -> Self {
        Error::invalid_request(value.to_string())
            .with_details(json!({ "field": value.field().as_str(), "code": value.code() }))
    }
}

/// Raw campground input as received from a client.
///
/// `price` accepts JSON numbers and numeric strings (form submissions).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampgroundDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Value>,
    pub location: Option<String>,
}

/// Validated scalar fields of a campground.
#[derive(Debug, Clone, PartialEq)]
pub struct CampgroundDetails {
    pub title: String,
    pub description: String,
    pub price: Price,
    pub location: String,
}

fn parse_price(value: Option<&Value>) -> Result<Price, CampgroundValidationError> {
    let amount = match value {
        None | Some(Value::Null) => {
            return Err(CampgroundValidationError::Missing(CampgroundField::Price));
        }
        Some(Value::Number(number)) => number
            .as_f64()
            .ok_or(CampgroundValidationError::InvalidPrice)?,
        Some(Value::String(raw)) if raw.trim().is_empty() => {
            return Err(CampgroundValidationError::Missing(CampgroundField::Price));
        }
        Some(Value::String(raw)) => raw
            .trim()
            .parse::<f64>()
            .map_err(|_| CampgroundValidationError::InvalidPrice)?,
        Some(_) => return Err(CampgroundValidationError::InvalidPrice),
    };
    Price::new(amount)
}

/// Validate a campground draft for create and update alike.
///
/// # Examples
/// ```
/// use yelpcamp::domain::{CampgroundDraft, validate_campground};
/// use serde_json::json;
///
/// let draft = CampgroundDraft {
///     title: Some("Pine Ridge".into()),
///     description: Some("quiet".into()),
///     price: Some(json!(15)),
///     location: Some("Denver, CO".into()),
/// };
/// let details = validate_campground(&draft).expect("valid draft");
/// assert_eq!(details.price.amount(), 15.0);
/// ```
pub fn validate_campground(
    draft: &CampgroundDraft,
) -> Result<CampgroundDetails, CampgroundValidationError> {
    let text = |field: CampgroundField, value: Option<&String>| {
        required_text(value.map(String::as_str))
            .map_err(|issue| CampgroundValidationError::from_text(field, issue))
    };
    Ok(CampgroundDetails {
        title: text(CampgroundField::Title, draft.title.as_ref())?,
        price: parse_price(draft.price.as_ref())?,
        description: text(CampgroundField::Description, draft.description.as_ref())?,
        location: text(CampgroundField::Location, draft.location.as_ref())?,
    })
}

/// Stored shape of a campground, used by adapters to rebuild records.
#[derive(Debug, Clone, PartialEq)]
pub struct CampgroundParts {
    pub id: CampgroundId,
    pub author: UserId,
    pub details: CampgroundDetails,
    pub geometry: Option<GeoPoint>,
    pub images: Vec<ImageRef>,
    pub reviews: Vec<ReviewId>,
}

/// Campground record.
///
/// ## Invariants
/// - `author` is set once at creation and has no setter.
/// - `details` satisfied [`validate_campground`] when written.
#[derive(Debug, Clone, PartialEq)]
pub struct Campground {
    id: CampgroundId,
    author: UserId,
    details: CampgroundDetails,
    geometry: Option<GeoPoint>,
    images: Vec<ImageRef>,
    reviews: Vec<ReviewId>,
}

impl Campground {
    /// Start a new record with no reviews.
    #[must_use]
    pub fn create(
        author: UserId,
        details: CampgroundDetails,
        geometry: Option<GeoPoint>,
        images: Vec<ImageRef>,
    ) -> Self {
        Self {
            id: CampgroundId::random(),
            author,
            details,
            geometry,
            images,
            reviews: Vec::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &CampgroundId {
        &self.id
    }

    #[must_use]
    pub fn author(&self) -> &UserId {
        &self.author
    }

    #[must_use]
    pub fn details(&self) -> &CampgroundDetails {
        &self.details
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.details.title
    }

    #[must_use]
    pub fn location(&self) -> &str {
        &self.details.location
    }

    #[must_use]
    pub fn geometry(&self) -> Option<&GeoPoint> {
        self.geometry.as_ref()
    }

    #[must_use]
    pub fn images(&self) -> &[ImageRef] {
        &self.images
    }

    /// Review ids linked from this campground, in insertion order.
    #[must_use]
    pub fn reviews(&self) -> &[ReviewId] {
        &self.reviews
    }

    /// Whether an image with `filename` is attached.
    #[must_use]
    pub fn has_image(&self, filename: &str) -> bool {
        self.images.iter().any(|image| image.filename == filename)
    }

    /// Decompose into stored parts.
    #[must_use]
    pub fn into_parts(self) -> CampgroundParts {
        CampgroundParts {
            id: self.id,
            author: self.author,
            details: self.details,
            geometry: self.geometry,
            images: self.images,
            reviews: self.reviews,
        }
    }
}

impl From<CampgroundParts> for Campground {
    fn from(parts: CampgroundParts) -> Self {
        let CampgroundParts {
            id,
            author,
            details,
            geometry,
            images,
            reviews,
        } = parts;
        Self {
            id,
            author,
            details,
            geometry,
            images,
            reviews,
        }
    }
}

#[cfg(test)]
mod tests;
