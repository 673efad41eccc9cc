//! Tests for campground validation and record behaviour.

use super::*;
use crate::domain::ErrorCode;
use rstest::{fixture, rstest};

#[fixture]
fn pine_ridge() -> CampgroundDraft {
    CampgroundDraft {
        title: Some("Pine Ridge".to_owned()),
        description: Some("quiet".to_owned()),
        price: Some(json!(15)),
        location: Some("Denver, CO".to_owned()),
    }
}

#[rstest]
fn valid_draft_keeps_scalar_fields(pine_ridge: CampgroundDraft) {
    let details = validate_campground(&pine_ridge).expect("valid draft");
    assert_eq!(details.title, "Pine Ridge");
    assert_eq!(details.description, "quiet");
    assert_eq!(details.location, "Denver, CO");
    assert_eq!(details.price, Price::new(15.0).expect("valid price"));
}

#[rstest]
#[case(json!(0), 0.0)]
#[case(json!(12.5), 12.5)]
#[case(json!("20"), 20.0)]
#[case(json!(" 7.25 "), 7.25)]
fn price_accepts_numbers_and_numeric_strings(
    mut pine_ridge: CampgroundDraft,
    #[case] price: Value,
    #[case] expected: f64,
) {
    pine_ridge.price = Some(price);
    let details = validate_campground(&pine_ridge).expect("valid price");
    assert_eq!(details.price.amount(), expected);
}

#[rstest]
#[case(None, CampgroundValidationError::Missing(CampgroundField::Price))]
#[case(Some(Value::Null), CampgroundValidationError::Missing(CampgroundField::Price))]
#[case(Some(json!("")), CampgroundValidationError::Missing(CampgroundField::Price))]
#[case(Some(json!(-1)), CampgroundValidationError::NegativePrice)]
#[case(Some(json!("cheap")), CampgroundValidationError::InvalidPrice)]
#[case(Some(json!(true)), CampgroundValidationError::InvalidPrice)]
#[case(Some(json!("NaN")), CampgroundValidationError::InvalidPrice)]
fn price_rejects_invalid_values(
    mut pine_ridge: CampgroundDraft,
    #[case] price: Option<Value>,
    #[case] expected: CampgroundValidationError,
) {
    pine_ridge.price = price;
    assert_eq!(validate_campground(&pine_ridge), Err(expected));
}

#[rstest]
fn missing_text_fields_are_reported_per_field(pine_ridge: CampgroundDraft) {
    let cases = [
        (
            CampgroundDraft {
                title: None,
                ..pine_ridge.clone()
            },
            CampgroundField::Title,
        ),
        (
            CampgroundDraft {
                description: Some("  ".to_owned()),
                ..pine_ridge.clone()
            },
            CampgroundField::Description,
        ),
        (
            CampgroundDraft {
                location: Some(String::new()),
                ..pine_ridge
            },
            CampgroundField::Location,
        ),
    ];
    for (draft, field) in cases {
        assert_eq!(
            validate_campground(&draft),
            Err(CampgroundValidationError::Missing(field))
        );
    }
}

#[rstest]
fn markup_in_text_fields_is_rejected(mut pine_ridge: CampgroundDraft) {
    pine_ridge.title = Some("<img src=x onerror=alert(1)>".to_owned());
    assert_eq!(
        validate_campground(&pine_ridge),
        Err(CampgroundValidationError::ContainsHtml(CampgroundField::Title))
    );
}

#[rstest]
fn validation_errors_map_to_invalid_request_with_details() {
    let error: Error = CampgroundValidationError::NegativePrice.into();
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.message(), "campground price must be at least 0");
    assert_eq!(error.details(), Some(&json!({"field": "price", "code": "min"})));
}

#[rstest]
#[case(
    "https://res.cloudinary.com/demo/image/upload/v1/YelpCamp/a.jpg",
    "https://res.cloudinary.com/demo/image/upload/w_200/v1/YelpCamp/a.jpg"
)]
#[case("https://images.example.com/a.jpg", "https://images.example.com/a.jpg")]
fn thumbnail_inserts_width_transformation(#[case] url: &str, #[case] expected: &str) {
    let image = ImageRef::new(url, "YelpCamp/a");
    assert_eq!(image.thumbnail(), expected);
}

#[rstest]
fn uploads_are_recognised_by_their_owner_folder() {
    let owner = UserId::random();
    let key = format!("YelpCamp/{owner}/tent");
    let image = ImageRef::new(format!("https://host/image/upload/v3/{key}.jpg"), key);

    assert_eq!(ImageRef::upload_folder(&owner), format!("YelpCamp/{owner}"));
    assert!(image.is_uploaded_by(&owner));
    assert!(!image.is_uploaded_by(&UserId::random()));
}

#[rstest]
#[case::legacy_folder("YelpCamp/tent", "https://host/image/upload/YelpCamp/tent.jpg")]
#[case::nested_key("YelpCamp/{owner}/x/tent", "https://host/image/upload/YelpCamp/{owner}/x/tent.jpg")]
#[case::empty_name("YelpCamp/{owner}/", "https://host/image/upload/YelpCamp/{owner}/.jpg")]
#[case::url_for_another_key("YelpCamp/{owner}/tent", "https://host/image/upload/YelpCamp/{owner}/lake.jpg")]
fn foreign_or_malformed_references_are_not_owned(#[case] filename: &str, #[case] url: &str) {
    let owner = UserId::random();
    let image = ImageRef::new(
        url.replace("{owner}", &owner.to_string()),
        filename.replace("{owner}", &owner.to_string()),
    );
    assert!(!image.is_uploaded_by(&owner));
}

#[rstest]
#[case(-180.0, -90.0, true)]
#[case(-104.99, 39.74, true)]
#[case(181.0, 0.0, false)]
#[case(0.0, 90.5, false)]
#[case(f64::NAN, 0.0, false)]
fn geo_point_enforces_ranges(#[case] lng: f64, #[case] lat: f64, #[case] valid: bool) {
    assert_eq!(GeoPoint::new(lng, lat).is_ok(), valid);
}

#[rstest]
fn create_starts_without_reviews_and_round_trips_parts(pine_ridge: CampgroundDraft) {
    let author = UserId::random();
    let details = validate_campground(&pine_ridge).expect("valid draft");
    let image = ImageRef::new("https://host/upload/a.jpg", "YelpCamp/a");
    let campground = Campground::create(author, details, None, vec![image]);

    assert_eq!(campground.author(), &author);
    assert!(campground.reviews().is_empty());
    assert!(campground.has_image("YelpCamp/a"));
    assert!(!campground.has_image("YelpCamp/b"));

    let rebuilt = Campground::from(campground.clone().into_parts());
    assert_eq!(rebuilt, campground);
}
