//! Unit tests for campground use cases against mocked ports.

use super::*;
use crate::domain::ports::{
    CampgroundPersistenceError, GeocoderError, ImageStoreError, MockCampgroundRepository, MockGeocoder, MockImageStore,
    MockReviewRepository, MockUserRepository,
};
use crate::domain::{
    CampgroundDraft, CampgroundParts, ErrorCode, ImageRef, ReviewId, User, validate_campground,
};
use mockall::{Sequence, predicate::eq};
use rstest::{fixture, rstest};

type Service = CampgroundService<MockCampgroundRepository, MockReviewRepository, MockUserRepository>;

struct Ports {
    campgrounds: MockCampgroundRepository,
    reviews: MockReviewRepository,
    users: MockUserRepository,
    geocoder: MockGeocoder,
    images: MockImageStore,
}

impl Ports {
    fn into_service(self) -> Service {
        CampgroundService::new(
            Arc::new(self.campgrounds),
            Arc::new(self.reviews),
            Arc::new(self.users),
            Arc::new(self.geocoder),
            Arc::new(self.images),
        )
    }
}

#[fixture]
fn ports() -> Ports {
    Ports {
        campgrounds: MockCampgroundRepository::new(),
        reviews: MockReviewRepository::new(),
        users: MockUserRepository::new(),
        geocoder: MockGeocoder::new(),
        images: MockImageStore::new(),
    }
}

fn draft(location: &str) -> CampgroundDraft {
    CampgroundDraft {
        title: Some("Pine Ridge".to_owned()),
        description: Some("quiet".to_owned()),
        price: Some(json!(15)),
        location: Some(location.to_owned()),
    }
}

fn denver() -> GeoPoint {
    GeoPoint::new(-104.99, 39.74).expect("valid point")
}

/// Host key of `owner`'s upload called `name`.
fn key(owner: &UserId, name: &str) -> String {
    format!("{}/{name}", ImageRef::upload_folder(owner))
}

fn upload_by(owner: &UserId, name: &str) -> ImageRef {
    let filename = key(owner, name);
    ImageRef::new(format!("https://host/image/upload/v1/{filename}.jpg"), filename)
}

fn stored_with(author: &UserId, images: Vec<ImageRef>, reviews: Vec<ReviewId>) -> Campground {
    Campground::from(CampgroundParts {
        id: CampgroundId::random(),
        author: *author,
        details: validate_campground(&draft("Denver, CO")).expect("valid draft"),
        geometry: Some(denver()),
        images,
        reviews,
    })
}

/// Campground whose images are all the author's own uploads.
fn stored(author: &UserId, images: &[&str], reviews: Vec<ReviewId>) -> Campground {
    let images = images.iter().map(|name| upload_by(author, name)).collect();
    stored_with(author, images, reviews)
}

fn update_request(campground: &Campground, delete_images: &[String]) -> UpdateCampgroundRequest {
    UpdateCampgroundRequest {
        id: *campground.id(),
        draft: draft("Denver, CO"),
        new_images: Vec::new(),
        delete_images: delete_images.to_vec(),
    }
}

#[rstest]
#[tokio::test]
async fn create_requires_an_identity(ports: Ports) {
    let service = ports.into_service();
    let err = service
        .create(
            None,
            CreateCampgroundRequest {
                draft: draft("Denver, CO"),
                images: Vec::new(),
            },
        )
        .await
        .expect_err("anonymous create must fail");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn create_persists_author_and_geometry(mut ports: Ports) {
    let author = UserId::random();
    ports
        .geocoder
        .expect_lookup()
        .with(eq("Denver, CO"))
        .times(1)
        .returning(|_| Ok(Some(denver())));
    let expected_author = author;
    ports
        .campgrounds
        .expect_insert()
        .withf(move |campground| {
            campground.author() == &expected_author && campground.geometry() == Some(&denver())
        })
        .times(1)
        .returning(|_| Ok(()));

    let campground = ports
        .into_service()
        .create(
            Some(&author),
            CreateCampgroundRequest {
                draft: draft("Denver, CO"),
                images: vec![upload_by(&author, "a")],
            },
        )
        .await
        .expect("create succeeds");
    assert_eq!(campground.title(), "Pine Ridge");
    assert_eq!(campground.images().len(), 1);
}

#[rstest]
#[tokio::test]
async fn create_refuses_images_uploaded_by_someone_else(mut ports: Ports) {
    let author = UserId::random();
    let owner = UserId::random();
    ports.geocoder.expect_lookup().never();
    ports.campgrounds.expect_insert().never();

    let err = ports
        .into_service()
        .create(
            Some(&author),
            CreateCampgroundRequest {
                draft: draft("Denver, CO"),
                images: vec![upload_by(&author, "mine"), upload_by(&owner, "theirs")],
            },
        )
        .await
        .expect_err("foreign image must be refused");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[case(Ok(None))]
#[case(Err(GeocoderError::timeout("5s")))]
#[tokio::test]
async fn create_degrades_when_geocoding_yields_nothing(
    mut ports: Ports,
    #[case] lookup: Result<Option<GeoPoint>, GeocoderError>,
) {
    ports
        .geocoder
        .expect_lookup()
        .return_once(move |_| lookup);
    ports
        .campgrounds
        .expect_insert()
        .withf(|campground| campground.geometry().is_none())
        .times(1)
        .returning(|_| Ok(()));

    let author = UserId::random();
    let campground = ports
        .into_service()
        .create(
            Some(&author),
            CreateCampgroundRequest {
                draft: draft("Nowhere"),
                images: Vec::new(),
            },
        )
        .await
        .expect("create still succeeds");
    assert!(campground.geometry().is_none());
}

#[rstest]
#[tokio::test]
async fn create_rejects_invalid_drafts_without_writing(mut ports: Ports) {
    ports.campgrounds.expect_insert().never();
    let author = UserId::random();
    let mut invalid = draft("Denver, CO");
    invalid.price = Some(json!(-5));
    let err = ports
        .into_service()
        .create(
            Some(&author),
            CreateCampgroundRequest {
                draft: invalid,
                images: Vec::new(),
            },
        )
        .await
        .expect_err("negative price must fail");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn update_by_non_author_is_forbidden_and_writes_nothing(mut ports: Ports) {
    let author = UserId::random();
    let stranger = UserId::random();
    let campground = stored(&author, &[], Vec::new());
    let found = campground.clone();
    ports
        .campgrounds
        .expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    ports.campgrounds.expect_update_details().never();
    ports.images.expect_delete().never();

    let err = ports
        .into_service()
        .update(Some(&stranger), update_request(&campground, &[]))
        .await
        .expect_err("stranger must be refused");
    assert_eq!(err.code(), ErrorCode::Forbidden);
    assert_eq!(err.message(), "You do not have permission to do that!");
}

#[rstest]
#[tokio::test]
async fn update_of_missing_campground_is_not_found(mut ports: Ports) {
    ports
        .campgrounds
        .expect_find_by_id()
        .returning(|_| Ok(None));
    let actor = UserId::random();
    let campground = stored(&actor, &[], Vec::new());
    let err = ports
        .into_service()
        .update(Some(&actor), update_request(&campground, &[]))
        .await
        .expect_err("missing campground");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn update_keeps_references_whose_host_deletion_failed(mut ports: Ports) {
    let author = UserId::random();
    let (a, b) = (key(&author, "a"), key(&author, "b"));
    let campground = stored(&author, &["a", "b"], Vec::new());
    let found = campground.clone();
    let after = stored(&author, &["b"], Vec::new());
    let mut seq = Sequence::new();
    ports
        .campgrounds
        .expect_find_by_id()
        .times(1)
        .in_sequence(&mut seq)
        .returning(move |_| Ok(Some(found.clone())));
    ports
        .campgrounds
        .expect_update_details()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _| Ok(true));
    ports
        .campgrounds
        .expect_image_in_use_elsewhere()
        .times(2)
        .returning(|_, _| Ok(false));
    ports
        .images
        .expect_delete()
        .with(eq(a.clone()))
        .returning(|_| Ok(()));
    ports
        .images
        .expect_delete()
        .with(eq(b.clone()))
        .returning(|_| Err(ImageStoreError::transport("connection reset")));
    let removed = vec![a.clone()];
    ports
        .campgrounds
        .expect_remove_images()
        .withf(move |_, filenames| filenames == removed.as_slice())
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(true));
    ports
        .campgrounds
        .expect_find_by_id()
        .times(1)
        .in_sequence(&mut seq)
        .returning(move |_| Ok(Some(after.clone())));

    let err = ports
        .into_service()
        .update(Some(&author), update_request(&campground, &[a, b.clone()]))
        .await
        .expect_err("partial deletion is reported");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    assert_eq!(err.details(), Some(&json!({"failedImages": [b]})));
}

#[rstest]
#[tokio::test]
async fn images_not_exclusively_owned_are_unlinked_without_host_deletion(mut ports: Ports) {
    let author = UserId::random();
    let other = UserId::random();
    let foreign = upload_by(&other, "theirs");
    let shared = upload_by(&author, "shared");
    let campground = stored_with(&author, vec![foreign.clone(), shared.clone()], Vec::new());
    let found = campground.clone();
    ports
        .campgrounds
        .expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    ports
        .campgrounds
        .expect_update_details()
        .returning(|_, _, _| Ok(true));
    let shared_key = shared.filename.clone();
    ports
        .campgrounds
        .expect_image_in_use_elsewhere()
        .withf(move |filename, _| filename == shared_key)
        .times(1)
        .returning(|_, _| Ok(true));
    ports.images.expect_delete().never();
    let mut expected = vec![foreign.filename.clone(), shared.filename.clone()];
    expected.sort();
    ports
        .campgrounds
        .expect_remove_images()
        .withf(move |_, filenames| filenames == expected.as_slice())
        .times(1)
        .returning(|_, _| Ok(true));

    ports
        .into_service()
        .update(
            Some(&author),
            update_request(&campground, &[foreign.filename, shared.filename]),
        )
        .await
        .expect("unlinking succeeds");
}

#[rstest]
#[tokio::test]
async fn unknown_sharing_state_keeps_the_reference(mut ports: Ports) {
    let author = UserId::random();
    let a = key(&author, "a");
    let campground = stored(&author, &["a"], Vec::new());
    let found = campground.clone();
    ports
        .campgrounds
        .expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    ports
        .campgrounds
        .expect_update_details()
        .returning(|_, _, _| Ok(true));
    ports
        .campgrounds
        .expect_image_in_use_elsewhere()
        .returning(|_, _| Err(CampgroundPersistenceError::connection("pool timed out")));
    ports.images.expect_delete().never();
    ports.campgrounds.expect_remove_images().never();

    let err = ports
        .into_service()
        .update(Some(&author), update_request(&campground, &[a.clone()]))
        .await
        .expect_err("unconfirmed deletion is reported");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    assert_eq!(err.details(), Some(&json!({"failedImages": [a]})));
}

#[rstest]
#[tokio::test]
async fn update_skips_filenames_not_attached_to_the_campground(mut ports: Ports) {
    let author = UserId::random();
    let campground = stored(&author, &["a"], Vec::new());
    let found = campground.clone();
    ports
        .campgrounds
        .expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    ports
        .campgrounds
        .expect_update_details()
        .returning(|_, _, _| Ok(true));
    ports.campgrounds.expect_image_in_use_elsewhere().never();
    ports.images.expect_delete().never();
    ports.campgrounds.expect_remove_images().never();

    ports
        .into_service()
        .update(
            Some(&author),
            update_request(&campground, &[key(&author, "b"), "Other/asset".to_owned()]),
        )
        .await
        .expect("unknown filenames are ignored");
}

#[rstest]
#[tokio::test]
async fn update_appends_new_images_and_regeocodes_moved_locations(mut ports: Ports) {
    let author = UserId::random();
    let campground = stored(&author, &["a"], Vec::new());
    let found = campground.clone();
    let new_key = key(&author, "new");
    ports
        .campgrounds
        .expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    ports
        .geocoder
        .expect_lookup()
        .with(eq("Boulder, CO"))
        .times(1)
        .returning(|_| Ok(None));
    ports
        .campgrounds
        .expect_update_details()
        .withf(|_, details, geometry| details.location == "Boulder, CO" && geometry.is_none())
        .times(1)
        .returning(|_, _, _| Ok(true));
    ports
        .campgrounds
        .expect_append_images()
        .withf(move |_, images| images.len() == 1 && images[0].filename == new_key)
        .times(1)
        .returning(|_, _| Ok(true));

    let mut request = update_request(&campground, &[]);
    request.draft = draft("Boulder, CO");
    request.new_images = vec![upload_by(&author, "new")];
    ports
        .into_service()
        .update(Some(&author), request)
        .await
        .expect("update succeeds");
}

#[rstest]
#[tokio::test]
async fn update_skips_images_already_attached(mut ports: Ports) {
    let author = UserId::random();
    let campground = stored(&author, &["a"], Vec::new());
    let found = campground.clone();
    let attached = campground.images()[0].clone();
    let fresh_key = key(&author, "fresh");
    ports
        .campgrounds
        .expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    ports.geocoder.expect_lookup().never();
    ports
        .campgrounds
        .expect_update_details()
        .returning(|_, _, _| Ok(true));
    ports
        .campgrounds
        .expect_append_images()
        .withf(move |_, images| images.len() == 1 && images[0].filename == fresh_key)
        .times(1)
        .returning(|_, _| Ok(true));

    let mut request = update_request(&campground, &[]);
    request.new_images = vec![
        attached,
        upload_by(&author, "fresh"),
        upload_by(&author, "fresh"),
    ];
    ports
        .into_service()
        .update(Some(&author), request)
        .await
        .expect("update succeeds");
}

#[rstest]
#[tokio::test]
async fn update_refuses_new_images_uploaded_by_someone_else(mut ports: Ports) {
    let author = UserId::random();
    let owner = UserId::random();
    let campground = stored(&author, &[], Vec::new());
    let found = campground.clone();
    ports
        .campgrounds
        .expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    ports.campgrounds.expect_update_details().never();
    ports.campgrounds.expect_append_images().never();

    let mut request = update_request(&campground, &[]);
    request.new_images = vec![upload_by(&owner, "theirs")];
    let err = ports
        .into_service()
        .update(Some(&author), request)
        .await
        .expect_err("foreign image must be refused");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn delete_removes_listed_reviews_before_the_campground(mut ports: Ports) {
    let author = UserId::random();
    let review_ids = vec![ReviewId::random(), ReviewId::random()];
    let campground = stored(&author, &[], review_ids.clone());
    let found = campground.clone();
    let mut seq = Sequence::new();
    ports
        .campgrounds
        .expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    ports
        .reviews
        .expect_delete_many()
        .withf(move |ids| ids == review_ids.as_slice())
        .times(1)
        .in_sequence(&mut seq)
        .returning(|ids| Ok(ids.len() as u64));
    ports
        .campgrounds
        .expect_delete()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(true));

    ports
        .into_service()
        .delete(Some(&author), campground.id())
        .await
        .expect("author may delete");
}

#[rstest]
#[tokio::test]
async fn delete_by_non_author_leaves_everything_in_place(mut ports: Ports) {
    let author = UserId::random();
    let campground = stored(&author, &[], vec![ReviewId::random()]);
    let found = campground.clone();
    ports
        .campgrounds
        .expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    ports.reviews.expect_delete_many().never();
    ports.campgrounds.expect_delete().never();

    let stranger = UserId::random();
    let err = ports
        .into_service()
        .delete(Some(&stranger), campground.id())
        .await
        .expect_err("stranger must be refused");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn repository_outage_surfaces_as_service_unavailable(mut ports: Ports) {
    ports
        .campgrounds
        .expect_list()
        .returning(|| Err(CampgroundPersistenceError::connection("pool timed out")));
    let err = ports.into_service().list().await.expect_err("outage");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn show_joins_reviews_and_author_profiles(mut ports: Ports) {
    use crate::domain::{Rating, Review, ReviewContent};

    let author = User::try_from_strings(&UserId::random().to_string(), "a", "a@x.com")
        .expect("valid user");
    let reviewer = User::try_from_strings(&UserId::random().to_string(), "b", "b@x.com")
        .expect("valid user");
    let review = Review::create(
        *reviewer.id(),
        ReviewContent {
            rating: Rating::new(4).expect("valid rating"),
            body: "nice".to_owned(),
        },
    );
    let campground = stored(author.id(), &[], vec![*review.id()]);
    let found = campground.clone();
    ports
        .campgrounds
        .expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    let stored_review = review.clone();
    ports
        .reviews
        .expect_find_many()
        .returning(move |_| Ok(vec![stored_review.clone()]));
    let profiles = vec![author.clone(), reviewer.clone()];
    ports
        .users
        .expect_find_many()
        .withf(|ids| ids.len() == 2)
        .returning(move |_| Ok(profiles.clone()));

    let view = ports
        .into_service()
        .show(campground.id())
        .await
        .expect("show succeeds");
    assert_eq!(view.author.as_ref(), Some(&author));
    assert_eq!(view.reviews.len(), 1);
    assert_eq!(view.reviews[0].review, review);
    assert_eq!(view.reviews[0].author.as_ref(), Some(&reviewer));
}
