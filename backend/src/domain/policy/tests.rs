//! Behaviour coverage for the ownership guard.

use super::*;
use crate::domain::{
    CampgroundDraft, ErrorCode, Rating, ReviewContent, validate_campground,
};
use rstest::{fixture, rstest};
use rstest_bdd_macros::{given, then, when};
use serde_json::json;

#[derive(Debug, Clone)]
struct Actors {
    author: UserId,
    stranger: UserId,
}

#[fixture]
fn actors() -> Actors {
    Actors {
        author: UserId::random(),
        stranger: UserId::random(),
    }
}

fn campground_by(author: &UserId) -> Campground {
    let details = validate_campground(&CampgroundDraft {
        title: Some("Pine Ridge".to_owned()),
        description: Some("quiet".to_owned()),
        price: Some(json!(15)),
        location: Some("Denver, CO".to_owned()),
    })
    .expect("fixture draft is valid");
    Campground::create(*author, details, None, Vec::new())
}

fn review_by(author: &UserId) -> Review {
    Review::create(
        *author,
        ReviewContent {
            rating: Rating::new(4).expect("valid rating"),
            body: "nice".to_owned(),
        },
    )
}

#[rstest]
fn predicates_hold_only_for_the_author(actors: Actors) {
    let campground = campground_by(&actors.author);
    let review = review_by(&actors.author);

    assert!(can_mutate_campground(&actors.author, &campground));
    assert!(!can_mutate_campground(&actors.stranger, &campground));
    assert!(can_mutate_review(&actors.author, &review));
    assert!(!can_mutate_review(&actors.stranger, &review));
}

#[rstest]
fn anonymous_actor_is_refused_before_existence_is_checked() {
    let missing: Option<Campground> = None;
    assert_eq!(
        authorize_mutation(None, missing),
        Err(PolicyDenial::Unauthenticated)
    );
}

#[rstest]
fn missing_record_is_not_found_rather_than_forbidden(actors: Actors) {
    let missing: Option<Campground> = None;
    assert_eq!(
        authorize_mutation(Some(&actors.stranger), missing),
        Err(PolicyDenial::NotFound { kind: "campground" })
    );
}

#[rstest]
#[case(PolicyDenial::Unauthenticated, ErrorCode::Unauthorized, SIGN_IN_REQUIRED_MESSAGE)]
#[case(
    PolicyDenial::NotFound { kind: "campground" },
    ErrorCode::NotFound,
    "Cannot find that campground!"
)]
#[case(
    PolicyDenial::NotAuthor { kind: "review" },
    ErrorCode::Forbidden,
    NOT_AUTHOR_MESSAGE
)]
fn denials_map_to_distinct_error_codes(
    #[case] denial: PolicyDenial,
    #[case] code: ErrorCode,
    #[case] message: &str,
) {
    let error = Error::from(denial);
    assert_eq!(error.code(), code);
    assert_eq!(error.message(), message);
}

#[given("a review written by its author")]
fn a_review_written_by_its_author(actors: Actors) -> Review {
    review_by(&actors.author)
}

#[when("another camper tries to delete it")]
fn another_camper_tries_to_delete_it(
    actors: Actors,
    review: Review,
) -> Result<Review, PolicyDenial> {
    authorize_mutation(Some(&actors.stranger), Some(review))
}

#[when("the author deletes it")]
fn the_author_deletes_it(actors: Actors, review: Review) -> Result<Review, PolicyDenial> {
    authorize_mutation(Some(&actors.author), Some(review))
}

#[then("the mutation is refused as not theirs")]
fn the_mutation_is_refused(outcome: Result<Review, PolicyDenial>) {
    assert_eq!(
        outcome.err(),
        Some(PolicyDenial::NotAuthor { kind: "review" })
    );
}

#[then("the record is released to the caller")]
fn the_record_is_released(outcome: Result<Review, PolicyDenial>, expected: Review) {
    assert_eq!(outcome.ok(), Some(expected));
}

#[rstest]
fn stranger_cannot_delete_someone_elses_review(actors: Actors) {
    let review = a_review_written_by_its_author(actors.clone());
    let outcome = another_camper_tries_to_delete_it(actors, review);
    the_mutation_is_refused(outcome);
}

#[rstest]
fn author_may_delete_their_review(actors: Actors) {
    let review = a_review_written_by_its_author(actors.clone());
    let outcome = the_author_deletes_it(actors, review.clone());
    the_record_is_released(outcome, review);
}

#[rstest]
fn guard_releases_campgrounds_to_their_author(actors: Actors) {
    let campground = campground_by(&actors.author);
    let released = authorize_mutation(Some(&actors.author), Some(campground.clone()))
        .expect("author may mutate");
    assert_eq!(released, campground);
    assert_eq!(
        authorize_mutation(Some(&actors.stranger), Some(campground)),
        Err(PolicyDenial::NotAuthor { kind: "campground" })
    );
}

#[rstest]
fn authored_records_defer_to_the_ownership_predicates(actors: Actors) {
    let campground = campground_by(&actors.author);
    let review = review_by(&actors.author);
    for actor in [&actors.author, &actors.stranger] {
        assert_eq!(
            campground.can_be_mutated_by(actor),
            can_mutate_campground(actor, &campground)
        );
        assert_eq!(
            review.can_be_mutated_by(actor),
            can_mutate_review(actor, &review)
        );
        assert_eq!(
            authorize_mutation(Some(actor), Some(review.clone())).is_ok(),
            can_mutate_review(actor, &review)
        );
    }
}

fn upload_by(owner: &UserId, name: &str) -> ImageRef {
    let key = format!("{}/{name}", ImageRef::upload_folder(owner));
    ImageRef::new(format!("https://host/image/upload/v1/{key}.jpg"), key)
}

#[rstest]
fn campers_attach_only_their_own_uploads(actors: Actors) {
    let own = upload_by(&actors.author, "tent");
    let foreign = upload_by(&actors.stranger, "lake");

    assert!(can_attach_image(&actors.author, &own));
    assert!(!can_attach_image(&actors.author, &foreign));
    assert_eq!(authorize_images(&actors.author, &[]), Ok(()));
    assert_eq!(authorize_images(&actors.author, &[own.clone()]), Ok(()));
    assert_eq!(
        authorize_images(&actors.author, &[own, foreign]),
        Err(PolicyDenial::NotAuthor { kind: "image" })
    );
}
