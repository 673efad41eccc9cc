//! Behaviour tests for campground ownership and cascade deletion.
//!
//! Scenarios drive the domain services over the in-memory stores, so they
//! exercise the ownership policy and the review cascade without a database.
//
// rstest-bdd generates guard variables with double underscores, which trips
// the non_snake_case lint under -D warnings.
#![allow(non_snake_case)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::{Value, json};
use zeroize::Zeroizing;

use yelpcamp::domain::ports::{
    CampgroundCommand, CampgroundQuery, CreateCampgroundRequest, CredentialHasher,
    CredentialHasherError, FixtureGeocoder, FixtureImageStore, LoginService,
    RegistrationService, ReviewCommand, ReviewRepository, UpdateCampgroundRequest,
};
use yelpcamp::domain::{
    CampgroundDraft, CampgroundId, CampgroundService, CredentialHash, Error, ErrorCode,
    IdentityService, LoginCredentials, RegistrationDraft, ReviewDraft, ReviewId, ReviewService,
    UserId,
};
use yelpcamp::outbound::memory::{
    InMemoryCampgroundRepository, InMemoryReviewRepository, InMemoryUserRepository,
};

/// Keeps scenarios fast; the Argon2 adapter has its own tests.
struct PlainHasher;

impl CredentialHasher for PlainHasher {
    fn hash(&self, password: &str) -> Result<CredentialHash, CredentialHasherError> {
        CredentialHash::new(format!("plain${password}"))
            .map_err(|err| CredentialHasherError::hash(err.to_string()))
    }

    fn verify(&self, password: &str, hash: &CredentialHash) -> Result<bool, CredentialHasherError> {
        Ok(hash.as_str() == format!("plain${password}"))
    }

    fn verify_dummy(&self, _password: &str) {}
}

type Campgrounds =
    CampgroundService<InMemoryCampgroundRepository, InMemoryReviewRepository, InMemoryUserRepository>;

struct LifecycleWorld {
    runtime: tokio::runtime::Runtime,
    identity: Arc<IdentityService<InMemoryUserRepository>>,
    campgrounds: Arc<Campgrounds>,
    reviews: Arc<ReviewService<InMemoryCampgroundRepository, InMemoryReviewRepository>>,
    review_store: Arc<InMemoryReviewRepository>,
    users: RefCell<HashMap<String, UserId>>,
    campground: RefCell<Option<CampgroundId>>,
    review: RefCell<Option<ReviewId>>,
    last_error: RefCell<Option<Error>>,
}

impl LifecycleWorld {
    fn new() -> Self {
        let users = Arc::new(InMemoryUserRepository::default());
        let campground_store = Arc::new(InMemoryCampgroundRepository::default());
        let review_store = Arc::new(InMemoryReviewRepository::default());
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("test runtime");
        Self {
            runtime,
            identity: Arc::new(IdentityService::new(users.clone(), Arc::new(PlainHasher))),
            campgrounds: Arc::new(CampgroundService::new(
                campground_store.clone(),
                review_store.clone(),
                users,
                Arc::new(FixtureGeocoder),
                Arc::new(FixtureImageStore),
            )),
            reviews: Arc::new(ReviewService::new(campground_store, review_store.clone())),
            review_store,
            users: RefCell::new(HashMap::new()),
            campground: RefCell::new(None),
            review: RefCell::new(None),
            last_error: RefCell::new(None),
        }
    }

    fn user(&self, name: &str) -> UserId {
        self.users
            .borrow()
            .get(name)
            .cloned()
            .unwrap_or_else(|| panic!("user {name} is registered"))
    }

    fn campground_id(&self) -> CampgroundId {
        self.campground.borrow().expect("a campground was created")
    }

    fn record<T>(&self, outcome: Result<T, Error>) -> Option<T> {
        match outcome {
            Ok(value) => {
                self.last_error.replace(None);
                Some(value)
            }
            Err(error) => {
                self.last_error.replace(Some(error));
                None
            }
        }
    }

    fn register(&self, username: &str, email: &str) -> Result<UserId, Error> {
        let draft = RegistrationDraft {
            email: email.to_owned(),
            username: username.to_owned(),
            password: Zeroizing::new(format!("{username}-pw")),
        };
        self.runtime
            .block_on(self.identity.register(draft))
            .map(|user| *user.id())
    }

    fn rename(&self, actor: &UserId, title: &str) -> Result<(), Error> {
        let request = UpdateCampgroundRequest {
            id: self.campground_id(),
            draft: pine_ridge_draft(title),
            new_images: Vec::new(),
            delete_images: Vec::new(),
        };
        self.runtime
            .block_on(self.campgrounds.update(Some(actor), request))
            .map(drop)
    }

    fn delete_as(&self, name: &str) {
        let actor = self.user(name);
        let outcome = self
            .runtime
            .block_on(self.campgrounds.delete(Some(&actor), &self.campground_id()));
        self.record(outcome);
    }

    fn review_with(&self, actor: &UserId, rating: Value) -> Result<ReviewId, Error> {
        let draft = ReviewDraft {
            rating: Some(rating),
            body: Some("Lovely pitches".to_owned()),
        };
        self.runtime
            .block_on(self.reviews.create(Some(actor), &self.campground_id(), draft))
            .map(|review| *review.id())
    }

    fn error_code(&self) -> ErrorCode {
        self.last_error
            .borrow()
            .as_ref()
            .map(Error::code)
            .expect("the last operation failed")
    }
}

fn pine_ridge_draft(title: &str) -> CampgroundDraft {
    CampgroundDraft {
        title: Some(title.to_owned()),
        description: Some("Quiet sites under tall pines.".to_owned()),
        price: Some(json!(15)),
        location: Some("Denver, CO".to_owned()),
    }
}

#[fixture]
fn world() -> LifecycleWorld {
    LifecycleWorld::new()
}

#[given("user {name} is registered")]
fn user_is_registered(world: &LifecycleWorld, name: String) {
    let id = world
        .register(&name, &format!("{name}@x.com"))
        .expect("registration succeeds");
    world.users.borrow_mut().insert(name, id);
}

#[when("user {name} creates the Pine Ridge campground")]
fn user_creates_pine_ridge(world: &LifecycleWorld, name: String) {
    let actor = world.user(&name);
    let request = CreateCampgroundRequest {
        draft: pine_ridge_draft("Pine Ridge"),
        images: Vec::new(),
    };
    let created = world
        .runtime
        .block_on(world.campgrounds.create(Some(&actor), request))
        .expect("creation succeeds");
    world.campground.replace(Some(*created.id()));
}

#[when("an anonymous visitor creates a campground")]
fn anonymous_creates(world: &LifecycleWorld) {
    let request = CreateCampgroundRequest {
        draft: pine_ridge_draft("Pine Ridge"),
        images: Vec::new(),
    };
    let outcome = world.runtime.block_on(world.campgrounds.create(None, request));
    world.record(outcome);
}

#[when("user {name} reviews the campground with rating {rating}")]
fn user_reviews(world: &LifecycleWorld, name: String, rating: u8) {
    let id = world
        .review_with(&world.user(&name), json!(rating))
        .expect("review succeeds");
    world.review.replace(Some(id));
}

#[when("user {name} attempts to delete the campground")]
fn user_attempts_delete(world: &LifecycleWorld, name: String) {
    world.delete_as(&name);
}

#[when("user {name} deletes the campground")]
fn user_deletes(world: &LifecycleWorld, name: String) {
    world.delete_as(&name);
    assert!(world.last_error.borrow().is_none(), "author delete succeeds");
}

#[when("user {name} renames the campground to {title}")]
fn user_renames(world: &LifecycleWorld, name: String, title: String) {
    let actor = world.user(&name);
    let outcome = world.rename(&actor, &title);
    world.record(outcome);
}

#[when("another account registers with username {name}")]
fn another_account_registers(world: &LifecycleWorld, name: String) {
    let outcome = world.register(&name, "someone-else@x.com");
    world.record(outcome);
}

#[then("the campground is shown with author {name} and price {price}")]
fn campground_is_shown(world: &LifecycleWorld, name: String, price: f64) {
    let view = world
        .runtime
        .block_on(world.campgrounds.show(&world.campground_id()))
        .expect("campground exists");
    assert_eq!(view.campground.author(), &world.user(&name));
    assert_eq!(view.campground.details().price.amount(), price);
    assert_eq!(
        view.author.map(|user| user.username().to_string()),
        Some(name)
    );
}

#[then("the campground lists {count} review")]
fn campground_lists_reviews(world: &LifecycleWorld, count: usize) {
    let view = world
        .runtime
        .block_on(world.campgrounds.show(&world.campground_id()))
        .expect("campground exists");
    assert_eq!(view.campground.reviews().len(), count);
    assert_eq!(view.reviews.len(), count);
}

#[then("the campground title is {title}")]
fn campground_title_is(world: &LifecycleWorld, title: String) {
    let view = world
        .runtime
        .block_on(world.campgrounds.show(&world.campground_id()))
        .expect("campground exists");
    assert_eq!(view.campground.title(), title);
}

#[then("the campground is not found")]
fn campground_is_not_found(world: &LifecycleWorld) {
    let error = world
        .runtime
        .block_on(world.campgrounds.show(&world.campground_id()))
        .expect_err("campground was deleted");
    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), "Cannot find that campground!");
}

#[then("the review is gone")]
fn review_is_gone(world: &LifecycleWorld) {
    let id = world.review.borrow().expect("a review was written");
    let found = world
        .runtime
        .block_on(world.review_store.find_by_id(&id))
        .expect("lookup succeeds");
    assert!(found.is_none());
}

#[then("the last operation is refused as forbidden")]
fn refused_forbidden(world: &LifecycleWorld) {
    assert_eq!(world.error_code(), ErrorCode::Forbidden);
}

#[then("the last operation is refused as not found")]
fn refused_not_found(world: &LifecycleWorld) {
    assert_eq!(world.error_code(), ErrorCode::NotFound);
}

#[then("the last operation is refused as unauthenticated")]
fn refused_unauthenticated(world: &LifecycleWorld) {
    assert_eq!(world.error_code(), ErrorCode::Unauthorized);
}

#[then("the last operation is refused as invalid")]
fn refused_invalid(world: &LifecycleWorld) {
    assert_eq!(world.error_code(), ErrorCode::InvalidRequest);
}

#[then("user {name} can still log in")]
fn user_can_still_log_in(world: &LifecycleWorld, name: String) {
    let password = Zeroizing::new(format!("{name}-pw"));
    let credentials =
        LoginCredentials::try_from_parts(&name, &password).expect("credentials are well formed");
    let id = world
        .runtime
        .block_on(world.identity.authenticate(&credentials))
        .expect("login succeeds");
    assert_eq!(id, world.user(&name));
}

#[then("a review rated {rating} is rejected")]
fn review_rated_is_rejected(world: &LifecycleWorld, rating: String) {
    let value: Value = serde_json::from_str(&rating).expect("rating literal is JSON");
    let author = world.user("a");
    let error = world
        .review_with(&author, value)
        .expect_err("rating is rejected");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[then("a review rated {rating} is accepted")]
fn review_rated_is_accepted(world: &LifecycleWorld, rating: String) {
    let value: Value = serde_json::from_str(&rating).expect("rating literal is JSON");
    let author = world.user("a");
    world
        .review_with(&author, value)
        .expect("rating is accepted");
}

#[scenario(path = "tests/features/campground_lifecycle.feature")]
fn campground_lifecycle_scenarios(world: LifecycleWorld) {
    drop(world);
}
