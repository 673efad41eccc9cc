//! Process-local repositories.
//!
//! Used when no database URL is configured and by the HTTP integration
//! tests. State lives for the lifetime of the process only.

mod campground_repository;
mod review_repository;
mod user_repository;

pub use campground_repository::InMemoryCampgroundRepository;
pub use review_repository::InMemoryReviewRepository;
pub use user_repository::InMemoryUserRepository;

use std::sync::{Mutex, MutexGuard};

/// Lock `store`, reporting poisoning through the adapter's query error.
fn lock<'a, T, E>(store: &'a Mutex<T>, query_error: fn(String) -> E) -> Result<MutexGuard<'a, T>, E> {
    store
        .lock()
        .map_err(|_| query_error("in-memory store lock poisoned".to_owned()))
}
