//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! This module provides concrete implementations of the user, campground and
//! review repository ports backed by PostgreSQL via the Diesel ORM with async
//! support through `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: Repository implementations only translate between
//!   Diesel models and domain types. Cascades and ordering live in the
//!   domain services.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are internal implementation details, never
//!   exposed to the domain layer.
//! - **Strongly typed errors**: All database errors are mapped to domain
//!   persistence error types.
//!
//! # Example
//!
//! ```ignore
//! use yelpcamp::outbound::persistence::{DbPool, PoolConfig, DieselCampgroundRepository};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/yelpcamp")).await?;
//! let campgrounds = DieselCampgroundRepository::new(pool);
//! ```

mod diesel_campground_repository;
mod diesel_review_repository;
mod diesel_user_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_campground_repository::DieselCampgroundRepository;
pub use diesel_review_repository::DieselReviewRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
