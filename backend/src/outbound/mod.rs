//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: process-local repositories for development and tests
//! - **argon2_hasher**: password hashing
//! - **cloudinary**: hosted image storage
//! - **mapbox**: forward geocoding
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod argon2_hasher;
pub mod cloudinary;
pub mod mapbox;
pub mod memory;
pub mod persistence;
