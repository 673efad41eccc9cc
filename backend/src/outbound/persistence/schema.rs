//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// Registered accounts.
    ///
    /// `username` and `email` carry unique constraints named
    /// `users_username_key` and `users_email_key`.
    users (id) {
        id -> Uuid,
        /// Case-sensitive login name (max 32 characters).
        username -> Varchar,
        /// Lower-cased email address.
        email -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Reviews; linked from `campgrounds.review_ids`.
    reviews (id) {
        id -> Uuid,
        author_id -> Uuid,
        /// Star rating constrained to 1..=5.
        rating -> Int2,
        body -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Campground listings.
    campgrounds (id) {
        id -> Uuid,
        author_id -> Uuid,
        title -> Text,
        description -> Text,
        price -> Float8,
        location -> Text,
        /// Set together with `latitude`, or both null when geocoding failed.
        longitude -> Nullable<Float8>,
        latitude -> Nullable<Float8>,
        /// JSON array of `{ "url", "filename" }` objects.
        images -> Jsonb,
        /// Linked review ids in insertion order.
        review_ids -> Array<Uuid>,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(campgrounds -> users (author_id));
diesel::joinable!(reviews -> users (author_id));

diesel::allow_tables_to_appear_in_same_query!(campgrounds, reviews, users);
