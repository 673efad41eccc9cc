//! Cross-cutting actix-web middleware.

pub mod trace;

pub use trace::Trace;
