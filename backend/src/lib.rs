//! YelpCamp backend library: domain, adapters and HTTP surface.
//!
//! The crate follows a hexagonal layout. `domain` owns entities, the
//! ownership policy and use-case services; `outbound` implements the driven
//! ports (PostgreSQL, in-memory stores, image host, geocoder, hasher);
//! `inbound::http` exposes the driving ports over actix-web.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
