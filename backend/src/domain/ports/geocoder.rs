//! Port for forward geocoding of free-text locations.

use async_trait::async_trait;

use crate::domain::GeoPoint;

use super::define_port_error;

define_port_error! {
    /// Errors raised by geocoder adapters.
    pub enum GeocoderError {
        /// The provider did not answer within the configured timeout.
        Timeout { message: String } => "geocoder timed out: {message}",
        /// Connection or protocol failure.
        Transport { message: String } => "geocoder request failed: {message}",
        /// The provider answered with an error status.
        Rejected { status: u16 } => "geocoder rejected the request with status {status}",
        /// The provider answered with an unexpected body.
        Decode { message: String } => "geocoder response could not be decoded: {message}",
    }
}

/// Resolve a location to its best-matching point.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// `Ok(None)` when the provider has no match.
    async fn lookup(&self, location: &str) -> Result<Option<GeoPoint>, GeocoderError>;
}

/// Geocoder stand-in used when no provider token is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureGeocoder;

#[async_trait]
impl Geocoder for FixtureGeocoder {
    async fn lookup(&self, _location: &str) -> Result<Option<GeoPoint>, GeocoderError> {
        Ok(None)
    }
}
