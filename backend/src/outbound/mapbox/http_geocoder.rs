//! Reqwest-backed Mapbox geocoder.
//!
//! Only the single best match is requested (`limit=1`). The access token
//! travels in the query string, so transport errors are stripped of their
//! URL before they reach logs.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use zeroize::Zeroizing;

use super::dto::FeatureCollectionDto;
use crate::domain::GeoPoint;
use crate::domain::ports::{Geocoder, GeocoderError};

/// Public Mapbox forward-geocoding endpoint.
pub const DEFAULT_MAPBOX_ENDPOINT: &str = "https://api.mapbox.com/geocoding/v5/mapbox.places/";

/// Geocoder calling the Mapbox forward-geocoding API.
pub struct MapboxGeocoder {
    client: Client,
    endpoint: Url,
    access_token: Zeroizing<String>,
}

impl MapboxGeocoder {
    /// Build a geocoder against `endpoint`, normally [`DEFAULT_MAPBOX_ENDPOINT`].
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        access_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            access_token: Zeroizing::new(access_token.into()),
        })
    }

    fn lookup_url(&self, location: &str) -> Result<Url, GeocoderError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| GeocoderError::transport("geocoder endpoint cannot be a base URL"))?
            .pop_if_empty()
            .push(&format!("{location}.json"));
        url.query_pairs_mut()
            .append_pair("limit", "1")
            .append_pair("access_token", self.access_token.as_str());
        Ok(url)
    }
}

#[async_trait]
impl Geocoder for MapboxGeocoder {
    async fn lookup(&self, location: &str) -> Result<Option<GeoPoint>, GeocoderError> {
        let url = self.lookup_url(location)?;
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(map_status_error(status));
        }
        let body = response.bytes().await.map_err(map_transport_error)?;
        parse_best_point(body.as_ref())
    }
}

fn parse_best_point(body: &[u8]) -> Result<Option<GeoPoint>, GeocoderError> {
    let decoded: FeatureCollectionDto = serde_json::from_slice(body)
        .map_err(|error| GeocoderError::decode(format!("invalid geocoder JSON: {error}")))?;
    decoded.into_best_point().map_err(GeocoderError::decode)
}

fn map_transport_error(error: reqwest::Error) -> GeocoderError {
    let error = error.without_url();
    if error.is_timeout() {
        GeocoderError::timeout(error.to_string())
    } else {
        GeocoderError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode) -> GeocoderError {
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            GeocoderError::timeout(format!("status {}", status.as_u16()))
        }
        _ => GeocoderError::rejected(status.as_u16()),
    }
}
