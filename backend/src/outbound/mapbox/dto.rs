//! DTOs for decoding Mapbox forward-geocoding responses.

use serde::Deserialize;

use crate::domain::GeoPoint;

#[derive(Debug, Deserialize)]
pub(super) struct FeatureCollectionDto {
    #[serde(default)]
    pub(super) features: Vec<FeatureDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct FeatureDto {
    pub(super) geometry: PointDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct PointDto {
    #[serde(rename = "type")]
    pub(super) kind: String,
    /// GeoJSON order: `[longitude, latitude]`.
    pub(super) coordinates: Vec<f64>,
}

impl FeatureCollectionDto {
    /// Best match, if the provider returned one.
    pub(super) fn into_best_point(self) -> Result<Option<GeoPoint>, String> {
        let Some(feature) = self.features.into_iter().next() else {
            return Ok(None);
        };
        let point = feature.geometry;
        if point.kind != "Point" {
            return Err(format!("expected Point geometry, got {}", point.kind));
        }
        match point.coordinates.as_slice() {
            [longitude, latitude, ..] => GeoPoint::new(*longitude, *latitude)
                .map(Some)
                .map_err(|err| err.to_string()),
            _ => Err("point geometry is missing coordinates".to_owned()),
        }
    }
}
