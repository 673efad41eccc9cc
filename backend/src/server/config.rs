//! Application settings and the assembled server configuration.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Deserializer};
use yelpcamp::inbound::http::session_config::SessionSettings;
use yelpcamp::outbound::cloudinary::{SignatureAlgorithm, UnknownSignatureAlgorithm};
use yelpcamp::outbound::persistence::DbPool;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Accept a credential written as text or as a bare number.
///
/// Cloudinary API keys are all digits, which environment and file layers
/// hand over as integers.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Unsigned(u64),
        Signed(i64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(text) => text,
        Raw::Unsigned(number) => number.to_string(),
        Raw::Signed(number) => number.to_string(),
    }))
}

/// Settings read from `YELPCAMP_*` environment variables, a config file or
/// the command line.
///
/// Every collaborator is optional: without a database URL the server keeps
/// records in memory, and without image host or geocoder credentials it uses
/// the fixture adapters.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "YELPCAMP")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    #[ortho_config(default = 10)]
    pub db_max_connections: u32,
    /// Cloudinary cloud name.
    pub cloudinary_cloud_name: Option<String>,
    /// Cloudinary API key.
    #[serde(default, deserialize_with = "string_or_number")]
    pub cloudinary_key: Option<String>,
    /// Cloudinary API secret.
    #[serde(default, deserialize_with = "string_or_number")]
    pub cloudinary_secret: Option<String>,
    /// Digest Cloudinary expects on signed requests: `sha1` or `sha256`.
    pub cloudinary_signature_algorithm: Option<String>,
    /// Mapbox access token for forward geocoding.
    pub mapbox_token: Option<String>,
    /// Timeout applied to image host and geocoder requests, in seconds.
    #[ortho_config(default = 10)]
    pub outbound_timeout_secs: u64,
}

impl AppSettings {
    /// Parsed bind address, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
    }

    pub const fn outbound_timeout(&self) -> Duration {
        Duration::from_secs(self.outbound_timeout_secs)
    }

    pub const fn db_max_connections(&self) -> u32 {
        self.db_max_connections
    }

    /// Cloudinary credentials when all three parts are present.
    pub fn cloudinary(&self) -> Option<(&str, &str, &str)> {
        match (
            self.cloudinary_cloud_name.as_deref(),
            self.cloudinary_key.as_deref(),
            self.cloudinary_secret.as_deref(),
        ) {
            (Some(cloud), Some(key), Some(secret)) => Some((cloud, key, secret)),
            _ => None,
        }
    }

    /// Cloudinary signature digest, defaulting to SHA-1.
    pub fn cloudinary_signature_algorithm(
        &self,
    ) -> Result<SignatureAlgorithm, UnknownSignatureAlgorithm> {
        self.cloudinary_signature_algorithm
            .as_deref()
            .map_or(Ok(SignatureAlgorithm::default()), str::parse)
    }
}

/// Everything the HTTP server needs once start-up checks have passed.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) settings: AppSettings,
}

impl ServerConfig {
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr, settings: AppSettings) -> Self {
        Self {
            session,
            bind_addr,
            db_pool: None,
            settings,
        }
    }

    /// Back the stores with PostgreSQL instead of memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
