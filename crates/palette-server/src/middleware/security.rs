//! Security middleware for HTTP request protection.
//!
//! Applies CORS rules for the browser-based pipeline editor, the
//! `X-Content-Type-Options` header, and response compression.

use std::time::Duration;

use axum::Router;
use axum::http::Method;
use axum::http::header::{self, HeaderValue};
#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;

/// Origins allowed when none are configured: the usual local dev servers.
const LOCALHOST_ORIGINS: [&str; 5] = [
    "http://localhost:3000",
    "http://localhost:5173",
    "http://localhost:8080",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:5173",
];

const WILDCARD_ORIGIN: &str = "*";

/// Extension trait for `axum::`[`Router`] to apply security middleware.
pub trait RouterSecurityExt<S> {
    /// Layers security middlewares with the provided CORS configuration.
    fn with_security(self, cors: &CorsConfig) -> Self;

    /// Layers security middlewares with the development CORS configuration.
    fn with_default_security(self) -> Self;
}

impl<S> RouterSecurityExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_security(self, cors: &CorsConfig) -> Self {
        self.layer(CompressionLayer::new())
            .layer(cors.to_layer())
            .layer(SetResponseHeaderLayer::overriding(
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ))
    }

    fn with_default_security(self) -> Self {
        self.with_security(&CorsConfig::default())
    }
}

/// CORS (Cross-Origin Resource Sharing) configuration.
///
/// Controls which origins may read the API from a browser.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct CorsConfig {
    /// List of allowed CORS origins.
    ///
    /// If empty, defaults to localhost origins for development.
    #[cfg_attr(
        feature = "config",
        arg(long = "cors-origins", env = "CORS_ORIGINS", value_delimiter = ',')
    )]
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    /// Maximum age for CORS preflight requests in seconds.
    #[cfg_attr(
        feature = "config",
        arg(long = "cors-max-age", env = "CORS_MAX_AGE", default_value = "3600")
    )]
    #[serde(default = "default_max_age_seconds")]
    pub max_age_seconds: u64,

    /// Whether to allow credentials in CORS requests.
    #[cfg_attr(
        feature = "config",
        arg(long = "cors-allow-credentials", env = "CORS_ALLOW_CREDENTIALS")
    )]
    #[serde(default)]
    pub allow_credentials: bool,
}

fn default_max_age_seconds() -> u64 {
    3600
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            max_age_seconds: default_max_age_seconds(),
            allow_credentials: false,
        }
    }
}

impl CorsConfig {
    /// Returns the CORS max age as a Duration.
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_seconds)
    }

    /// Converts configured origins to HeaderValue list, falling back to localhost for development.
    ///
    /// Origins that are not valid header values, and the `*` wildcard, are skipped.
    pub fn to_header_values(&self) -> Vec<HeaderValue> {
        if self.allowed_origins.is_empty() {
            return LOCALHOST_ORIGINS
                .into_iter()
                .map(HeaderValue::from_static)
                .collect();
        }

        self.allowed_origins
            .iter()
            .filter(|origin| origin.as_str() != WILDCARD_ORIGIN)
            .filter_map(|origin| origin.parse().ok())
            .collect()
    }

    /// Validates the configured origins.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for the `*` wildcard, which cannot be
    /// mixed into an origin list, and for origins that are not valid header values.
    pub fn validate(&self) -> crate::Result<()> {
        for origin in &self.allowed_origins {
            if origin == WILDCARD_ORIGIN {
                return Err(crate::Error::config(
                    "CORS origin `*` is not supported. List each allowed origin explicitly.",
                ));
            }

            if let Err(err) = HeaderValue::from_str(origin) {
                return Err(crate::Error::config(format!(
                    "CORS origin {origin:?} is not a valid header value."
                ))
                .with_source(err));
            }
        }

        Ok(())
    }

    /// Builds the CORS layer for the read-only API surface.
    pub fn to_layer(&self) -> CorsLayer {
        CorsLayer::new()
            .allow_origin(self.to_header_values())
            .allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
            .allow_credentials(self.allow_credentials)
            .max_age(self.max_age())
    }
}
