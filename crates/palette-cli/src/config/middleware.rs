//! HTTP middleware settings for the palette server.
//!
//! Groups the browser-facing CORS policy, the optional API documentation
//! routes and the request timeout under one set of flags.
//!
//! ```bash
//! palette --cors-origins "https://editor.example.com" --openapi-enabled --request-timeout 60
//! ```

use anyhow::Context;
use clap::Args;
use palette_server::middleware::{CorsConfig, OpenApiConfig, RecoveryConfig};
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// Settings applied around the node palette routes.
#[derive(Debug, Clone, Default, Args, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// Origins the pipeline editor may call the API from.
    #[clap(flatten)]
    pub cors: CorsConfig,

    /// Documentation routes, off unless explicitly enabled.
    #[clap(flatten)]
    pub openapi: OpenApiConfig,

    /// Request timeout enforced in front of every handler.
    #[clap(flatten)]
    pub recovery: RecoveryConfig,
}

impl MiddlewareConfig {
    /// Checks every value that is turned into a layer or route at startup.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.cors.validate().context("invalid CORS configuration")?;
        self.openapi
            .validate()
            .context("invalid OpenAPI configuration")?;
        self.recovery
            .validate()
            .context("invalid recovery configuration")?;

        Ok(())
    }

    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            origins = ?self.cors.allowed_origins,
            credentials = self.cors.allow_credentials,
            max_age_secs = self.cors.max_age_seconds,
            "CORS configuration"
        );

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            enabled = self.openapi.enabled,
            openapi_path = %self.openapi.open_api_json,
            scalar_path = %self.openapi.scalar_ui,
            "OpenAPI configuration"
        );

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            request_timeout_secs = self.recovery.request_timeout,
            "Recovery configuration"
        );
    }
}
