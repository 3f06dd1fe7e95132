//! OpenAPI specification middleware with Scalar UI integration.
//!
//! Routes declared through aide's [`ApiRouter`] carry their own
//! documentation. When enabled, the generated specification is served as JSON
//! next to an interactive Scalar reference.
//!
//! # Usage
//!
//! ```rust
//! use aide::axum::ApiRouter;
//! use axum::Router;
//! use palette_server::middleware::{OpenApiConfig, RouterOpenApiExt};
//!
//! let config = OpenApiConfig {
//!     enabled: true,
//!     ..OpenApiConfig::default()
//! };
//!
//! let app: Router<()> = ApiRouter::new().with_open_api(&config);
//! ```
//!
//! [`ApiRouter`]: aide::axum::ApiRouter

use aide::axum::ApiRouter;
use aide::openapi::{Info, License, OpenApi};
use aide::scalar::Scalar;
use axum::routing::{Router, get};
use axum::{Extension, Json};
#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::handler::NODES_PATH;

/// OpenAPI configuration for aide integration.
///
/// Documentation routes are disabled unless `enabled` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct OpenApiConfig {
    /// Serve the OpenAPI specification and Scalar UI.
    #[cfg_attr(
        feature = "config",
        arg(long = "openapi-enabled", env = "OPENAPI_ENABLED")
    )]
    #[serde(default)]
    pub enabled: bool,

    /// Path which exposes the OpenAPI JSON specification.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "openapi-json-path",
            env = "OPENAPI_JSON_PATH",
            default_value = "/api/openapi.json"
        )
    )]
    #[serde(default = "default_open_api_json")]
    pub open_api_json: String,

    /// Path which exposes the Scalar API reference UI.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "openapi-scalar-path",
            env = "OPENAPI_SCALAR_PATH",
            default_value = "/api/scalar"
        )
    )]
    #[serde(default = "default_scalar_ui")]
    pub scalar_ui: String,
}

fn default_open_api_json() -> String {
    "/api/openapi.json".to_owned()
}

fn default_scalar_ui() -> String {
    "/api/scalar".to_owned()
}

impl Default for OpenApiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            open_api_json: default_open_api_json(),
            scalar_ui: default_scalar_ui(),
        }
    }
}

impl OpenApiConfig {
    /// Validates the documentation paths.
    ///
    /// Paths are checked whether or not documentation is enabled.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a path does not start with `/`, if both
    /// paths are equal, or if either collides with the node palette endpoint.
    pub fn validate(&self) -> crate::Result<()> {
        for (name, path) in [("JSON", &self.open_api_json), ("Scalar", &self.scalar_ui)] {
            if !path.starts_with('/') {
                return Err(crate::Error::config(format!(
                    "OpenAPI {name} path {path:?} is invalid. Must start with `/`."
                )));
            }

            if path == NODES_PATH {
                return Err(crate::Error::config(format!(
                    "OpenAPI {name} path {path:?} collides with the node palette endpoint."
                )));
            }
        }

        if self.open_api_json == self.scalar_ui {
            return Err(crate::Error::config(format!(
                "OpenAPI JSON and Scalar paths must differ, both are {:?}.",
                self.scalar_ui
            )));
        }

        Ok(())
    }
}

/// Extension trait for [`ApiRouter`] to add OpenAPI documentation with Scalar UI.
///
/// [`ApiRouter`]: aide::axum::ApiRouter
pub trait RouterOpenApiExt<S> {
    /// Converts into a plain [`Router`], mounting documentation routes when
    /// `config` enables them.
    fn with_open_api(self, config: &OpenApiConfig) -> Router<S>;

    /// Like [`with_open_api`], with custom OpenAPI [`Info`] metadata.
    ///
    /// [`with_open_api`]: RouterOpenApiExt::with_open_api
    /// [`Info`]: aide::openapi::Info
    fn with_open_api_info(self, config: &OpenApiConfig, info: Info) -> Router<S>;
}

impl<S> RouterOpenApiExt<S> for ApiRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_open_api(self, config: &OpenApiConfig) -> Router<S> {
        let info = Info {
            title: "Palette API".to_owned(),
            summary: Some("Pipeline node palette catalog".to_owned()),
            description: Some(
                "Serves the catalog of node types the pipeline editor offers in its \
                palette."
                    .to_owned(),
            ),
            license: Some(License {
                name: "MIT".to_owned(),
                identifier: Some("MIT".to_owned()),
                ..License::default()
            }),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            ..Info::default()
        };

        self.with_open_api_info(config, info)
    }

    fn with_open_api_info(self, config: &OpenApiConfig, info: Info) -> Router<S> {
        async fn serve_openapi(Extension(api): Extension<OpenApi>) -> Json<OpenApi> {
            Json(api)
        }

        if !config.enabled {
            return self.into();
        }

        let mut api = OpenApi {
            info,
            ..OpenApi::default()
        };

        let scalar = Scalar::new(&config.open_api_json);
        let router = self
            .route(&config.scalar_ui, scalar.axum_route())
            .route(&config.open_api_json, get(serve_openapi));

        router.finish_api(&mut api).layer(Extension(api))
    }
}

#[cfg(test)]
mod tests {
    use axum_test::TestServer;

    use super::*;

    fn enabled() -> OpenApiConfig {
        OpenApiConfig {
            enabled: true,
            ..OpenApiConfig::default()
        }
    }

    #[test]
    fn disabled_by_default() {
        let config = OpenApiConfig::default();
        assert!(!config.enabled);
        assert_eq!(config.open_api_json, "/api/openapi.json");
        assert_eq!(config.scalar_ui, "/api/scalar");
    }

    #[test]
    fn missing_paths_deserialize_to_defaults() {
        let config: OpenApiConfig = serde_json::from_str("{}").unwrap();
        assert!(!config.enabled);
        assert_eq!(config.open_api_json, "/api/openapi.json");
        assert_eq!(config.scalar_ui, "/api/scalar");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn reject_relative_path() {
        let config = OpenApiConfig {
            scalar_ui: "docs".to_owned(),
            ..enabled()
        };

        let error = config.validate().unwrap_err();
        assert_eq!(error.kind(), crate::ErrorKind::Config);
    }

    #[test]
    fn reject_colliding_paths() {
        let config = OpenApiConfig {
            open_api_json: NODES_PATH.to_owned(),
            ..enabled()
        };
        assert!(config.validate().is_err());

        let config = OpenApiConfig {
            open_api_json: "/docs".to_owned(),
            scalar_ui: "/docs".to_owned(),
            ..enabled()
        };
        assert!(config.validate().is_err());
    }

    #[tokio::test]
    async fn serves_spec_with_info() -> anyhow::Result<()> {
        let app: Router = ApiRouter::new().with_open_api(&enabled());
        let server = TestServer::new(app)?;

        let response = server.get("/api/openapi.json").await;
        response.assert_status_ok();

        let spec = response.json::<serde_json::Value>();
        assert_eq!(spec["info"]["title"], "Palette API");
        assert_eq!(spec["info"]["version"], env!("CARGO_PKG_VERSION"));

        Ok(())
    }

    #[tokio::test]
    async fn honours_custom_paths() -> anyhow::Result<()> {
        let config = OpenApiConfig {
            open_api_json: "/docs/spec.json".to_owned(),
            scalar_ui: "/docs".to_owned(),
            ..enabled()
        };
        let app: Router = ApiRouter::new().with_open_api(&config);
        let server = TestServer::new(app)?;

        server.get("/docs/spec.json").await.assert_status_ok();
        server.get("/docs").await.assert_status_ok();
        server.get("/api/openapi.json").await.assert_status_not_found();

        Ok(())
    }
}
