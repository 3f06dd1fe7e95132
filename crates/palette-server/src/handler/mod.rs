//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! # Usage Example
//!
//! ```rust
//! use palette_server::handler::router;
//! use palette_server::middleware::OpenApiConfig;
//! use palette_server::service::{ServiceConfig, ServiceState};
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = ServiceConfig::default();
//! let state = ServiceState::from_config(&config)?;
//!
//! let router = router(state, &OpenApiConfig::default());
//! # Ok(())
//! # }
//! ```
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod error;
mod nodes;
mod response;

use aide::axum::ApiRouter;
use axum::Router;
use axum::http::{Method, Uri};
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind};
pub use crate::handler::nodes::NODES_PATH;
pub use crate::handler::response::{ErrorResponse, Node, Nodes};
use crate::middleware::{OpenApiConfig, RouterOpenApiExt};
use crate::service::ServiceState;
use crate::utility::tracing_targets::TRACING_TARGET_FALLBACK;

async fn not_found(uri: Uri) -> Response {
    tracing::debug!(target: TRACING_TARGET_FALLBACK, %uri, "No route matched");
    ErrorKind::NotFound
        .with_context(uri.path().to_owned())
        .into_response()
}

async fn method_not_allowed(method: Method, uri: Uri) -> Response {
    tracing::debug!(
        target: TRACING_TARGET_FALLBACK,
        %method,
        %uri,
        "Method not allowed for route"
    );

    ErrorKind::MethodNotAllowed
        .with_context(format!("{method} {}", uri.path()))
        .into_response()
}

/// Returns an [`ApiRouter`] with all documented routes.
pub fn routes() -> ApiRouter<ServiceState> {
    ApiRouter::new().merge(nodes::routes())
}

/// Returns the complete application [`Router`] bound to `state`.
///
/// Unmatched paths and methods produce the JSON error envelope. OpenAPI
/// routes are mounted only when `openapi` enables them.
pub fn router(state: ServiceState, openapi: &OpenApiConfig) -> Router {
    routes()
        .with_open_api(openapi)
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test {
    use axum_test::TestServer;

    use crate::handler::router;
    use crate::middleware::OpenApiConfig;
    use crate::service::{ServiceConfig, ServiceState};

    /// Returns a new [`TestServer`] with the default router and the given state.
    pub fn create_test_server_with_state(state: ServiceState) -> anyhow::Result<TestServer> {
        let app = router(state, &OpenApiConfig::default());
        let server = TestServer::new(app)?;
        Ok(server)
    }

    /// Returns a new [`TestServer`] with the default router and state.
    pub fn create_test_server() -> anyhow::Result<TestServer> {
        let config = ServiceConfig::default();
        let state = ServiceState::from_config(&config)?;
        create_test_server_with_state(state)
    }

    #[tokio::test]
    async fn handlers() -> anyhow::Result<()> {
        let server = create_test_server()?;
        assert!(server.is_running());
        Ok(())
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let response = server.get("/api/unknown").await;
        response.assert_status_not_found();
        response.assert_json(&serde_json::json!({
            "name": "not_found",
            "message": "Resource not found.",
        }));

        Ok(())
    }

    #[tokio::test]
    async fn openapi_routes_are_hidden_by_default() -> anyhow::Result<()> {
        let server = create_test_server()?;

        server.get("/api/openapi.json").await.assert_status_not_found();
        server.get("/api/scalar").await.assert_status_not_found();

        Ok(())
    }

    #[tokio::test]
    async fn openapi_routes_are_served_when_enabled() -> anyhow::Result<()> {
        let config = OpenApiConfig {
            enabled: true,
            ..OpenApiConfig::default()
        };
        let server = TestServer::new(router(ServiceState::default(), &config))?;

        let response = server.get("/api/openapi.json").await;
        response.assert_status_ok();

        let spec = response.json::<serde_json::Value>();
        assert!(spec["paths"]["/api/nodes"]["get"].is_object());

        server.get("/api/scalar").await.assert_status_ok();

        Ok(())
    }
}
