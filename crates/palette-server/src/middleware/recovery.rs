//! Recovery middleware for handling errors, panics, and timeouts.
//!
//! Every failure below this layer is turned into the JSON error envelope, so
//! clients never observe a dropped connection or a plain-text body.

use std::any::Any;
use std::future::ready;
use std::time::Duration;

use axum::Router;
use axum::error_handling::HandleErrorLayer;
use axum::response::{IntoResponse, Response};
#[cfg(feature = "config")]
use clap::Args;
use futures::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower::timeout::TimeoutLayer;
use tower_http::catch_panic::CatchPanicLayer;

use crate::handler::{Error, ErrorKind};
use crate::utility::tracing_targets::{TRACING_TARGET_RECOVERY_ERROR, TRACING_TARGET_RECOVERY_PANIC};

/// Largest accepted request timeout, in seconds.
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;

type ResponseFut = BoxFuture<'static, Response>;
type Panic = Box<dyn Any + Send + 'static>;

/// Configuration for recovery middleware behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct RecoveryConfig {
    /// Maximum duration in seconds to wait for a request to complete before timing out.
    /// Requests exceeding this duration receive a 504 response.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "REQUEST_TIMEOUT", default_value = "30")
    )]
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            request_timeout: default_request_timeout(),
        }
    }
}

impl RecoveryConfig {
    /// Creates a new configuration with the specified request timeout in seconds.
    pub fn with_timeout_secs(secs: u64) -> Self {
        Self {
            request_timeout: secs,
        }
    }

    /// Returns the request timeout as a Duration.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Validates the request timeout.
    ///
    /// # Errors
    ///
    /// Returns a configuration error unless the timeout is between 1 and
    /// [`MAX_REQUEST_TIMEOUT_SECS`] seconds.
    pub fn validate(&self) -> crate::Result<()> {
        if self.request_timeout == 0 || self.request_timeout > MAX_REQUEST_TIMEOUT_SECS {
            return Err(crate::Error::config(format!(
                "Request timeout {} is invalid. Must be between 1 and {} seconds.",
                self.request_timeout, MAX_REQUEST_TIMEOUT_SECS
            )));
        }

        Ok(())
    }
}

/// Extension trait for `axum::`[`Router`] to apply recovery middleware.
pub trait RouterRecoveryExt<S> {
    /// Layers recovery middleware with the provided configuration.
    ///
    /// Timeouts become `504 Gateway Timeout`, handler panics and unknown
    /// middleware errors become `500 Internal Server Error`.
    fn with_recovery(self, config: &RecoveryConfig) -> Self;

    /// Layers recovery middleware with the default 30-second timeout.
    fn with_default_recovery(self) -> Self;
}

impl<S> RouterRecoveryExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_recovery(self, config: &RecoveryConfig) -> Self {
        let middlewares = ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_error))
            .layer(CatchPanicLayer::custom(catch_panic))
            .layer(TimeoutLayer::new(config.request_timeout()));

        self.layer(middlewares)
    }

    fn with_default_recovery(self) -> Self {
        self.with_recovery(&RecoveryConfig::default())
    }
}

fn handle_error(err: tower::BoxError) -> ResponseFut {
    use tower::timeout::error::Elapsed;

    let error = if err.is::<Elapsed>() {
        tracing::error!(
            target: TRACING_TARGET_RECOVERY_ERROR,
            error = %err,
            "Request timeout exceeded"
        );

        ErrorKind::GatewayTimeout
            .with_context("The request took too long to process and was terminated")
    } else {
        tracing::error!(
            target: TRACING_TARGET_RECOVERY_ERROR,
            error = %err,
            "Unknown middleware error"
        );

        ErrorKind::InternalServerError.with_context(err.to_string())
    };

    ready(error.into_response()).boxed()
}

fn catch_panic(err: Panic) -> Response {
    if let Some(error) = err.downcast_ref::<Error<'static>>() {
        tracing::error!(
            target: TRACING_TARGET_RECOVERY_PANIC,
            error = %error,
            "Service panic"
        );
        return error.clone().into_response();
    }

    let message = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic type");

    tracing::error!(
        target: TRACING_TARGET_RECOVERY_PANIC,
        message = %message,
        "Service panic"
    );

    ErrorKind::InternalServerError.into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum_test::TestServer;

    use super::*;
    use crate::ErrorKind as ConfigErrorKind;
    use crate::handler::ErrorResponse;

    async fn slow() -> &'static str {
        tokio::time::sleep(Duration::from_secs(5)).await;
        "too late"
    }

    async fn panics() -> &'static str {
        panic!("handler exploded")
    }

    async fn panics_with_error() -> &'static str {
        std::panic::panic_any(ErrorKind::NotFound.into_error())
    }

    fn test_server() -> anyhow::Result<TestServer> {
        let router = Router::new()
            .route("/slow", get(slow))
            .route("/panic", get(panics))
            .route("/panic-error", get(panics_with_error))
            .with_recovery(&RecoveryConfig::with_timeout_secs(1));

        Ok(TestServer::new(router)?)
    }

    #[test]
    fn default_config_is_valid() {
        let config = RecoveryConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn reject_out_of_range_timeouts() {
        for secs in [0, MAX_REQUEST_TIMEOUT_SECS + 1] {
            let error = RecoveryConfig::with_timeout_secs(secs)
                .validate()
                .unwrap_err();
            assert_eq!(error.kind(), ConfigErrorKind::Config);
        }
    }

    #[tokio::test]
    async fn timeout_becomes_gateway_timeout() -> anyhow::Result<()> {
        let server = test_server()?;

        let response = server.get("/slow").await;
        response.assert_status(StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(response.json::<ErrorResponse>().name, "gateway_timeout");

        Ok(())
    }

    #[tokio::test]
    async fn panic_becomes_internal_server_error() -> anyhow::Result<()> {
        let server = test_server()?;

        let response = server.get("/panic").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.json::<ErrorResponse>().name,
            "internal_server_error"
        );

        Ok(())
    }

    #[tokio::test]
    async fn panic_with_error_payload_keeps_its_kind() -> anyhow::Result<()> {
        let server = test_server()?;

        let response = server.get("/panic-error").await;
        response.assert_status_not_found();

        Ok(())
    }
}
