//! CLI configuration management.
//!
//! This module defines the complete CLI configuration hierarchy:
//!
//! ```text
//! Cli
//! ├── server: ServerConfig          # Host, port, shutdown
//! ├── middleware: MiddlewareConfig  # CORS, OpenAPI, recovery/timeouts
//! ├── service: ServiceConfig        # Node catalog delay
//! └── telemetry: TelemetryConfig    # Log format
//! ```
//!
//! All configuration can be provided via CLI arguments or environment variables.
//! Use `--help` to see all available options.

mod middleware;
mod server;
mod telemetry;

use std::process;

use anyhow::{Context, bail};
use clap::Parser;
pub use middleware::MiddlewareConfig;
use palette_server::service::ServiceConfig;
use serde::{Deserialize, Serialize};
pub use server::ServerConfig;
pub use telemetry::{LogFormat, TelemetryConfig};

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_SERVER_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "palette")]
#[command(about = "Pipeline node palette server")]
#[command(version)]
pub struct Cli {
    /// Server network and lifecycle configuration.
    #[clap(flatten)]
    pub server: ServerConfig,

    /// HTTP middleware configuration (CORS, OpenAPI, timeouts).
    #[clap(flatten)]
    pub middleware: MiddlewareConfig,

    /// Service configuration (node catalog).
    #[clap(flatten)]
    pub service: ServiceConfig,

    /// Log output configuration.
    #[clap(flatten)]
    pub telemetry: TelemetryConfig,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// The .env file is loaded first so that clap's `env` lookups can see it.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Validates all configuration values.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid group, or when the node
    /// catalog delay would not fit within the request timeout.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.server
            .validate()
            .context("invalid server configuration")?;
        self.middleware.validate()?;
        self.service
            .validate()
            .context("invalid service configuration")?;

        let nodes_delay = self.service.nodes_delay();
        let request_timeout = self.middleware.recovery.request_timeout();
        if nodes_delay >= request_timeout {
            bail!(
                "Nodes delay of {} ms must be shorter than the request timeout of {} s.",
                nodes_delay.as_millis(),
                request_timeout.as_secs()
            );
        }

        Ok(())
    }

    /// Logs configuration (no sensitive information).
    pub fn log(&self) {
        Self::log_build_info();
        self.server.log();
        self.middleware.log();

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            nodes_delay_ms = self.service.nodes_delay_ms,
            log_format = self.telemetry.log_format.as_str(),
            "Service configuration"
        );
    }

    fn log_build_info() {
        tracing::debug!(
            target: TRACING_TARGET_SERVER_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );
    }

    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};
    use std::time::Duration;

    use clap::CommandFactory;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let args = std::iter::once("palette").chain(args.iter().copied());
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn explicit_flags_are_parsed() {
        let cli = parse(&[
            "--host",
            "127.0.0.1",
            "-p",
            "9000",
            "--shutdown-timeout",
            "5",
            "--request-timeout",
            "10",
            "--nodes-delay-ms",
            "250",
            "--cors-origins",
            "https://a.example.com,https://b.example.com",
            "--cors-max-age",
            "60",
            "--openapi-enabled",
            "--log-format",
            "json",
        ]);

        assert_eq!(cli.server.host, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(cli.server.port, 9000);
        assert_eq!(cli.server.shutdown_timeout(), Duration::from_secs(5));
        assert_eq!(cli.middleware.recovery.request_timeout, 10);
        assert_eq!(cli.service.nodes_delay(), Duration::from_millis(250));
        assert_eq!(cli.middleware.cors.allowed_origins.len(), 2);
        assert_eq!(cli.middleware.cors.max_age_seconds, 60);
        assert!(cli.middleware.openapi.enabled);
        assert_eq!(cli.telemetry.log_format, LogFormat::Json);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn reject_delay_longer_than_request_timeout() {
        let cli = parse(&["--request-timeout", "1", "--nodes-delay-ms", "1000"]);

        let error = cli.validate().unwrap_err();
        assert!(error.to_string().contains("request timeout"));
    }

    #[test]
    fn reject_wildcard_cors_origin() {
        let cli = parse(&["--cors-origins", "*"]);

        let error = cli.validate().unwrap_err();
        assert!(format!("{error:#}").contains("invalid CORS configuration"));
    }

    #[test]
    fn reject_unroutable_openapi_paths() {
        let cli = parse(&["--openapi-enabled", "--openapi-scalar-path", "docs"]);
        let error = cli.validate().unwrap_err();
        assert!(format!("{error:#}").contains("invalid OpenAPI configuration"));

        let cli = parse(&["--openapi-enabled", "--openapi-json-path", "/api/nodes"]);
        assert!(cli.validate().is_err());

        let cli = parse(&[
            "--openapi-json-path",
            "/docs",
            "--openapi-scalar-path",
            "/docs",
        ]);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn reject_invalid_groups() {
        let cli = parse(&["--port", "80"]);
        assert!(cli.validate().is_err());

        let cli = parse(&["--request-timeout", "0"]);
        assert!(cli.validate().is_err());

        let cli = parse(&["--nodes-delay-ms", "60001", "--request-timeout", "120"]);
        assert!(cli.validate().is_err());
    }
}
