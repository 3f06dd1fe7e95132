//! Middleware for `axum::Router` and HTTP request processing.
//!
//! This module provides middleware for:
//! - Recovery (panics, timeouts, middleware errors)
//! - Observability (request IDs, tracing spans)
//! - Security (CORS, response headers, compression)
//! - OpenAPI documentation
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use palette_server::handler::router;
//! use palette_server::middleware::{
//!     OpenApiConfig, RouterObservabilityExt, RouterRecoveryExt, RouterSecurityExt,
//! };
//! use palette_server::service::ServiceState;
//!
//! let app = router(ServiceState::default(), &OpenApiConfig::default())
//!     .with_default_security()
//!     .with_observability()
//!     .with_default_recovery();
//! ```

mod observability;
mod recovery;
mod security;
mod specification;

pub use observability::{REQUEST_ID_HEADER, RouterObservabilityExt};
pub use recovery::{MAX_REQUEST_TIMEOUT_SECS, RecoveryConfig, RouterRecoveryExt};
pub use security::{CorsConfig, RouterSecurityExt};
pub use specification::{OpenApiConfig, RouterOpenApiExt};
