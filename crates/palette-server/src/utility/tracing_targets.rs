//! Centralized tracing target constants for structured logging.
//!
//! Using consistent targets enables fine-grained control over log output
//! via tracing subscriber filters, e.g. `RUST_LOG=palette_server::catalog=debug`.

/// Node catalog reads, including the simulated upstream latency.
pub const TRACING_TARGET_CATALOG: &str = "palette_server::catalog";

/// Service state assembly and configuration validation.
pub const TRACING_TARGET_SERVICE: &str = "palette_server::service";

/// Error recovery including middleware errors and request timeouts.
pub const TRACING_TARGET_RECOVERY_ERROR: &str = "palette_server::recovery::error";

/// Panic recovery including handler panics.
pub const TRACING_TARGET_RECOVERY_PANIC: &str = "palette_server::recovery::panic";

/// Requests that matched no route or method.
pub const TRACING_TARGET_FALLBACK: &str = "palette_server::fallback";
