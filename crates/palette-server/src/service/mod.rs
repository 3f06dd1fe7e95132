//! Application state and dependency injection.

mod catalog;
mod config;
mod state;

pub use crate::service::catalog::{DEFAULT_NODES_DELAY, NODE_CATALOG, NodeCatalog, NodeRecord};
pub use crate::service::config::{MAX_NODES_DELAY_MS, ServiceConfig};
pub use crate::service::state::ServiceState;
// Re-export error types from crate root for convenience
pub use crate::{Error, Result};
