//! Service configuration.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::service::{DEFAULT_NODES_DELAY, NodeCatalog};
use crate::{Error, Result};

/// Upper bound for the simulated catalog latency, in milliseconds.
pub const MAX_NODES_DELAY_MS: u64 = 60_000;

/// Configuration for the services behind the HTTP handlers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct ServiceConfig {
    /// Simulated upstream latency applied before every node catalog read, in milliseconds.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "NODES_DELAY_MS", default_value_t = default_nodes_delay_ms())
    )]
    #[serde(default = "default_nodes_delay_ms")]
    pub nodes_delay_ms: u64,
}

fn default_nodes_delay_ms() -> u64 {
    DEFAULT_NODES_DELAY.as_millis() as u64
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            nodes_delay_ms: default_nodes_delay_ms(),
        }
    }
}

impl ServiceConfig {
    /// Creates a configuration with the given catalog delay.
    ///
    /// Sub-millisecond remainders are rounded up. Delays too large for a
    /// millisecond count saturate and fail [`validate`](Self::validate).
    pub fn with_nodes_delay(delay: Duration) -> Self {
        let mut millis = delay.as_millis();
        if delay.subsec_nanos() % 1_000_000 != 0 {
            millis += 1;
        }

        Self {
            nodes_delay_ms: u64::try_from(millis).unwrap_or(u64::MAX),
        }
    }

    /// Returns the catalog delay as a `Duration`.
    #[must_use]
    pub const fn nodes_delay(&self) -> Duration {
        Duration::from_millis(self.nodes_delay_ms)
    }

    /// Validates all configuration values.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the catalog delay exceeds
    /// [`MAX_NODES_DELAY_MS`].
    pub fn validate(&self) -> Result<()> {
        if self.nodes_delay_ms > MAX_NODES_DELAY_MS {
            return Err(Error::config(format!(
                "Nodes delay {} ms is invalid. Must be at most {} ms.",
                self.nodes_delay_ms, MAX_NODES_DELAY_MS
            )));
        }

        Ok(())
    }

    /// Creates the node catalog described by this configuration.
    pub fn node_catalog(&self) -> NodeCatalog {
        NodeCatalog::new(self.nodes_delay())
    }
}
