//! Compiled-in node catalog with simulated upstream latency.

use std::time::Duration;

use crate::utility::tracing_targets::TRACING_TARGET_CATALOG;

/// Delay applied before every catalog read.
///
/// Stands in for the latency of a future upstream data fetch.
pub const DEFAULT_NODES_DELAY: Duration = Duration::from_secs(1);

/// Descriptor of one stage in the pipeline palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRecord {
    /// Identifier, unique within the catalog and stable across calls.
    pub id: &'static str,
    /// Human-readable label.
    pub name: &'static str,
}

impl NodeRecord {
    /// Creates a new [`NodeRecord`].
    #[inline]
    pub const fn new(id: &'static str, name: &'static str) -> Self {
        Self { id, name }
    }
}

/// The complete, ordered catalog served by [`NodeCatalog::list_nodes`].
pub const NODE_CATALOG: [NodeRecord; 4] = [
    NodeRecord::new("1", "Data Source"),
    NodeRecord::new("2", "Transformer"),
    NodeRecord::new("3", "Model"),
    NodeRecord::new("4", "Sink"),
];

/// Read-only access to [`NODE_CATALOG`].
///
/// Cheap to copy into every handler; it carries nothing but the delay.
#[must_use = "catalog does nothing unless you use it"]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeCatalog {
    delay: Duration,
}

impl NodeCatalog {
    /// Creates a catalog that waits `delay` before every read.
    #[inline]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Returns the delay applied before every read.
    #[inline]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Returns the catalog records without waiting.
    #[inline]
    pub const fn records(&self) -> &'static [NodeRecord] {
        &NODE_CATALOG
    }

    /// Suspends the current task for the configured delay, then returns the catalog.
    ///
    /// The sleep yields to the runtime, so concurrent callers are not serialized.
    /// Dropping the future before it completes cancels the read; no partial
    /// result is ever produced.
    pub async fn list_nodes(&self) -> &'static [NodeRecord] {
        tracing::debug!(
            target: TRACING_TARGET_CATALOG,
            delay_ms = self.delay.as_millis() as u64,
            "Waiting for simulated upstream latency"
        );

        tokio::time::sleep(self.delay).await;

        let records = self.records();
        tracing::debug!(
            target: TRACING_TARGET_CATALOG,
            count = records.len(),
            "Node catalog read"
        );

        records
    }
}

impl Default for NodeCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_NODES_DELAY)
    }
}
