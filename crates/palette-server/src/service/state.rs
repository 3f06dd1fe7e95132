//! Application state and dependency injection.

use crate::service::{NodeCatalog, Result, ServiceConfig};
use crate::utility::tracing_targets::TRACING_TARGET_SERVICE;

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Debug, Clone, Default)]
pub struct ServiceState {
    node_catalog: NodeCatalog,
}

impl ServiceState {
    /// Initializes application state from configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the configuration is invalid.
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        config.validate()?;

        let service_state = Self {
            node_catalog: config.node_catalog(),
        };

        tracing::debug!(
            target: TRACING_TARGET_SERVICE,
            nodes_delay_ms = config.nodes_delay_ms,
            "Service state initialized"
        );

        Ok(service_state)
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(node_catalog: NodeCatalog);

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::extract::FromRef;

    use super::*;

    #[test]
    fn state_exposes_configured_catalog() -> anyhow::Result<()> {
        let config = ServiceConfig::with_nodes_delay(Duration::from_millis(250));
        let state = ServiceState::from_config(&config)?;

        let catalog = NodeCatalog::from_ref(&state);
        assert_eq!(catalog.delay(), Duration::from_millis(250));
        Ok(())
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = ServiceConfig {
            nodes_delay_ms: u64::MAX,
        };

        assert!(ServiceState::from_config(&config).is_err());
    }
}
