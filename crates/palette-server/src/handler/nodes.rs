//! Node palette handlers.
//!
//! The pipeline editor populates its palette from `GET /api/nodes`. The
//! catalog is compiled in; the only variable is the simulated upstream
//! latency configured on [`NodeCatalog`].

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::Json;
use axum::extract::State;

use crate::handler::response::{Node, Nodes};
use crate::service::{NodeCatalog, ServiceState};

/// Tracing target for node palette operations.
const TRACING_TARGET: &str = "palette_server::handler::nodes";

/// Path of the node palette endpoint.
pub const NODES_PATH: &str = "/api/nodes";

/// Lists the pipeline node catalog.
///
/// Waits for the catalog delay without blocking other requests. If the client
/// goes away first, the future is dropped and nothing is produced.
#[tracing::instrument(skip_all)]
async fn list_nodes(State(node_catalog): State<NodeCatalog>) -> Json<Nodes> {
    tracing::debug!(target: TRACING_TARGET, "Listing nodes");

    let records = node_catalog.list_nodes().await;
    let response: Nodes = records.iter().map(Node::from_record).collect();

    tracing::debug!(
        target: TRACING_TARGET,
        count = response.len(),
        "Nodes listed"
    );

    Json(response)
}

fn list_nodes_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List pipeline nodes")
        .description(
            "Returns the fixed, ordered catalog of pipeline node types after a simulated \
            upstream latency.",
        )
        .response::<200, Json<Nodes>>()
}

/// Returns routes for the node palette.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(NODES_PATH, get_with(list_nodes, list_nodes_docs))
        .with_path_items(|item| item.tag("Nodes"))
}
