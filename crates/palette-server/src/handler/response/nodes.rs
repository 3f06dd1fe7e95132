//! Node palette response types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::service::NodeRecord;

/// One stage of the pipeline node palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Stable node identifier.
    pub id: String,
    /// Display name of the node.
    pub name: String,
}

impl Node {
    /// Creates a response from a catalog record.
    pub fn from_record(record: &NodeRecord) -> Self {
        Self {
            id: record.id.to_owned(),
            name: record.name.to_owned(),
        }
    }
}

/// Ordered list of palette nodes.
pub type Nodes = Vec<Node>;
