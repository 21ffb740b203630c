//! Mention edges: entity extraction contract and the rebuild engine that
//! keeps derived `MENTIONS` edges consistent with node text content.

mod extractor;
mod rebuild;

pub use extractor::{EntityExtractor, SubstringExtractor};
pub use rebuild::{
    entity_catalog, rebuild_all_mentions, rebuild_mentions_for_node, remove_mentions_from_node,
    remove_mentions_to_entity,
};

use serde::{Deserialize, Serialize};

use crate::graph::Node;
use crate::schema::NodeType;

/// Extraction-friendly view of a node that can be referred to by name.
///
/// Only Character, Location, and Object nodes are referable; other node
/// types contain references but are not themselves mention targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityInfo {
    pub id: String,
    pub node_type: NodeType,
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl EntityInfo {
    /// Flatten a referable node. Returns `None` for non-referable node types
    /// and for nodes without a usable (non-blank) name.
    pub fn from_node(node: &Node) -> Option<EntityInfo> {
        let (id, name, aliases) = match node {
            Node::Character { id, name, aliases, .. }
            | Node::Location { id, name, aliases, .. }
            | Node::Object { id, name, aliases, .. } => (id, name, aliases),
            _ => return None,
        };
        if name.trim().is_empty() {
            return None;
        }
        Some(EntityInfo {
            id: id.clone(),
            node_type: node.node_type(),
            name: name.clone(),
            aliases: aliases.clone(),
        })
    }
}

/// A candidate entity reference found in a text field.
#[derive(Debug, Clone, PartialEq)]
pub struct Mention {
    pub entity_id: String,
    /// Confidence in [0, 1].
    pub confidence: f64,
    /// The text as it appeared in the source.
    pub matched_text: String,
}

/// Aggregate result of a rebuild operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RebuildStats {
    pub edges_created: usize,
    pub edges_removed: usize,
    pub nodes_processed: Vec<String>,
}
