//! Graph data model: typed nodes, first-class edges, and the in-memory store.
//!
//! `GraphState` owns the node and edge collections behind accessor and
//! mutator methods, so mutation rights are explicit rather than ambient
//! array access. All operations are synchronous; `&mut` exclusivity is the
//! concurrency model.

pub mod identity;

pub use identity::{
    deterministic_edge_id, deterministic_id_from_key, edge_key, generate_edge_id,
    is_first_class_edge, mention_key, normalize_edge, normalize_edge_at, PartialEdge,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoryGraphError};
use crate::schema::{edge_rule, EdgeType, NodeType};

/// A typed entity in the screenplay graph.
///
/// The variant is the node's type and is immutable after creation; `id` is
/// unique within a graph (enforced by the upstream editing flows that create
/// nodes, not re-checked here).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    Beat {
        id: String,
        title: String,
        #[serde(default)]
        summary: String,
    },
    Scene {
        id: String,
        heading: String,
        #[serde(default)]
        scene_overview: String,
        #[serde(default)]
        key_actions: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        beat_id: Option<String>,
    },
    Character {
        id: String,
        name: String,
        #[serde(default)]
        aliases: Vec<String>,
        #[serde(default)]
        description: String,
    },
    Location {
        id: String,
        name: String,
        #[serde(default)]
        aliases: Vec<String>,
        #[serde(default)]
        description: String,
    },
    Object {
        id: String,
        name: String,
        #[serde(default)]
        aliases: Vec<String>,
        #[serde(default)]
        description: String,
    },
    Arc {
        id: String,
        title: String,
        #[serde(default)]
        description: String,
    },
    Idea {
        id: String,
        title: String,
        #[serde(default)]
        body: String,
    },
}

impl Node {
    pub fn id(&self) -> &str {
        match self {
            Node::Beat { id, .. }
            | Node::Scene { id, .. }
            | Node::Character { id, .. }
            | Node::Location { id, .. }
            | Node::Object { id, .. }
            | Node::Arc { id, .. }
            | Node::Idea { id, .. } => id,
        }
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            Node::Beat { .. } => NodeType::Beat,
            Node::Scene { .. } => NodeType::Scene,
            Node::Character { .. } => NodeType::Character,
            Node::Location { .. } => NodeType::Location,
            Node::Object { .. } => NodeType::Object,
            Node::Arc { .. } => NodeType::Arc,
            Node::Idea { .. } => NodeType::Idea,
        }
    }
}

/// Lifecycle status of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeStatus {
    Proposed,
    Approved,
    Rejected,
}

/// Who or what created an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProvenanceSource {
    Human,
    Extractor,
    Import,
}

/// Edge creation metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    pub source: ProvenanceSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl Provenance {
    pub fn from_source(source: ProvenanceSource) -> Self {
        Self {
            source,
            batch_id: None,
            model: None,
        }
    }
}

/// Optional edge attributes. For mention edges, `field` and `matched_text`
/// record where in the source node the reference was found.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_text: Option<String>,
}

/// A typed, first-class directed relationship between two nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    #[serde(rename = "type")]
    pub edge_type: EdgeType,
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<EdgeProperties>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provenance: Option<Provenance>,
    pub status: EdgeStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// The in-memory graph: an array of nodes and an array of edges, owned
/// behind methods. One mutator at a time (`&mut`), no internal locking.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphState {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl GraphState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_nodes(nodes: Vec<Node>) -> Self {
        Self {
            nodes,
            edges: Vec::new(),
        }
    }

    pub fn add_node(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id() == id)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn nodes_by_type(&self, node_type: NodeType) -> Vec<&Node> {
        self.nodes
            .iter()
            .filter(|n| n.node_type() == node_type)
            .collect()
    }

    /// Remove a node by id, returning it. Does not touch edges; callers
    /// follow up with mention cleanup for referable entities (see
    /// `mentions::remove_mentions_to_entity`).
    pub fn remove_node(&mut self, id: &str) -> Option<Node> {
        let pos = self.nodes.iter().position(|n| n.id() == id)?;
        Some(self.nodes.remove(pos))
    }

    pub fn add_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edges_by_type(&self, edge_type: EdgeType) -> Vec<&Edge> {
        self.edges
            .iter()
            .filter(|e| e.edge_type == edge_type)
            .collect()
    }

    /// Keep only edges matching the predicate. Returns the number removed.
    pub fn retain_edges<F>(&mut self, predicate: F) -> usize
    where
        F: FnMut(&Edge) -> bool,
    {
        let before = self.edges.len();
        self.edges.retain(predicate);
        before - self.edges.len()
    }
}

/// Check an edge against the rule table and the graph's current nodes.
///
/// The type registry only supplies the rule; enforcement belongs to edge
/// authors (editing UI, importers), and this is their ready-made check.
pub fn validate_edge(graph: &GraphState, edge: &Edge) -> Result<()> {
    let from_node = graph.node(&edge.from).ok_or_else(|| {
        StoryGraphError::InvalidEdge(format!("unknown source node: {}", edge.from))
    })?;
    let to_node = graph
        .node(&edge.to)
        .ok_or_else(|| StoryGraphError::InvalidEdge(format!("unknown target node: {}", edge.to)))?;

    let rule = edge_rule(edge.edge_type);
    if !rule.allows(from_node.node_type(), to_node.node_type()) {
        return Err(StoryGraphError::InvalidEdge(format!(
            "{} does not allow {} -> {}",
            edge.edge_type,
            from_node.node_type(),
            to_node.node_type()
        )));
    }
    Ok(())
}
