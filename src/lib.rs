pub mod config;
pub mod error;
pub mod schema;
pub mod graph;
pub mod mentions;

pub use config::{Config, ExtractionConfig};
pub use error::{Result, StoryGraphError};
pub use graph::{
    deterministic_edge_id, edge_key, generate_edge_id, is_first_class_edge, normalize_edge,
    normalize_edge_at, validate_edge, Edge, EdgeStatus, GraphState, Node, PartialEdge, Provenance,
    ProvenanceSource,
};
pub use mentions::{
    rebuild_all_mentions, rebuild_mentions_for_node, remove_mentions_from_node,
    remove_mentions_to_entity, EntityExtractor, EntityInfo, Mention, RebuildStats,
    SubstringExtractor,
};
pub use schema::{edge_rule, is_valid_edge_type, EdgeRule, EdgeType, NodeType};
