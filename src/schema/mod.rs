//! Type registry: closed node/edge type sets and the edge rule table.
//!
//! Declares which node types exist, which edge types exist, and for each edge
//! type the permissible (source, target) node-type pairs. The registry only
//! supplies rules; enforcement is the caller's job (see [`EdgeRule::allows`]).

mod fields;

pub use fields::{extractable_fields, field_text};

use serde::{Deserialize, Serialize};

/// Closed set of node types in the screenplay graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Beat,
    Scene,
    Character,
    Location,
    Object,
    Arc,
    Idea,
}

/// All node types, in declaration order.
pub const NODE_TYPES: [NodeType; 7] = [
    NodeType::Beat,
    NodeType::Scene,
    NodeType::Character,
    NodeType::Location,
    NodeType::Object,
    NodeType::Arc,
    NodeType::Idea,
];

impl NodeType {
    /// Serialized label, e.g. `scene`.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Beat => "beat",
            NodeType::Scene => "scene",
            NodeType::Character => "character",
            NodeType::Location => "location",
            NodeType::Object => "object",
            NodeType::Arc => "arc",
            NodeType::Idea => "idea",
        }
    }

    /// Parse a serialized label back into a node type.
    pub fn parse(label: &str) -> Option<NodeType> {
        NODE_TYPES.iter().copied().find(|t| t.as_str() == label)
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed set of edge (relationship) types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdgeType {
    Contains,
    Precedes,
    AppearsIn,
    SetIn,
    Mentions,
    Advances,
    Supports,
    RelatesTo,
}

/// All edge types, in declaration order.
pub const EDGE_TYPES: [EdgeType; 8] = [
    EdgeType::Contains,
    EdgeType::Precedes,
    EdgeType::AppearsIn,
    EdgeType::SetIn,
    EdgeType::Mentions,
    EdgeType::Advances,
    EdgeType::Supports,
    EdgeType::RelatesTo,
];

impl EdgeType {
    /// Serialized label, e.g. `APPEARS_IN`.
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeType::Contains => "CONTAINS",
            EdgeType::Precedes => "PRECEDES",
            EdgeType::AppearsIn => "APPEARS_IN",
            EdgeType::SetIn => "SET_IN",
            EdgeType::Mentions => "MENTIONS",
            EdgeType::Advances => "ADVANCES",
            EdgeType::Supports => "SUPPORTS",
            EdgeType::RelatesTo => "RELATES_TO",
        }
    }

    /// Parse a serialized label back into an edge type.
    pub fn parse(label: &str) -> Option<EdgeType> {
        EDGE_TYPES.iter().copied().find(|t| t.as_str() == label)
    }
}

impl std::fmt::Display for EdgeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Is this string the label of a known edge type?
pub fn is_valid_edge_type(label: &str) -> bool {
    EdgeType::parse(label).is_some()
}

/// Permissible source and target node types for one edge type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeRule {
    pub from: &'static [NodeType],
    pub to: &'static [NodeType],
}

impl EdgeRule {
    /// Does this rule permit an edge from `from` to `to`?
    pub fn allows(&self, from: NodeType, to: NodeType) -> bool {
        self.from.contains(&from) && self.to.contains(&to)
    }
}

const REFERABLE: &[NodeType] = &[NodeType::Character, NodeType::Location, NodeType::Object];

/// The rule table. Total over `EdgeType`: every edge type has exactly one
/// rule, checked by the compiler.
pub fn edge_rule(edge_type: EdgeType) -> EdgeRule {
    match edge_type {
        EdgeType::Contains => EdgeRule {
            from: &[NodeType::Beat],
            to: &[NodeType::Scene],
        },
        EdgeType::Precedes => EdgeRule {
            from: &[NodeType::Beat, NodeType::Scene],
            to: &[NodeType::Beat, NodeType::Scene],
        },
        EdgeType::AppearsIn => EdgeRule {
            from: &[NodeType::Character],
            to: &[NodeType::Scene],
        },
        EdgeType::SetIn => EdgeRule {
            from: &[NodeType::Scene],
            to: &[NodeType::Location],
        },
        // Any node with scannable text may mention a referable entity
        EdgeType::Mentions => EdgeRule {
            from: &NODE_TYPES,
            to: REFERABLE,
        },
        EdgeType::Advances => EdgeRule {
            from: &[NodeType::Scene, NodeType::Beat],
            to: &[NodeType::Arc],
        },
        EdgeType::Supports => EdgeRule {
            from: &[NodeType::Idea],
            to: &[
                NodeType::Beat,
                NodeType::Scene,
                NodeType::Character,
                NodeType::Location,
                NodeType::Object,
                NodeType::Arc,
            ],
        },
        EdgeType::RelatesTo => EdgeRule {
            from: &NODE_TYPES,
            to: &NODE_TYPES,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_type_labels_round_trip() {
        for edge_type in EDGE_TYPES {
            assert_eq!(EdgeType::parse(edge_type.as_str()), Some(edge_type));
        }
        assert!(EdgeType::parse("NOT_A_TYPE").is_none());
    }

    #[test]
    fn test_node_type_labels_round_trip() {
        for node_type in NODE_TYPES {
            assert_eq!(NodeType::parse(node_type.as_str()), Some(node_type));
        }
        assert!(NodeType::parse("widget").is_none());
    }

    #[test]
    fn test_is_valid_edge_type() {
        assert!(is_valid_edge_type("MENTIONS"));
        assert!(is_valid_edge_type("APPEARS_IN"));
        assert!(!is_valid_edge_type("mentions")); // labels are uppercase
        assert!(!is_valid_edge_type(""));
    }

    #[test]
    fn test_rule_completeness() {
        // Every edge type has a rule with non-empty endpoint sets, and every
        // node type a rule references is a member of the node-type set.
        for edge_type in EDGE_TYPES {
            let rule = edge_rule(edge_type);
            assert!(!rule.from.is_empty(), "{edge_type} has empty source set");
            assert!(!rule.to.is_empty(), "{edge_type} has empty target set");
            for nt in rule.from.iter().chain(rule.to.iter()) {
                assert!(NODE_TYPES.contains(nt));
            }
        }
    }

    #[test]
    fn test_rule_allows() {
        let rule = edge_rule(EdgeType::AppearsIn);
        assert!(rule.allows(NodeType::Character, NodeType::Scene));
        assert!(!rule.allows(NodeType::Scene, NodeType::Character));

        let mentions = edge_rule(EdgeType::Mentions);
        assert!(mentions.allows(NodeType::Scene, NodeType::Character));
        assert!(mentions.allows(NodeType::Idea, NodeType::Object));
        assert!(!mentions.allows(NodeType::Scene, NodeType::Idea));
    }

    #[test]
    fn test_serde_labels() {
        let json = serde_json::to_string(&EdgeType::AppearsIn).unwrap();
        assert_eq!(json, "\"APPEARS_IN\"");
        let json = serde_json::to_string(&NodeType::Scene).unwrap();
        assert_eq!(json, "\"scene\"");
    }
}
