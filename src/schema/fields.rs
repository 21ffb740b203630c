//! Extractable field map: which text fields of each node type are scanned
//! for entity mentions, and how a field value is coerced to scannable text.

use crate::graph::Node;
use crate::schema::NodeType;

/// Ordered list of text-bearing field names eligible for mention scanning.
///
/// A node type absent from this map (or mapped to an empty list) is never
/// scanned. Field order determines scan order, which keeps rebuild output
/// deterministic.
pub fn extractable_fields(node_type: NodeType) -> &'static [&'static str] {
    match node_type {
        NodeType::Beat => &["title", "summary"],
        NodeType::Scene => &["heading", "scene_overview", "key_actions"],
        NodeType::Character => &["description"],
        NodeType::Location => &["description"],
        NodeType::Object => &["description"],
        NodeType::Arc => &["description"],
        NodeType::Idea => &["body"],
    }
}

/// Coerce a named field of a node to scannable text.
///
/// String fields are used as-is; string-array fields are joined with single
/// spaces. Unknown field names and empty values yield `None` (nothing to
/// scan), never an error.
pub fn field_text(node: &Node, field: &str) -> Option<String> {
    let text = match (node, field) {
        (Node::Beat { title, .. }, "title") => title.clone(),
        (Node::Beat { summary, .. }, "summary") => summary.clone(),
        (Node::Scene { heading, .. }, "heading") => heading.clone(),
        (Node::Scene { scene_overview, .. }, "scene_overview") => scene_overview.clone(),
        (Node::Scene { key_actions, .. }, "key_actions") => key_actions.join(" "),
        (Node::Character { description, .. }, "description") => description.clone(),
        (Node::Location { description, .. }, "description") => description.clone(),
        (Node::Object { description, .. }, "description") => description.clone(),
        (Node::Arc { description, .. }, "description") => description.clone(),
        (Node::Idea { body, .. }, "body") => body.clone(),
        _ => return None,
    };
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}
