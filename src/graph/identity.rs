//! Edge identity and normalization: dedup keys, id generation, and
//! conversion of partial/legacy edge records into canonical edges.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::Result;
use crate::graph::{Edge, EdgeProperties, EdgeStatus, Provenance, ProvenanceSource};
use crate::schema::EdgeType;

/// Canonical identity key for an edge: `"{TYPE}:{from}:{to}"`.
///
/// Two edges with equal type/from/to always produce equal keys, regardless
/// of any other field.
pub fn edge_key(edge: &Edge) -> String {
    format!("{}:{}:{}", edge.edge_type, edge.from, edge.to)
}

/// Extended identity key for mention edges: the same node pair may be
/// mentioned from more than one text field, so the field participates.
pub fn mention_key(from: &str, to: &str, field: &str) -> String {
    format!("{}:{}:{}:{}", EdgeType::Mentions, from, to, field)
}

/// Fresh, effectively-unique id for a newly authored edge. Not reproducible.
pub fn generate_edge_id() -> String {
    format!("edge-{}", Uuid::new_v4())
}

/// Stable id derived only from the edge's identity key, so re-importing the
/// same logical edge never mints a new identity. SHA-256 truncated to 64
/// bits; collisions are negligible at screenplay scale.
pub fn deterministic_edge_id(edge_type: EdgeType, from: &str, to: &str) -> String {
    deterministic_id_from_key(&format!("{}:{}:{}", edge_type, from, to))
}

/// Stable id from an arbitrary identity key (used for mention keys too).
pub fn deterministic_id_from_key(key: &str) -> String {
    let digest = Sha256::digest(key.as_bytes());
    let hex = format!("{:x}", digest);
    format!("edge-det-{}", &hex[..16])
}

/// A partial or legacy edge record: at least `type`/`from`/`to`, anything
/// else optional. Deserialized from imported payloads and normalized via
/// [`normalize_edge`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartialEdge {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub edge_type: EdgeType,
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<EdgeProperties>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provenance: Option<Provenance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<EdgeStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl PartialEdge {
    pub fn new(edge_type: EdgeType, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            id: None,
            edge_type,
            from: from.into(),
            to: to.into(),
            properties: None,
            provenance: None,
            status: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Parse a legacy edge record from a JSON payload. Records missing
    /// `type`/`from`/`to` (or carrying an unknown type label) are rejected;
    /// everything else is filled in by [`normalize_edge`].
    pub fn from_json(json: &str) -> Result<PartialEdge> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Normalize a partial/legacy record into a canonical edge, stamping the
/// current time where `created_at` is missing. See [`normalize_edge_at`]
/// for the clock-injected variant tests use.
pub fn normalize_edge(partial: PartialEdge) -> Edge {
    normalize_edge_at(partial, Utc::now())
}

/// Normalize with an explicit clock. Pure: same input and same `now` always
/// yield the same edge. A record without an `id` gets the deterministic id
/// for its identity key, so repeated normalization of the same legacy
/// record is idempotent.
pub fn normalize_edge_at(partial: PartialEdge, now: DateTime<Utc>) -> Edge {
    let id = partial
        .id
        .unwrap_or_else(|| deterministic_edge_id(partial.edge_type, &partial.from, &partial.to));
    Edge {
        id,
        edge_type: partial.edge_type,
        from: partial.from,
        to: partial.to,
        properties: partial.properties,
        provenance: partial
            .provenance
            .or_else(|| Some(Provenance::from_source(ProvenanceSource::Import))),
        status: partial.status.unwrap_or(EdgeStatus::Approved),
        created_at: partial.created_at.unwrap_or(now),
        updated_at: partial.updated_at,
    }
}

/// Structural check: does this JSON value already look like a first-class
/// edge (a string `id` field)? Used when triaging mixed legacy payloads
/// before deciding whether normalization must assign an identity.
pub fn is_first_class_edge(value: &serde_json::Value) -> bool {
    value.get("id").map(|id| id.is_string()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(edge_type: EdgeType, from: &str, to: &str) -> Edge {
        normalize_edge(PartialEdge::new(edge_type, from, to))
    }

    #[test]
    fn test_edge_key_depends_only_on_identity() {
        let mut e1 = edge(EdgeType::Mentions, "s1", "c1");
        let e2 = edge(EdgeType::Mentions, "s1", "c1");
        e1.status = EdgeStatus::Proposed;
        e1.properties = Some(EdgeProperties {
            confidence: Some(0.5),
            ..Default::default()
        });
        assert_eq!(edge_key(&e1), edge_key(&e2));
        assert_eq!(edge_key(&e1), "MENTIONS:s1:c1");
    }

    #[test]
    fn test_edge_key_differs_on_any_identity_field() {
        let base = edge(EdgeType::Mentions, "s1", "c1");
        assert_ne!(edge_key(&base), edge_key(&edge(EdgeType::RelatesTo, "s1", "c1")));
        assert_ne!(edge_key(&base), edge_key(&edge(EdgeType::Mentions, "s2", "c1")));
        assert_ne!(edge_key(&base), edge_key(&edge(EdgeType::Mentions, "s1", "c2")));
    }

    #[test]
    fn test_mention_key_includes_field() {
        let k1 = mention_key("s1", "c1", "heading");
        let k2 = mention_key("s1", "c1", "scene_overview");
        assert_ne!(k1, k2);
        assert_eq!(k1, "MENTIONS:s1:c1:heading");
    }

    #[test]
    fn test_generate_edge_id_unique() {
        let a = generate_edge_id();
        let b = generate_edge_id();
        assert_ne!(a, b);
        assert!(a.starts_with("edge-"));
    }

    #[test]
    fn test_deterministic_edge_id_stable() {
        let a = deterministic_edge_id(EdgeType::Mentions, "s1", "c1");
        let b = deterministic_edge_id(EdgeType::Mentions, "s1", "c1");
        assert_eq!(a, b);
        assert!(a.starts_with("edge-det-"));
        assert_eq!(a.len(), "edge-det-".len() + 16);
        let c = deterministic_edge_id(EdgeType::Mentions, "s1", "c2");
        assert_ne!(a, c);
    }

    #[test]
    fn test_deterministic_edge_id_pinned_value() {
        // First 64 bits of SHA-256("MENTIONS:s1:c1"), zero-padded per byte.
        // Pinned so a formatting change cannot silently re-key every edge.
        assert_eq!(
            deterministic_edge_id(EdgeType::Mentions, "s1", "c1"),
            "edge-det-3b55534b50fc023d"
        );
    }

    #[test]
    fn test_normalize_assigns_deterministic_id() {
        let now = Utc::now();
        let e1 = normalize_edge_at(PartialEdge::new(EdgeType::RelatesTo, "a", "b"), now);
        let e2 = normalize_edge_at(PartialEdge::new(EdgeType::RelatesTo, "a", "b"), now);
        assert_eq!(e1.id, e2.id);
        assert_eq!(e1.id, deterministic_edge_id(EdgeType::RelatesTo, "a", "b"));
    }

    #[test]
    fn test_normalize_keeps_existing_id() {
        let mut partial = PartialEdge::new(EdgeType::RelatesTo, "a", "b");
        partial.id = Some("edge-existing".into());
        let e = normalize_edge(partial);
        assert_eq!(e.id, "edge-existing");
    }

    #[test]
    fn test_normalize_defaults() {
        let e = normalize_edge(PartialEdge::new(EdgeType::RelatesTo, "a", "b"));
        assert_eq!(e.status, EdgeStatus::Approved);
        assert_eq!(
            e.provenance.as_ref().map(|p| p.source),
            Some(ProvenanceSource::Import)
        );
        assert!(e.updated_at.is_none());
    }

    #[test]
    fn test_normalize_preserves_given_fields() {
        let mut partial = PartialEdge::new(EdgeType::RelatesTo, "a", "b");
        partial.status = Some(EdgeStatus::Proposed);
        partial.provenance = Some(Provenance::from_source(ProvenanceSource::Human));
        let stamp = "2024-01-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap();
        partial.created_at = Some(stamp);
        let e = normalize_edge(partial);
        assert_eq!(e.status, EdgeStatus::Proposed);
        assert_eq!(e.provenance.unwrap().source, ProvenanceSource::Human);
        assert_eq!(e.created_at, stamp);
    }

    #[test]
    fn test_partial_edge_from_json() {
        let e = PartialEdge::from_json(r#"{"type": "MENTIONS", "from": "s1", "to": "c1"}"#)
            .unwrap();
        assert_eq!(e.edge_type, EdgeType::Mentions);
        assert!(e.id.is_none());
    }

    #[test]
    fn test_partial_edge_from_json_rejects_malformed() {
        use crate::error::StoryGraphError;

        let missing_to = PartialEdge::from_json(r#"{"type": "MENTIONS", "from": "s1"}"#);
        assert!(matches!(missing_to, Err(StoryGraphError::Json(_))));

        let unknown_type = PartialEdge::from_json(r#"{"type": "KNOWS", "from": "a", "to": "b"}"#);
        assert!(matches!(unknown_type, Err(StoryGraphError::Json(_))));

        let not_json = PartialEdge::from_json("{not json");
        assert!(matches!(not_json, Err(StoryGraphError::Json(_))));
    }

    #[test]
    fn test_is_first_class_edge() {
        let with_id = serde_json::json!({"id": "edge-1", "type": "MENTIONS"});
        let numeric_id = serde_json::json!({"id": 7, "type": "MENTIONS"});
        let without_id = serde_json::json!({"type": "MENTIONS", "from": "a", "to": "b"});
        assert!(is_first_class_edge(&with_id));
        assert!(!is_first_class_edge(&numeric_id));
        assert!(!is_first_class_edge(&without_id));
    }
}
