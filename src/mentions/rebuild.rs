//! Mention rebuild engine: reconciles derived `MENTIONS` edges with current
//! node text by full removal and recreation per node.
//!
//! All operations are synchronous and assume exclusive access to the graph
//! for the duration of a call. `rebuild_all_mentions` is O(nodes x fields x
//! entities) and is meant as an explicit batch resync, not a per-keystroke
//! operation.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::config::ExtractionConfig;
use crate::graph::{
    deterministic_id_from_key, mention_key, Edge, EdgeProperties, EdgeStatus, GraphState, Node,
    Provenance, ProvenanceSource,
};
use crate::mentions::{EntityExtractor, EntityInfo, RebuildStats};
use crate::schema::{extractable_fields, field_text, EdgeType, NodeType};

/// Build the extractor catalog from all current referable nodes
/// (characters, locations, objects). Nodes without a usable name are skipped.
pub fn entity_catalog(graph: &GraphState) -> Vec<EntityInfo> {
    let mut catalog = Vec::new();
    for node_type in [NodeType::Character, NodeType::Location, NodeType::Object] {
        for node in graph.nodes_by_type(node_type) {
            if let Some(info) = EntityInfo::from_node(node) {
                catalog.push(info);
            }
        }
    }
    catalog
}

/// Delete every `MENTIONS` edge whose source is `node_id`. Returns the
/// number removed; 0 if none exist. Idempotent.
pub fn remove_mentions_from_node(graph: &mut GraphState, node_id: &str) -> usize {
    graph.retain_edges(|e| !(e.edge_type == EdgeType::Mentions && e.from == node_id))
}

/// Delete every `MENTIONS` edge whose target is `entity_id`; called when an
/// entity node is deleted so no dangling references survive. Idempotent.
pub fn remove_mentions_to_entity(graph: &mut GraphState, entity_id: &str) -> usize {
    graph.retain_edges(|e| !(e.edge_type == EdgeType::Mentions && e.to == entity_id))
}

/// Recompute the `MENTIONS` edges originating from one node.
///
/// Existing outgoing mention edges are fully replaced, never patched, so no
/// stale mention survives a content edit. A missing node or a node with
/// nothing to scan yields a zero result, not an error.
pub fn rebuild_mentions_for_node(
    graph: &mut GraphState,
    extractor: &dyn EntityExtractor,
    config: &ExtractionConfig,
    node_id: &str,
) -> RebuildStats {
    let Some(node) = graph.node(node_id).cloned() else {
        return RebuildStats::default();
    };
    let fields = extractable_fields(node.node_type());
    if fields.is_empty() {
        return RebuildStats::default();
    }

    let catalog = entity_catalog(graph);
    // Compute the replacement set before touching the graph, so removal and
    // recreation land together
    let new_edges = scan_node(&node, &catalog, extractor, config, Utc::now());

    let edges_removed = remove_mentions_from_node(graph, node_id);
    let edges_created = new_edges.len();
    for edge in new_edges {
        graph.add_edge(edge);
    }

    debug!(
        "rebuilt mentions for {}: {} created, {} removed",
        node_id, edges_created, edges_removed
    );

    RebuildStats {
        edges_created,
        edges_removed,
        nodes_processed: vec![node_id.to_string()],
    }
}

/// Graph-wide resync: strip every `MENTIONS` edge, then rescan every node
/// whose type has a non-empty extractable-field list. The entity catalog is
/// built once and reused. Safe to invoke repeatedly; a second run with
/// unchanged content recreates the identical edge set.
pub fn rebuild_all_mentions(
    graph: &mut GraphState,
    extractor: &dyn EntityExtractor,
    config: &ExtractionConfig,
) -> RebuildStats {
    let edges_removed = graph.retain_edges(|e| e.edge_type != EdgeType::Mentions);

    let catalog = entity_catalog(graph);
    let scannable: Vec<Node> = graph
        .nodes()
        .iter()
        .filter(|n| !extractable_fields(n.node_type()).is_empty())
        .cloned()
        .collect();

    let now = Utc::now();
    let mut edges_created = 0;
    let mut nodes_processed = Vec::with_capacity(scannable.len());
    for node in &scannable {
        let new_edges = scan_node(node, &catalog, extractor, config, now);
        debug!("scanned {}: {} mention edges", node.id(), new_edges.len());
        edges_created += new_edges.len();
        for edge in new_edges {
            graph.add_edge(edge);
        }
        nodes_processed.push(node.id().to_string());
    }

    info!(
        "rebuilt all mentions: {} nodes, {} created, {} removed",
        nodes_processed.len(),
        edges_created,
        edges_removed
    );

    RebuildStats {
        edges_created,
        edges_removed,
        nodes_processed,
    }
}

/// Scan one node's extractable fields and materialize mention edges.
///
/// Duplicates within a `(from, to, field)` triple collapse to the first
/// match; matches against different fields stay separate edges. The catalog
/// includes the scanned node itself when it is referable, so a character
/// whose description names them yields a self-edge.
fn scan_node(
    node: &Node,
    catalog: &[EntityInfo],
    extractor: &dyn EntityExtractor,
    config: &ExtractionConfig,
    now: DateTime<Utc>,
) -> Vec<Edge> {
    let mut edges = Vec::new();
    let mut seen: HashSet<(String, String)> = HashSet::new();

    for field in extractable_fields(node.node_type()) {
        let Some(text) = field_text(node, field) else {
            continue;
        };
        for mention in extractor.extract(&text, catalog) {
            if mention.confidence < config.min_confidence {
                continue;
            }
            if !seen.insert((mention.entity_id.clone(), field.to_string())) {
                continue;
            }
            let key = mention_key(node.id(), &mention.entity_id, field);
            edges.push(Edge {
                id: deterministic_id_from_key(&key),
                edge_type: EdgeType::Mentions,
                from: node.id().to_string(),
                to: mention.entity_id,
                properties: Some(EdgeProperties {
                    confidence: Some(mention.confidence),
                    field: Some(field.to_string()),
                    matched_text: Some(mention.matched_text),
                    ..Default::default()
                }),
                provenance: Some(Provenance::from_source(ProvenanceSource::Extractor)),
                status: EdgeStatus::Approved,
                created_at: now,
                updated_at: None,
            });
        }
    }
    edges
}
