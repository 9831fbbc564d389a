//! Graph and search payloads handed to the UI layer.

use crate::catalog::EntityKind;
use crate::edges::apply_connection_counts;
use crate::record::EntityId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One entity in the relationship graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: EntityId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntityKind,
    /// Undirected degree in the mention graph, recomputed per request.
    pub connection_count: usize,
}

impl GraphNode {
    /// Create a node with no connections yet.
    pub fn new(id: EntityId, name: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            connection_count: 0,
        }
    }
}

/// Type tag for graph edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeType {
    /// The source entity's text references the target.
    Mention,
}

/// A directed edge between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: EntityId,
    pub target: EntityId,
    #[serde(rename = "type")]
    pub edge_type: EdgeType,
}

impl GraphEdge {
    /// Create a mention edge.
    pub fn mention(source: EntityId, target: EntityId) -> Self {
        Self {
            source,
            target,
            edge_type: EdgeType::Mention,
        }
    }

    /// Check if this edge touches a specific node.
    pub fn involves(&self, id: &EntityId) -> bool {
        &self.source == id || &self.target == id
    }

    /// Get the other endpoint, if the edge touches `id`.
    pub fn other(&self, id: &EntityId) -> Option<&EntityId> {
        if &self.source == id {
            Some(&self.target)
        } else if &self.target == id {
            Some(&self.source)
        } else {
            None
        }
    }
}

/// Nodes plus edges for one world.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl GraphData {
    /// Look up a node by id.
    pub fn node(&self, id: &EntityId) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    /// Ids connected to `id` by an edge in either direction, in edge order.
    pub fn neighbors(&self, id: &EntityId) -> Vec<&EntityId> {
        let mut seen = HashSet::new();
        self.edges
            .iter()
            .filter_map(|e| e.other(id))
            .filter(|other| seen.insert(*other))
            .collect()
    }

    /// Keep only nodes of the given kinds and the edges between them.
    pub fn retain_kinds(&mut self, kinds: &[EntityKind]) {
        self.nodes.retain(|n| kinds.contains(&n.kind));
        let kept: HashSet<&EntityId> = self.nodes.iter().map(|n| &n.id).collect();
        self.edges
            .retain(|e| kept.contains(&e.source) && kept.contains(&e.target));
        apply_connection_counts(&mut self.nodes, &self.edges);
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// A ranked search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: EntityId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntityKind,
    pub description: Option<String>,
}
