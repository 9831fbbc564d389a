//! Integration tests for relationship graph construction.
//!
//! These tests drive the public `WorldGraph` facade against in-memory stores.
//! Run with: `cargo test -p worldgraph-core --test graph_data`

use std::collections::HashSet;
use worldgraph_core::testing::{CountingStore, FlakyStore, WorldFixture};
use worldgraph_core::{EntityId, EntityKind, GraphEdge, GraphNode, WorldGraph};

fn degree(edges: &[GraphEdge], id: &EntityId) -> usize {
    edges.iter().filter(|e| e.involves(id)).count()
}

// =============================================================================
// Scenario: a character mentioning a location
// =============================================================================

#[tokio::test]
async fn test_single_mention_scenario() {
    let store = WorldFixture::new("W1")
        .entity(EntityKind::Character, "c1", "Zara")
        .entity(EntityKind::Location, "l1", "Zara's Tower")
        .mention("c1", "l1")
        .into_store();
    let graph = WorldGraph::new(store);

    let data = graph.graph_data(&"W1".into()).await;

    assert_eq!(
        data.nodes,
        vec![
            GraphNode {
                id: "c1".into(),
                name: "Zara".into(),
                kind: EntityKind::Character,
                connection_count: 1,
            },
            GraphNode {
                id: "l1".into(),
                name: "Zara's Tower".into(),
                kind: EntityKind::Location,
                connection_count: 1,
            },
        ]
    );
    assert_eq!(data.edges, vec![GraphEdge::mention("c1".into(), "l1".into())]);
}

// =============================================================================
// Node coverage and world scoping
// =============================================================================

#[tokio::test]
async fn test_one_node_per_record_and_no_foreign_world() {
    let store = WorldFixture::new("w1")
        .entity(EntityKind::Character, "c1", "Zara")
        .entity(EntityKind::Location, "l1", "Ashen Keep")
        .entity(EntityKind::Organization, "o1", "The Ember Court")
        .entity(EntityKind::Item, "i1", "Glass Crown")
        .entity(EntityKind::Rule, "r1", "Iron binds spirits")
        .entity(EntityKind::Story, "s1", "The Long Night")
        .entity(EntityKind::Event, "e1", "The Sundering")
        .in_world("w2")
        .entity(EntityKind::Character, "c9", "Intruder")
        .entity(EntityKind::Item, "i9", "Stolen Map")
        .into_store();
    let graph = WorldGraph::new(store);

    let data = graph.graph_data(&"w1".into()).await;

    assert_eq!(data.nodes.len(), 7);
    let kinds: HashSet<EntityKind> = data.nodes.iter().map(|n| n.kind).collect();
    assert_eq!(kinds.len(), 7);
    assert!(data.node(&"c9".into()).is_none());
    assert!(data.node(&"i9".into()).is_none());
}

#[tokio::test]
async fn test_unknown_world_yields_empty_graph() {
    let store = CountingStore::new(
        WorldFixture::new("w1")
            .entity(EntityKind::Character, "c1", "Zara")
            .mention("c1", "c1")
            .into_store(),
    );
    let graph = WorldGraph::new(store);

    let data = graph.graph_data(&"no-such-world".into()).await;

    assert!(data.is_empty());
    assert!(data.edges.is_empty());
    assert_eq!(graph.store().record_fetches(), 7);
    assert_eq!(graph.store().mention_fetches(), 0);
}

// =============================================================================
// Edge validity and connection counts
// =============================================================================

#[tokio::test]
async fn test_edges_reference_only_present_nodes() {
    let store = WorldFixture::new("w1")
        .entity(EntityKind::Character, "c1", "Zara")
        .entity(EntityKind::Character, "c2", "Orrin")
        .entity(EntityKind::Location, "l1", "Ashen Keep")
        .in_world("w2")
        .entity(EntityKind::Location, "l9", "Foreign Port")
        .mention("c1", "l1")
        .mention("c1", "deleted-entity")
        .mention("c2", "l9")
        .mention("l1", "c2")
        .into_store();
    let graph = WorldGraph::new(store);

    let data = graph.graph_data(&"w1".into()).await;

    let ids: HashSet<&EntityId> = data.nodes.iter().map(|n| &n.id).collect();
    assert_eq!(data.edges.len(), 2);
    for edge in &data.edges {
        assert!(ids.contains(&edge.source), "dangling source {}", edge.source);
        assert!(ids.contains(&edge.target), "dangling target {}", edge.target);
    }
}

#[tokio::test]
async fn test_connection_count_is_undirected_degree() {
    let store = WorldFixture::new("w1")
        .entity(EntityKind::Character, "c1", "Zara")
        .entity(EntityKind::Character, "c2", "Orrin")
        .entity(EntityKind::Location, "l1", "Ashen Keep")
        .entity(EntityKind::Item, "i1", "Glass Crown")
        .mention("c1", "l1")
        .mention("l1", "c1")
        .mention("c2", "c1")
        .mention("c1", "i1")
        .mention("i1", "i1")
        .into_store();
    let graph = WorldGraph::new(store);

    let data = graph.graph_data(&"w1".into()).await;

    for node in &data.nodes {
        assert_eq!(node.connection_count, degree(&data.edges, &node.id), "{}", node.name);
    }
    assert_eq!(data.node(&"c1".into()).unwrap().connection_count, 4);
    assert_eq!(data.node(&"i1".into()).unwrap().connection_count, 2);
}

#[tokio::test]
async fn test_deleted_entity_drops_its_edges() {
    let store = WorldFixture::new("w1")
        .entity(EntityKind::Character, "c1", "Zara")
        .entity(EntityKind::Location, "l1", "Ashen Keep")
        .mention("c1", "l1")
        .into_store();
    assert!(store.remove_row("locations", &"l1".into()));
    let graph = WorldGraph::new(store);

    let data = graph.graph_data(&"w1".into()).await;

    assert_eq!(data.nodes.len(), 1);
    assert!(data.edges.is_empty());
    assert_eq!(data.nodes[0].connection_count, 0);
}

// =============================================================================
// Graceful degradation
// =============================================================================

#[tokio::test]
async fn test_failing_kind_keeps_other_kinds() {
    let store = FlakyStore::new(
        WorldFixture::new("w1")
            .entity(EntityKind::Character, "c1", "Zara")
            .entity(EntityKind::Location, "l1", "Ashen Keep")
            .entity(EntityKind::Organization, "o1", "The Ember Court")
            .entity(EntityKind::Item, "i1", "Glass Crown")
            .entity(EntityKind::Rule, "r1", "Iron binds spirits")
            .entity(EntityKind::Story, "s1", "The Long Night")
            .entity(EntityKind::Event, "e1", "The Sundering")
            .mention("c1", "o1")
            .mention("c1", "l1")
            .into_store(),
    )
    .fail_kind(EntityKind::Organization);
    let graph = WorldGraph::new(store);

    let data = graph.graph_data(&"w1".into()).await;

    assert_eq!(data.nodes.len(), 6);
    assert!(data.nodes.iter().all(|n| n.kind != EntityKind::Organization));
    assert_eq!(data.edges, vec![GraphEdge::mention("c1".into(), "l1".into())]);
}

#[tokio::test]
async fn test_failing_mentions_keep_nodes() {
    let store = FlakyStore::new(
        WorldFixture::new("w1")
            .entity(EntityKind::Character, "c1", "Zara")
            .entity(EntityKind::Location, "l1", "Ashen Keep")
            .mention("c1", "l1")
            .into_store(),
    )
    .fail_mentions();
    let graph = WorldGraph::new(store);

    let data = graph.graph_data(&"w1".into()).await;

    assert_eq!(data.nodes.len(), 2);
    assert!(data.edges.is_empty());
    assert!(data.nodes.iter().all(|n| n.connection_count == 0));
}

// =============================================================================
// Graph helpers
// =============================================================================

#[tokio::test]
async fn test_kind_filter_and_neighbors() {
    let store = WorldFixture::new("w1")
        .entity(EntityKind::Character, "c1", "Zara")
        .entity(EntityKind::Character, "c2", "Orrin")
        .entity(EntityKind::Location, "l1", "Ashen Keep")
        .mention("c1", "l1")
        .mention("c2", "c1")
        .into_store();
    let graph = WorldGraph::new(store);

    let mut data = graph.graph_data(&"w1".into()).await;
    let neighbors = data.neighbors(&"c1".into());
    assert_eq!(neighbors, vec![&EntityId::from("l1"), &EntityId::from("c2")]);

    data.retain_kinds(&[EntityKind::Character]);
    assert_eq!(data.nodes.len(), 2);
    assert_eq!(data.edges.len(), 1);
    assert_eq!(data.node(&"c1".into()).unwrap().connection_count, 1);
}
