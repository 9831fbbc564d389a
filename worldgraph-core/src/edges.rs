//! Mention edges between collected nodes.

use crate::graph::{GraphEdge, GraphNode};
use crate::record::{EntityId, MentionRow};
use crate::store::WorldStore;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Edges that survived validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeSet {
    /// Valid edges, in fetch order.
    pub edges: Vec<GraphEdge>,
    /// Mentions dropped because an endpoint is not a known node.
    pub dropped: usize,
    /// Whether the mention fetch itself failed.
    pub fetch_failed: bool,
}

/// A mention is kept only if both endpoints are known nodes.
pub fn is_valid_mention(mention: &MentionRow, known_ids: &HashSet<EntityId>) -> bool {
    known_ids.contains(&mention.source_entity_id) && known_ids.contains(&mention.target_entity_id)
}

/// Split mentions into valid edges and a count of dangling ones.
pub fn filter_mentions(mentions: Vec<MentionRow>, known_ids: &HashSet<EntityId>) -> EdgeSet {
    let mut set = EdgeSet::default();
    for mention in mentions {
        if is_valid_mention(&mention, known_ids) {
            set.edges
                .push(GraphEdge::mention(mention.source_entity_id, mention.target_entity_id));
        } else {
            set.dropped += 1;
        }
    }
    set
}

/// Recompute every node's connection count from `edges`.
///
/// An edge counts once for each distinct endpoint it touches, so a
/// self-mention adds one.
pub fn apply_connection_counts(nodes: &mut [GraphNode], edges: &[GraphEdge]) {
    let mut degree: HashMap<&EntityId, usize> = HashMap::new();
    for edge in edges {
        *degree.entry(&edge.source).or_default() += 1;
        if edge.target != edge.source {
            *degree.entry(&edge.target).or_default() += 1;
        }
    }
    for node in nodes.iter_mut() {
        node.connection_count = degree.get(&node.id).copied().unwrap_or(0);
    }
}

/// Fetches mentions for a known node set and keeps the valid ones.
pub struct EdgeBuilder<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: WorldStore + ?Sized> EdgeBuilder<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Build edges among `known_ids` with a single batched fetch.
    ///
    /// `known_ids` must be the complete node set. Nothing is fetched when it is
    /// empty, and a failed fetch degrades to no edges.
    pub async fn build_edges(&self, known_ids: &HashSet<EntityId>) -> EdgeSet {
        if known_ids.is_empty() {
            return EdgeSet::default();
        }

        let mentions = match self.store.fetch_mentions(known_ids).await {
            Ok(mentions) => mentions,
            Err(error) => {
                warn!(%error, nodes = known_ids.len(), "mention fetch failed, graph has no edges");
                return EdgeSet {
                    fetch_failed: true,
                    ..Default::default()
                };
            }
        };

        let set = filter_mentions(mentions, known_ids);
        if set.dropped > 0 {
            debug!(dropped = set.dropped, "dropped mentions with missing endpoints");
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::EntityKind;
    use crate::testing::{CountingStore, FlakyStore, WorldFixture};

    fn ids(list: &[&str]) -> HashSet<EntityId> {
        list.iter().map(|s| EntityId::from(*s)).collect()
    }

    #[test]
    fn test_filter_drops_dangling() {
        let known = ids(&["a", "b"]);
        let set = filter_mentions(
            vec![
                MentionRow::new("a", "b"),
                MentionRow::new("a", "gone"),
                MentionRow::new("b", "a"),
            ],
            &known,
        );
        assert_eq!(set.edges.len(), 2);
        assert_eq!(set.dropped, 1);
        assert_eq!(set.edges[0].source.as_str(), "a");
        assert_eq!(set.edges[1].source.as_str(), "b");
    }

    #[test]
    fn test_connection_counts() {
        let mut nodes = vec![
            GraphNode::new("a".into(), "A", EntityKind::Character),
            GraphNode::new("b".into(), "B", EntityKind::Location),
            GraphNode::new("c".into(), "C", EntityKind::Item),
        ];
        let edges = vec![
            GraphEdge::mention("a".into(), "b".into()),
            GraphEdge::mention("b".into(), "a".into()),
            GraphEdge::mention("a".into(), "a".into()),
        ];
        apply_connection_counts(&mut nodes, &edges);

        assert_eq!(nodes[0].connection_count, 3);
        assert_eq!(nodes[1].connection_count, 2);
        assert_eq!(nodes[2].connection_count, 0);
    }

    #[tokio::test]
    async fn test_empty_set_skips_fetch() {
        let store = CountingStore::new(WorldFixture::new("w1").into_store());
        let set = EdgeBuilder::new(&store).build_edges(&HashSet::new()).await;
        assert!(set.edges.is_empty());
        assert_eq!(store.mention_fetches(), 0);
    }

    #[tokio::test]
    async fn test_single_batched_fetch() {
        let store = CountingStore::new(
            WorldFixture::new("w1")
                .entity(EntityKind::Character, "c1", "Zara")
                .entity(EntityKind::Character, "c2", "Orrin")
                .entity(EntityKind::Location, "l1", "Tower")
                .mention("c1", "l1")
                .mention("c2", "l1")
                .into_store(),
        );
        let set = EdgeBuilder::new(&store)
            .build_edges(&ids(&["c1", "c2", "l1"]))
            .await;
        assert_eq!(set.edges.len(), 2);
        assert_eq!(store.mention_fetches(), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_yields_no_edges() {
        let store = FlakyStore::new(
            WorldFixture::new("w1")
                .entity(EntityKind::Character, "c1", "Zara")
                .mention("c1", "c1")
                .into_store(),
        )
        .fail_mentions();
        let set = EdgeBuilder::new(&store).build_edges(&ids(&["c1"])).await;
        assert!(set.fetch_failed);
        assert!(set.edges.is_empty());
    }
}
