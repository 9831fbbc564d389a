//! Collects every entity of a world into graph nodes.

use crate::catalog::{Catalog, EntityKind, KindConfig};
use crate::graph::GraphNode;
use crate::record::{EntityId, EntityRecord, WorldId};
use crate::store::{RecordQuery, WorldStore};
use futures::future::join_all;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Nodes gathered for one world.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    pub nodes: Vec<GraphNode>,
    pub known_ids: HashSet<EntityId>,
    pub report: CollectReport,
}

/// What was lost while collecting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectReport {
    /// Kinds whose fetch failed and contributed no nodes.
    pub failed_kinds: Vec<EntityKind>,
    /// Rows dropped at ingestion.
    pub rejected_rows: usize,
}

impl CollectReport {
    /// Whether every kind was collected in full.
    pub fn is_complete(&self) -> bool {
        self.failed_kinds.is_empty() && self.rejected_rows == 0
    }
}

/// Fetches records of one kind and validates them.
///
/// A failed fetch is logged and yields `None` so the caller can carry on with
/// the remaining kinds. Rejected rows are logged and counted.
pub(crate) async fn fetch_kind<S: WorldStore + ?Sized>(
    store: &S,
    config: &KindConfig,
    world: &WorldId,
    query: &RecordQuery,
) -> Option<(Vec<EntityRecord>, usize)> {
    let rows = match store.fetch_records(config, world, query).await {
        Ok(rows) => rows,
        Err(error) => {
            warn!(
                kind = %config.kind,
                collection = %config.collection,
                world = %world,
                %error,
                "entity fetch failed, continuing without this kind"
            );
            return None;
        }
    };

    let mut rejected = 0;
    let records = rows
        .iter()
        .filter_map(|row| match EntityRecord::from_row(config, row) {
            Ok(record) => Some(record),
            Err(error) => {
                warn!(kind = %config.kind, world = %world, %error, "skipping malformed row");
                rejected += 1;
                None
            }
        })
        .collect();

    Some((records, rejected))
}

/// Builds the node list for a world from every kind in a catalog.
pub struct Collector<'a, S: ?Sized> {
    catalog: &'a Catalog,
    store: &'a S,
}

impl<'a, S: WorldStore + ?Sized> Collector<'a, S> {
    pub fn new(catalog: &'a Catalog, store: &'a S) -> Self {
        Self { catalog, store }
    }

    /// Collect one node per record across all kinds.
    ///
    /// Kinds are fetched concurrently. An unknown world simply has no records.
    pub async fn collect_nodes(&self, world: &WorldId) -> Collection {
        let query = RecordQuery::all();
        let fetches = self
            .catalog
            .entries()
            .iter()
            .map(|config| fetch_kind(self.store, config, world, &query));
        let results = join_all(fetches).await;

        let mut collection = Collection::default();
        for (config, result) in self.catalog.entries().iter().zip(results) {
            let Some((records, rejected)) = result else {
                collection.report.failed_kinds.push(config.kind);
                continue;
            };
            collection.report.rejected_rows += rejected;

            let mut seen_in_kind = HashSet::new();
            for record in records {
                if !seen_in_kind.insert(record.id.clone()) {
                    debug!(kind = %config.kind, id = %record.id, "duplicate id within kind");
                    continue;
                }
                collection.known_ids.insert(record.id.clone());
                collection
                    .nodes
                    .push(GraphNode::new(record.id, record.name, config.kind));
            }
        }

        debug!(
            world = %world,
            nodes = collection.nodes.len(),
            failed_kinds = collection.report.failed_kinds.len(),
            "collected nodes"
        );
        collection
    }
}
