//! WorldGraph - the public entry point for graph and search requests.
//!
//! Wraps a [`WorldStore`] and a [`Catalog`] and exposes the three read
//! operations the UI layer needs. Every call is a stateless read; failures
//! in storage shrink the result instead of surfacing as errors.

use crate::catalog::Catalog;
use crate::collector::Collector;
use crate::edges::{apply_connection_counts, EdgeBuilder};
use crate::graph::{GraphData, SearchResult};
use crate::record::WorldId;
use crate::ranker::Ranker;
use crate::store::WorldStore;
use tracing::debug;

/// Limits applied by the convenience search methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphConfig {
    /// Limit used by [`WorldGraph::search`].
    pub default_search_limit: usize,

    /// Limit used by [`WorldGraph::all_entities`].
    pub list_all_limit: usize,
}

impl GraphConfig {
    pub fn new() -> Self {
        Self {
            default_search_limit: 10,
            list_all_limit: 1000,
        }
    }

    /// Set the default search limit.
    pub fn with_search_limit(mut self, limit: usize) -> Self {
        self.default_search_limit = limit;
        self
    }

    /// Set the limit used when listing every entity.
    pub fn with_list_all_limit(mut self, limit: usize) -> Self {
        self.list_all_limit = limit;
        self
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Graph and search aggregation over one store.
pub struct WorldGraph<S> {
    store: S,
    catalog: Catalog,
    config: GraphConfig,
}

impl<S: WorldStore> WorldGraph<S> {
    /// Create an aggregator with the standard catalog and default limits.
    pub fn new(store: S) -> Self {
        Self {
            store,
            catalog: Catalog::standard(),
            config: GraphConfig::default(),
        }
    }

    /// Use a custom catalog.
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Use custom limits.
    pub fn with_config(mut self, config: GraphConfig) -> Self {
        self.config = config;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Build the relationship graph of a world.
    ///
    /// Edges are only fetched once the full node set is known.
    pub async fn graph_data(&self, world: &WorldId) -> GraphData {
        let collection = Collector::new(&self.catalog, &self.store)
            .collect_nodes(world)
            .await;
        let edge_set = EdgeBuilder::new(&self.store)
            .build_edges(&collection.known_ids)
            .await;

        let mut nodes = collection.nodes;
        apply_connection_counts(&mut nodes, &edge_set.edges);

        debug!(
            world = %world,
            nodes = nodes.len(),
            edges = edge_set.edges.len(),
            dropped_edges = edge_set.dropped,
            "graph built"
        );
        GraphData {
            nodes,
            edges: edge_set.edges,
        }
    }

    /// Ranked name search with an explicit limit.
    pub async fn search_entities(
        &self,
        world: &WorldId,
        query: &str,
        limit: usize,
    ) -> Vec<SearchResult> {
        Ranker::new(&self.catalog, &self.store)
            .search(world, query, limit)
            .await
    }

    /// Ranked name search with the configured default limit.
    pub async fn search(&self, world: &WorldId, query: &str) -> Vec<SearchResult> {
        self.search_entities(world, query, self.config.default_search_limit)
            .await
    }

    /// Every entity of a world, alphabetically, up to the list-all limit.
    pub async fn all_entities(&self, world: &WorldId) -> Vec<SearchResult> {
        self.search_entities(world, "", self.config.list_all_limit)
            .await
    }
}
