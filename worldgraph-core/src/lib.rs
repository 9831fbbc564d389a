//! Entity graph and search aggregation for worldbuilding workspaces.
//!
//! This crate provides:
//! - A catalog of the seven entity kinds a world can hold
//! - Relationship graph construction from mention records
//! - Ranked name search across all kinds
//! - An in-memory store and JSON snapshots for offline use
//!
//! # Quick Start
//!
//! ```ignore
//! use worldgraph_core::{WorldGraph, WorldSnapshot};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = WorldSnapshot::load_json("world.json").await?.into_store();
//!     let graph = WorldGraph::new(store);
//!
//!     let data = graph.graph_data(&"w1".into()).await;
//!     println!("{} nodes, {} edges", data.nodes.len(), data.edges.len());
//!
//!     for hit in graph.search(&"w1".into(), "zara").await {
//!         println!("{} ({})", hit.name, hit.kind);
//!     }
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod collector;
pub mod edges;
pub mod error;
pub mod graph;
pub mod persist;
pub mod ranker;
pub mod record;
pub mod service;
pub mod store;
pub mod testing;

// Primary public API
pub use catalog::{Catalog, EntityKind, KindConfig};
pub use error::{RecordError, SnapshotError, StoreError};
pub use graph::{EdgeType, GraphData, GraphEdge, GraphNode, SearchResult};
pub use persist::WorldSnapshot;
pub use record::{EntityId, MentionRow, WorldId};
pub use service::{GraphConfig, WorldGraph};
pub use store::{MemoryStore, RecordQuery, WorldStore};
