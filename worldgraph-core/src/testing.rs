//! Testing utilities for the aggregator.
//!
//! This module provides tools for integration testing:
//! - `WorldFixture` for building worlds without hand-writing rows
//! - `FlakyStore` for injecting storage failures per kind
//! - `CountingStore` for asserting how many fetches were issued

use crate::catalog::{Catalog, EntityKind, KindConfig};
use crate::error::StoreError;
use crate::persist::WorldSnapshot;
use crate::record::{EntityId, MentionRow, Row, WorldId, WORLD_FIELD};
use crate::store::{MemoryStore, RecordQuery, WorldStore};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Builder for in-memory worlds laid out per the standard catalog.
pub struct WorldFixture {
    catalog: Catalog,
    world: WorldId,
    store: MemoryStore,
}

impl WorldFixture {
    /// Start a fixture whose entities belong to `world`.
    pub fn new(world: impl Into<WorldId>) -> Self {
        Self {
            catalog: Catalog::standard(),
            world: world.into(),
            store: MemoryStore::new(),
        }
    }

    /// Add following entities to a different world.
    pub fn in_world(mut self, world: impl Into<WorldId>) -> Self {
        self.world = world.into();
        self
    }

    /// Add an entity with just a name.
    pub fn entity(self, kind: EntityKind, id: &str, name: &str) -> Self {
        self.insert(kind, id, Some(name), None)
    }

    /// Add an entity with a name and a description.
    pub fn described(self, kind: EntityKind, id: &str, name: &str, description: &str) -> Self {
        self.insert(kind, id, Some(name), Some(description))
    }

    /// Add a raw row to a kind's collection, scoped to the current world.
    pub fn row(self, kind: EntityKind, mut row: Row) -> Self {
        row.insert(WORLD_FIELD.into(), Value::from(self.world.as_str()));
        let collection = self.config(kind).collection.clone();
        self.store.insert_row(collection, row);
        self
    }

    /// Add a mention from `source` to `target`.
    pub fn mention(self, source: &str, target: &str) -> Self {
        self.store.insert_mention(MentionRow::new(source, target));
        self
    }

    fn insert(self, kind: EntityKind, id: &str, name: Option<&str>, description: Option<&str>) -> Self {
        let config = self.config(kind).clone();
        let mut row = Row::new();
        row.insert("id".into(), Value::from(id));
        if let Some(name) = name {
            row.insert(config.name_field.clone(), Value::from(name));
        }
        if let Some(description) = description {
            row.insert(config.description_field.clone(), Value::from(description));
        }
        self.row(kind, row)
    }

    fn config(&self, kind: EntityKind) -> &KindConfig {
        self.catalog
            .get(kind)
            .unwrap_or_else(|| panic!("standard catalog has no entry for {kind}"))
    }

    /// Finish and hand back the store.
    pub fn into_store(self) -> MemoryStore {
        self.store
    }

    /// Finish and capture a snapshot.
    pub fn snapshot(self) -> WorldSnapshot {
        WorldSnapshot::from_store(&self.store)
    }
}

/// A store wrapper that fails chosen fetches.
pub struct FlakyStore<S> {
    inner: S,
    failing_kinds: HashSet<EntityKind>,
    fail_mentions: bool,
}

impl<S: WorldStore> FlakyStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            failing_kinds: HashSet::new(),
            fail_mentions: false,
        }
    }

    /// Make record fetches for `kind` fail.
    pub fn fail_kind(mut self, kind: EntityKind) -> Self {
        self.failing_kinds.insert(kind);
        self
    }

    /// Make the mention fetch fail.
    pub fn fail_mentions(mut self) -> Self {
        self.fail_mentions = true;
        self
    }
}

#[async_trait]
impl<S: WorldStore> WorldStore for FlakyStore<S> {
    async fn fetch_records(
        &self,
        config: &KindConfig,
        world: &WorldId,
        query: &RecordQuery,
    ) -> Result<Vec<Row>, StoreError> {
        if self.failing_kinds.contains(&config.kind) {
            return Err(StoreError::Unavailable {
                collection: config.collection.clone(),
                reason: "injected failure".into(),
            });
        }
        self.inner.fetch_records(config, world, query).await
    }

    async fn fetch_mentions(
        &self,
        sources: &HashSet<EntityId>,
    ) -> Result<Vec<MentionRow>, StoreError> {
        if self.fail_mentions {
            return Err(StoreError::Query("injected failure".into()));
        }
        self.inner.fetch_mentions(sources).await
    }
}

/// A store wrapper that counts fetches.
pub struct CountingStore<S> {
    inner: S,
    record_fetches: AtomicUsize,
    mention_fetches: AtomicUsize,
}

impl<S: WorldStore> CountingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            record_fetches: AtomicUsize::new(0),
            mention_fetches: AtomicUsize::new(0),
        }
    }

    /// Number of per-kind record fetches so far.
    pub fn record_fetches(&self) -> usize {
        self.record_fetches.load(Ordering::SeqCst)
    }

    /// Number of mention fetches so far.
    pub fn mention_fetches(&self) -> usize {
        self.mention_fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<S: WorldStore> WorldStore for CountingStore<S> {
    async fn fetch_records(
        &self,
        config: &KindConfig,
        world: &WorldId,
        query: &RecordQuery,
    ) -> Result<Vec<Row>, StoreError> {
        self.record_fetches.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch_records(config, world, query).await
    }

    async fn fetch_mentions(
        &self,
        sources: &HashSet<EntityId>,
    ) -> Result<Vec<MentionRow>, StoreError> {
        self.mention_fetches.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch_mentions(sources).await
    }
}
