//! The storage boundary and an in-memory implementation of it.

use crate::catalog::KindConfig;
use crate::error::StoreError;
use crate::record::{record_name, row_id, EntityId, MentionRow, Row, WorldId, WORLD_FIELD};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

/// Filter applied to a per-kind record fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordQuery {
    /// Case-insensitive substring the name field must contain.
    pub name_contains: Option<String>,
    /// Maximum number of rows to return.
    pub limit: Option<usize>,
}

impl RecordQuery {
    /// Every record, no cap.
    pub fn all() -> Self {
        Self::default()
    }

    /// Records whose name contains `needle`, ignoring case.
    pub fn name_contains(needle: impl Into<String>) -> Self {
        Self {
            name_contains: Some(needle.into()),
            limit: None,
        }
    }

    /// Cap the number of rows.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Check a name against the substring filter.
    pub fn matches(&self, name: &str) -> bool {
        match &self.name_contains {
            Some(needle) if !needle.is_empty() => {
                name.to_lowercase().contains(&needle.to_lowercase())
            }
            _ => true,
        }
    }
}

/// Read access to world content.
///
/// Implementations must scope every record fetch to the given world.
#[async_trait]
pub trait WorldStore: Send + Sync {
    /// Fetch rows of one kind belonging to `world`.
    async fn fetch_records(
        &self,
        config: &KindConfig,
        world: &WorldId,
        query: &RecordQuery,
    ) -> Result<Vec<Row>, StoreError>;

    /// Fetch every mention whose source is in `sources`, in one lookup.
    async fn fetch_mentions(
        &self,
        sources: &HashSet<EntityId>,
    ) -> Result<Vec<MentionRow>, StoreError>;
}

#[async_trait]
impl<T: WorldStore + ?Sized> WorldStore for Arc<T> {
    async fn fetch_records(
        &self,
        config: &KindConfig,
        world: &WorldId,
        query: &RecordQuery,
    ) -> Result<Vec<Row>, StoreError> {
        (**self).fetch_records(config, world, query).await
    }

    async fn fetch_mentions(
        &self,
        sources: &HashSet<EntityId>,
    ) -> Result<Vec<MentionRow>, StoreError> {
        (**self).fetch_mentions(sources).await
    }
}

#[async_trait]
impl<T: WorldStore + ?Sized> WorldStore for &T {
    async fn fetch_records(
        &self,
        config: &KindConfig,
        world: &WorldId,
        query: &RecordQuery,
    ) -> Result<Vec<Row>, StoreError> {
        (**self).fetch_records(config, world, query).await
    }

    async fn fetch_mentions(
        &self,
        sources: &HashSet<EntityId>,
    ) -> Result<Vec<MentionRow>, StoreError> {
        (**self).fetch_mentions(sources).await
    }
}

#[derive(Debug, Default)]
struct Tables {
    /// Rows per collection, in insertion order.
    collections: HashMap<String, Vec<Row>>,
    mentions: Vec<MentionRow>,
}

/// A [`WorldStore`] held entirely in memory.
///
/// Backs snapshots, the command-line tool and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row to a collection.
    pub fn insert_row(&self, collection: impl Into<String>, row: Row) {
        let mut tables = self.tables.write().unwrap_or_else(|e| e.into_inner());
        tables.collections.entry(collection.into()).or_default().push(row);
    }

    /// Append a mention.
    pub fn insert_mention(&self, mention: MentionRow) {
        let mut tables = self.tables.write().unwrap_or_else(|e| e.into_inner());
        tables.mentions.push(mention);
    }

    /// Delete a row by id. Mentions pointing at it are left in place.
    pub fn remove_row(&self, collection: &str, id: &EntityId) -> bool {
        let mut tables = self.tables.write().unwrap_or_else(|e| e.into_inner());
        let Some(rows) = tables.collections.get_mut(collection) else {
            return false;
        };
        let before = rows.len();
        rows.retain(|row| row_id(row).as_ref() != Some(id));
        rows.len() != before
    }

    /// Copy out every collection.
    pub fn collections(&self) -> HashMap<String, Vec<Row>> {
        let tables = self.tables.read().unwrap_or_else(|e| e.into_inner());
        tables.collections.clone()
    }

    /// Copy out every mention.
    pub fn mentions(&self) -> Vec<MentionRow> {
        let tables = self.tables.read().unwrap_or_else(|e| e.into_inner());
        tables.mentions.clone()
    }
}

fn in_world(row: &Row, world: &WorldId) -> bool {
    row.get(WORLD_FIELD).and_then(Value::as_str) == Some(world.as_str())
}

#[async_trait]
impl WorldStore for MemoryStore {
    async fn fetch_records(
        &self,
        config: &KindConfig,
        world: &WorldId,
        query: &RecordQuery,
    ) -> Result<Vec<Row>, StoreError> {
        let tables = self.tables.read().unwrap_or_else(|e| e.into_inner());
        let Some(rows) = tables.collections.get(&config.collection) else {
            return Ok(Vec::new());
        };

        Ok(rows
            .iter()
            .filter(|row| in_world(row, world))
            .filter(|row| query.matches(record_name(config, row).unwrap_or_default()))
            .take(query.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn fetch_mentions(
        &self,
        sources: &HashSet<EntityId>,
    ) -> Result<Vec<MentionRow>, StoreError> {
        let tables = self.tables.read().unwrap_or_else(|e| e.into_inner());
        Ok(tables
            .mentions
            .iter()
            .filter(|m| sources.contains(&m.source_entity_id))
            .cloned()
            .collect())
    }
}
