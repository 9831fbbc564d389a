//! Entity kinds and the registry describing where each kind is stored.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kinds of entities that can live in a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// A person or creature in the setting.
    Character,
    /// A geographic location or place.
    Location,
    /// An organization, faction, or group.
    Organization,
    /// An item, artifact, or object.
    Item,
    /// A rule of the world (magic system, law, custom).
    Rule,
    /// A written story set in the world.
    Story,
    /// A timeline event.
    Event,
}

impl EntityKind {
    /// Every kind, in catalog order.
    pub const ALL: [EntityKind; 7] = [
        EntityKind::Character,
        EntityKind::Location,
        EntityKind::Organization,
        EntityKind::Item,
        EntityKind::Rule,
        EntityKind::Story,
        EntityKind::Event,
    ];

    /// The wire name used in graph and search payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Character => "character",
            EntityKind::Location => "location",
            EntityKind::Organization => "organization",
            EntityKind::Item => "item",
            EntityKind::Rule => "rule",
            EntityKind::Story => "story",
            EntityKind::Event => "event",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown kind name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown entity kind: {0}")]
pub struct UnknownKind(pub String);

impl FromStr for EntityKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        EntityKind::ALL
            .into_iter()
            .find(|k| k.as_str() == lower)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

/// Storage layout for one entity kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindConfig {
    /// The kind this entry describes.
    pub kind: EntityKind,
    /// Backing collection (table) name.
    pub collection: String,
    /// Field holding the human-readable name.
    pub name_field: String,
    /// Field read when `name_field` is missing on a record.
    pub fallback_name_field: Option<String>,
    /// Field used as the short summary in search results.
    pub description_field: String,
}

impl KindConfig {
    /// Create a new entry.
    pub fn new(
        kind: EntityKind,
        collection: impl Into<String>,
        name_field: impl Into<String>,
        description_field: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            collection: collection.into(),
            name_field: name_field.into(),
            fallback_name_field: None,
            description_field: description_field.into(),
        }
    }

    /// Set the alternate name field.
    pub fn with_fallback_name(mut self, field: impl Into<String>) -> Self {
        self.fallback_name_field = Some(field.into());
        self
    }
}

/// Immutable registry of entity kinds and their storage layout.
///
/// Owned by the aggregator and handed to the collector and ranker by
/// reference. Kinds keep the order they were registered in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<KindConfig>,
}

impl Catalog {
    /// Build a catalog from explicit entries.
    ///
    /// A later entry for an already registered kind replaces the earlier one.
    pub fn new(entries: impl IntoIterator<Item = KindConfig>) -> Self {
        let mut catalog = Self {
            entries: Vec::new(),
        };
        for entry in entries {
            match catalog.entries.iter_mut().find(|e| e.kind == entry.kind) {
                Some(existing) => *existing = entry,
                None => catalog.entries.push(entry),
            }
        }
        catalog
    }

    /// The layout used by the hosted worldbuilding schema.
    pub fn standard() -> Self {
        Self::new([
            KindConfig::new(EntityKind::Character, "characters", "name", "personality"),
            KindConfig::new(EntityKind::Location, "locations", "name", "description"),
            KindConfig::new(EntityKind::Organization, "organizations", "name", "purpose"),
            KindConfig::new(EntityKind::Item, "items", "name", "description"),
            KindConfig::new(EntityKind::Rule, "rules", "name", "description"),
            KindConfig::new(EntityKind::Story, "stories", "title", "summary")
                .with_fallback_name("name"),
            KindConfig::new(EntityKind::Event, "timeline_events", "name", "description")
                .with_fallback_name("title"),
        ])
    }

    /// Get the config for a kind.
    pub fn get(&self, kind: EntityKind) -> Option<&KindConfig> {
        self.entries.iter().find(|e| e.kind == kind)
    }

    /// All registered configs.
    pub fn entries(&self) -> &[KindConfig] {
        &self.entries
    }

    /// All registered kinds.
    pub fn kinds(&self) -> impl Iterator<Item = EntityKind> + '_ {
        self.entries.iter().map(|e| e.kind)
    }

    /// Number of registered kinds.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no kinds are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}
