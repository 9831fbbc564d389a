//! Identifiers and the record shapes read from storage.
//!
//! Rows arrive from the storage collaborator as loose JSON objects. They are
//! validated once here, at the fetch boundary, and everything downstream works
//! with [`EntityRecord`].

use crate::catalog::KindConfig;
use crate::error::RecordError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A raw row as returned by storage.
pub type Row = Map<String, Value>;

/// Field every entity row carries to scope it to a world.
pub const WORLD_FIELD: &str = "world_id";

/// Macro to define a string-backed identifier newtype
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the identifier text.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

define_id!(
    /// Identifier of a world (the tenancy boundary).
    WorldId
);

define_id!(
    /// Identifier of an entity record.
    EntityId
);

/// An entity row after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRecord {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
}

impl EntityRecord {
    /// Validate a raw row against the layout of its kind.
    ///
    /// Only a missing or unusable id rejects the row. A missing name falls back
    /// to the alternate field, then to the empty string.
    pub fn from_row(config: &KindConfig, row: &Row) -> Result<Self, RecordError> {
        let Some(id) = row_id(row) else {
            let collection = config.collection.clone();
            return Err(match row.get("id") {
                None | Some(Value::Null) => RecordError::MissingId { collection },
                Some(_) => RecordError::InvalidId { collection },
            });
        };

        Ok(Self {
            id,
            name: record_name(config, row).unwrap_or_default().to_string(),
            description: non_blank(row, &config.description_field).map(str::to_string),
        })
    }
}

/// Read the id of a row. Numeric ids are accepted and kept as their text.
pub fn row_id(row: &Row) -> Option<EntityId> {
    match row.get("id")? {
        Value::String(s) if !s.is_empty() => Some(EntityId::new(s.clone())),
        Value::Number(n) => Some(EntityId::new(n.to_string())),
        _ => None,
    }
}

/// Read the display name of a row, honoring the fallback field.
pub fn record_name<'a>(config: &KindConfig, row: &'a Row) -> Option<&'a str> {
    string_field(row, &config.name_field).or_else(|| {
        config
            .fallback_name_field
            .as_deref()
            .and_then(|field| string_field(row, field))
    })
}

fn string_field<'a>(row: &'a Row, field: &str) -> Option<&'a str> {
    row.get(field).and_then(Value::as_str)
}

fn non_blank<'a>(row: &'a Row, field: &str) -> Option<&'a str> {
    string_field(row, field).filter(|s| !s.trim().is_empty())
}

/// A directed mention between two entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionRow {
    pub source_entity_id: EntityId,
    pub target_entity_id: EntityId,
}

impl MentionRow {
    pub fn new(source: impl Into<EntityId>, target: impl Into<EntityId>) -> Self {
        Self {
            source_entity_id: source.into(),
            target_entity_id: target.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, EntityKind};
    use serde_json::json;

    fn row(value: Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_record_from_row() {
        let catalog = Catalog::standard();
        let config = catalog.get(EntityKind::Character).unwrap();
        let record = EntityRecord::from_row(
            config,
            &row(json!({"id": "c1", "name": "Zara", "personality": "Restless"})),
        )
        .unwrap();

        assert_eq!(record.id, EntityId::from("c1"));
        assert_eq!(record.name, "Zara");
        assert_eq!(record.description.as_deref(), Some("Restless"));
    }

    #[test]
    fn test_story_name_falls_back() {
        let catalog = Catalog::standard();
        let config = catalog.get(EntityKind::Story).unwrap();

        let titled = EntityRecord::from_row(config, &row(json!({"id": "s1", "title": "Ashfall"})));
        assert_eq!(titled.unwrap().name, "Ashfall");

        let named = EntityRecord::from_row(config, &row(json!({"id": "s2", "name": "Emberfall"})));
        assert_eq!(named.unwrap().name, "Emberfall");
    }

    #[test]
    fn test_missing_name_is_empty() {
        let catalog = Catalog::standard();
        let config = catalog.get(EntityKind::Item).unwrap();
        let record = EntityRecord::from_row(config, &row(json!({"id": 42}))).unwrap();
        assert_eq!(record.id.as_str(), "42");
        assert_eq!(record.name, "");
        assert_eq!(record.description, None);
    }

    #[test]
    fn test_row_id_normalizes_numbers() {
        assert_eq!(row_id(&row(json!({"id": 7}))), Some(EntityId::from("7")));
        assert_eq!(row_id(&row(json!({"id": "i7"}))), Some(EntityId::from("i7")));
        assert_eq!(row_id(&row(json!({"id": ""}))), None);
        assert_eq!(row_id(&row(json!({"name": "Lantern"}))), None);
    }

    #[test]
    fn test_blank_description_is_none() {
        let catalog = Catalog::standard();
        let config = catalog.get(EntityKind::Location).unwrap();
        let record =
            EntityRecord::from_row(config, &row(json!({"id": "l1", "name": "Keep", "description": "  "})))
                .unwrap();
        assert_eq!(record.description, None);
    }

    #[test]
    fn test_rows_without_id_are_rejected() {
        let catalog = Catalog::standard();
        let config = catalog.get(EntityKind::Rule).unwrap();

        let missing = EntityRecord::from_row(config, &row(json!({"name": "Iron binds"})));
        assert!(matches!(missing, Err(RecordError::MissingId { .. })));

        let invalid = EntityRecord::from_row(config, &row(json!({"id": ["x"], "name": "Iron binds"})));
        assert!(matches!(invalid, Err(RecordError::InvalidId { .. })));

        let empty = EntityRecord::from_row(config, &row(json!({"id": "", "name": "Iron binds"})));
        assert!(matches!(empty, Err(RecordError::InvalidId { .. })));
    }
}
