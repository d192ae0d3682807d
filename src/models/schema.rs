//! Canonical graph schema.
//!
//! Both backends render their provisioning statements from [`SCHEMA`], so the
//! uniqueness, not-null and index set is the same wherever the data lives:
//!
//! | Label | Unique | Not null | Indexed |
//! |-------|--------|----------|---------|
//! | `Episode` | `id` | `created_at` | `created_at` |
//! | `Message` | `id` | `timestamp` | `timestamp`, `role` |
//! | `Entity` | `id` | | `type`, `name` |

/// Label of the root temporal node.
pub const EPISODE_LABEL: &str = "Episode";

/// Value type of a declared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Text.
    String,
    /// Point in time.
    Datetime,
    /// Free-form nested map.
    Object,
}

/// A field declared on a node label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Property name.
    pub name: &'static str,
    /// Value type.
    pub kind: FieldKind,
    /// Must be present and non-null.
    pub required: bool,
    /// Values are unique per label.
    pub unique: bool,
    /// Has a secondary index.
    pub indexed: bool,
}

impl FieldSpec {
    const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            unique: false,
            indexed: false,
        }
    }

    const fn id() -> Self {
        Self {
            unique: true,
            ..Self::new("id", FieldKind::String)
        }
    }

    const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }

    const fn indexed(self) -> Self {
        Self {
            indexed: true,
            ..self
        }
    }
}

/// A node label and its declared fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSpec {
    /// Node label / table name.
    pub label: &'static str,
    /// Declared fields, `id` first.
    pub fields: &'static [FieldSpec],
}

impl TableSpec {
    /// Fields with a uniqueness constraint.
    pub fn unique_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.unique)
    }

    /// Fields that must never be null.
    pub fn required_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.required)
    }

    /// Fields with a secondary index.
    pub fn indexed_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.indexed)
    }
}

/// Node labels provisioned by `build_indices`.
pub const SCHEMA: &[TableSpec] = &[
    TableSpec {
        label: EPISODE_LABEL,
        fields: &[
            FieldSpec::id(),
            FieldSpec::new("created_at", FieldKind::Datetime)
                .required()
                .indexed(),
            FieldSpec::new("title", FieldKind::String),
            FieldSpec::new("summary", FieldKind::String),
        ],
    },
    TableSpec {
        label: "Message",
        fields: &[
            FieldSpec::id(),
            FieldSpec::new("timestamp", FieldKind::Datetime)
                .required()
                .indexed(),
            FieldSpec::new("role", FieldKind::String).indexed(),
            FieldSpec::new("content", FieldKind::String),
        ],
    },
    TableSpec {
        label: "Entity",
        fields: &[
            FieldSpec::id(),
            FieldSpec::new("type", FieldKind::String).indexed(),
            FieldSpec::new("name", FieldKind::String).indexed(),
            FieldSpec::new("properties", FieldKind::Object),
        ],
    },
];

/// Directed, typed relationships between nodes.
pub const RELATIONSHIPS: &[&str] = &["MENTIONS", "HAS_MESSAGE", "REFERS_TO"];

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(
        select: fn(&'static TableSpec) -> Vec<&'static FieldSpec>,
    ) -> Vec<(&'static str, &'static str)> {
        SCHEMA
            .iter()
            .flat_map(|table| {
                select(table)
                    .into_iter()
                    .map(move |field| (table.label, field.name))
            })
            .collect()
    }

    #[test]
    fn test_every_label_has_unique_id() {
        assert_eq!(
            pairs(|t| t.unique_fields().collect()),
            vec![("Episode", "id"), ("Message", "id"), ("Entity", "id")]
        );
    }

    #[test]
    fn test_required_timestamps() {
        assert_eq!(
            pairs(|t| t.required_fields().collect()),
            vec![("Episode", "created_at"), ("Message", "timestamp")]
        );
    }

    #[test]
    fn test_secondary_indices() {
        assert_eq!(
            pairs(|t| t.indexed_fields().collect()),
            vec![
                ("Episode", "created_at"),
                ("Message", "timestamp"),
                ("Message", "role"),
                ("Entity", "type"),
                ("Entity", "name"),
            ]
        );
    }

    #[test]
    fn test_required_fields_are_datetimes() {
        for table in SCHEMA {
            for field in table.required_fields() {
                assert_eq!(field.kind, FieldKind::Datetime, "{}.{}", table.label, field.name);
            }
        }
    }
}
