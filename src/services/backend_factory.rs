//! Backend factory for graph adapters.
//!
//! Adapters are selected by a database-type tag through a registration table
//! rather than a chain of conditionals. Each entry pairs a tag with a
//! constructor and a type descriptor:
//!
//! ```text
//! BackendRegistry
//!   ├── "neo4j"     → Neo4jAdapter      (feature `neo4j`)
//!   └── "surrealdb" → SurrealDbAdapter  (feature `surrealdb`)
//! ```
//!
//! Tags are matched case-insensitively and surrounding whitespace is ignored.
//! Adding a backend is one [`AdapterDescriptor`] registration.

use crate::models::DatabaseType;
use crate::storage::{GraphAdapter, GraphBackend, IntoRecords};
use crate::{Error, Result};
use once_cell::sync::Lazy;
use std::any::TypeId;
use std::fmt;
use std::sync::{PoisonError, RwLock};

/// Builds a fresh, disconnected adapter.
pub type Constructor = fn() -> Box<dyn GraphBackend>;

/// Registration entry for one backend.
#[derive(Clone, Copy)]
pub struct AdapterDescriptor {
    /// Canonical lowercase tag.
    pub tag: &'static str,
    /// Fully qualified adapter type name.
    pub type_name: &'static str,
    /// Adapter type id, for comparing against a downcast target.
    pub type_id: TypeId,
    constructor: Constructor,
}

fn construct<A>() -> Box<dyn GraphBackend>
where
    A: GraphAdapter + Default,
    A::QueryResult: IntoRecords,
{
    Box::new(A::default())
}

impl AdapterDescriptor {
    /// Describes adapter type `A` under `tag`.
    #[must_use]
    pub fn of<A>(tag: &'static str) -> Self
    where
        A: GraphAdapter + Default,
        A::QueryResult: IntoRecords,
    {
        Self {
            tag,
            type_name: std::any::type_name::<A>(),
            type_id: TypeId::of::<A>(),
            constructor: construct::<A>,
        }
    }

    /// Describes a backend built by a custom constructor.
    #[must_use]
    pub fn with_constructor<A: 'static>(tag: &'static str, constructor: Constructor) -> Self {
        Self {
            tag,
            type_name: std::any::type_name::<A>(),
            type_id: TypeId::of::<A>(),
            constructor,
        }
    }

    /// Builds a fresh adapter.
    #[must_use]
    pub fn construct(&self) -> Box<dyn GraphBackend> {
        (self.constructor)()
    }

    /// Returns true when this entry describes adapter type `A`.
    #[must_use]
    pub fn is<A: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<A>()
    }

    fn matches(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag.trim())
    }
}

impl fmt::Debug for AdapterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterDescriptor")
            .field("tag", &self.tag)
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

impl PartialEq for AdapterDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag && self.type_id == other.type_id
    }
}

/// Table of registered backends.
#[derive(Debug, Clone, Default)]
pub struct BackendRegistry {
    entries: Vec<AdapterDescriptor>,
}

impl BackendRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every backend compiled into the crate.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut entries = Vec::new();
        #[cfg(feature = "neo4j")]
        entries.push(AdapterDescriptor::of::<crate::storage::Neo4jAdapter>(
            crate::storage::neo4j::BACKEND_NAME,
        ));
        #[cfg(feature = "surrealdb")]
        entries.push(AdapterDescriptor::of::<crate::storage::SurrealDbAdapter>(
            crate::storage::surrealdb::BACKEND_NAME,
        ));
        Self { entries }
    }

    /// Registers a backend, replacing any entry with the same tag.
    ///
    /// Returns the replaced entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] when the tag is empty, not lowercase, or
    /// padded with whitespace.
    pub fn register(&mut self, descriptor: AdapterDescriptor) -> Result<Option<AdapterDescriptor>> {
        let tag = descriptor.tag;
        if tag.is_empty() || tag.trim() != tag || tag.to_ascii_lowercase() != tag {
            return Err(Error::InvalidInput(format!(
                "backend tag must be non-empty lowercase without padding: {tag:?}"
            )));
        }

        let previous = self
            .entries
            .iter()
            .position(|entry| entry.tag == tag)
            .map(|index| self.entries.remove(index));
        tracing::debug!(
            tag,
            type_name = descriptor.type_name,
            replaced = previous.is_some(),
            "registered graph backend"
        );
        self.entries.push(descriptor);
        Ok(previous)
    }

    /// Looks up the entry for `tag`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedBackend`] for an unregistered tag.
    pub fn type_of(&self, tag: &str) -> Result<AdapterDescriptor> {
        self.entries
            .iter()
            .find(|entry| entry.matches(tag))
            .copied()
            .ok_or_else(|| Error::UnsupportedBackend(tag.trim().to_string()))
    }

    /// Builds a fresh, disconnected adapter for `tag`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedBackend`] for an unregistered tag.
    pub fn create(&self, tag: &str) -> Result<Box<dyn GraphBackend>> {
        let descriptor = self.type_of(tag).inspect_err(|e| {
            tracing::warn!(tag, error = %e, "unsupported graph backend requested");
        })?;
        tracing::debug!(
            tag = descriptor.tag,
            type_name = descriptor.type_name,
            "creating graph backend"
        );
        Ok(descriptor.construct())
    }

    /// Registered tags, in registration order.
    #[must_use]
    pub fn tags(&self) -> Vec<&'static str> {
        self.entries.iter().map(|entry| entry.tag).collect()
    }

    /// Returns true when `tag` is registered.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.entries.iter().any(|entry| entry.matches(tag))
    }
}

static REGISTRY: Lazy<RwLock<BackendRegistry>> =
    Lazy::new(|| RwLock::new(BackendRegistry::with_builtins()));

/// Process-wide entry point over the default registry.
///
/// # Example
///
/// ```rust,ignore
/// use graphdb::BackendFactory;
///
/// let adapter = BackendFactory::create("SurrealDB")?;
/// assert_eq!(adapter.backend_name(), "surrealdb");
///
/// let descriptor = BackendFactory::type_of("neo4j")?;
/// assert!(descriptor.is::<graphdb::storage::Neo4jAdapter>());
/// ```
pub struct BackendFactory;

impl BackendFactory {
    /// Builds a fresh, disconnected adapter for `tag`.
    pub fn create(tag: &str) -> Result<Box<dyn GraphBackend>> {
        REGISTRY
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .create(tag)
    }

    /// Builds a fresh adapter for a configured database type.
    pub fn create_for(database_type: DatabaseType) -> Result<Box<dyn GraphBackend>> {
        Self::create(database_type.as_str())
    }

    /// Returns the descriptor registered for `tag` without constructing it.
    pub fn type_of(tag: &str) -> Result<AdapterDescriptor> {
        REGISTRY
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .type_of(tag)
    }

    /// Tags accepted by [`BackendFactory::create`].
    #[must_use]
    pub fn supported_types() -> Vec<&'static str> {
        REGISTRY
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .tags()
    }

    /// Adds a backend to the default registry.
    pub fn register(descriptor: AdapterDescriptor) -> Result<Option<AdapterDescriptor>> {
        REGISTRY
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .register(descriptor)
    }
}
