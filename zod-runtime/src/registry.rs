//! Schema registry: metadata keyed by schema identity.
//!
//! Registries are side tables. Parsing never reads them, so a schema behaves
//! the same whether or not it carries metadata.

use dashmap::DashMap;
use std::sync::LazyLock;
use tracing::debug;

use crate::internals::SchemaId;
use crate::traits::ZodType;
use crate::types::GlobalMeta;

/// A concurrent map from schema identity to metadata of type `M`.
#[derive(Debug)]
pub struct Registry<M> {
    entries: DashMap<SchemaId, M>,
}

impl<M: Clone> Default for Registry<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Clone> Registry<M> {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Register metadata for a schema identity, replacing any previous entry.
    pub fn add(&self, id: SchemaId, meta: M) {
        debug!(%id, "Registering schema metadata");
        self.entries.insert(id, meta);
    }

    /// Register metadata for a schema.
    pub fn add_schema<S: ZodType>(&self, schema: &S, meta: M) {
        self.add(schema.id(), meta);
    }

    /// Get a copy of the metadata for an identity.
    pub fn get(&self, id: SchemaId) -> Option<M> {
        self.entries.get(&id).map(|entry| entry.value().clone())
    }

    /// Get a copy of the metadata for a schema.
    pub fn get_schema<S: ZodType>(&self, schema: &S) -> Option<M> {
        self.get(schema.id())
    }

    pub fn has(&self, id: SchemaId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Remove and return the metadata for an identity.
    pub fn remove(&self, id: SchemaId) -> Option<M> {
        let removed = self.entries.remove(&id).map(|(_, meta)| meta);
        if removed.is_some() {
            debug!(%id, "Removed schema metadata");
        }
        removed
    }

    /// Get the number of registered schemas.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

static GLOBAL_REGISTRY: LazyLock<Registry<GlobalMeta>> = LazyLock::new(Registry::new);

/// The process-wide registry used by `describe`, `with_meta`, and `meta`.
pub fn global_registry() -> &'static Registry<GlobalMeta> {
    &GLOBAL_REGISTRY
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    #[test]
    fn test_registry_crud() {
        let registry: Registry<String> = Registry::new();
        let schema = string();
        assert!(registry.is_empty());

        registry.add_schema(&schema, "first".to_string());
        assert!(registry.has(schema.id()));
        assert_eq!(registry.get_schema(&schema).as_deref(), Some("first"));

        registry.add(schema.id(), "second".to_string());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(schema.id()).as_deref(), Some("second"));

        assert_eq!(registry.remove(schema.id()).as_deref(), Some("second"));
        assert!(!registry.has(schema.id()));
        assert_eq!(registry.remove(schema.id()), None);
    }

    #[test]
    fn test_registries_are_independent() {
        let schema = number();
        let local: Registry<u32> = Registry::new();
        local.add_schema(&schema, 7);
        assert_eq!(local.get_schema(&schema), Some(7));
        assert!(global_registry().get(schema.id()).is_none());
    }

    #[test]
    fn test_with_meta_registers_fork() {
        let base = string();
        let tagged = base.with_meta(GlobalMeta::new().with_title("Email").with_tag("contact"));
        assert!(base.meta().is_none());
        let meta = tagged.meta().unwrap();
        assert_eq!(meta.title.as_deref(), Some("Email"));
        assert_eq!(meta.tags, vec!["contact"]);

        let described = tagged.describe("Primary address");
        let meta = described.meta().unwrap();
        assert_eq!(meta.title.as_deref(), Some("Email"));
        assert_eq!(meta.description.as_deref(), Some("Primary address"));
    }

    #[test]
    fn test_constructor_description_is_registered() {
        let schema = string_with(Params::new().description("User name"));
        assert_eq!(schema.description().as_deref(), Some("User name"));
    }
}
