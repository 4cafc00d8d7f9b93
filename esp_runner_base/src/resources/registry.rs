//! Registry of resource types

use super::errors::ResourceError;
use super::traits::ResourceFactory;
use std::collections::HashMap;
use std::sync::Arc;

/// Resource factories by type id
#[derive(Default, Clone)]
pub struct ResourceRegistry {
    factories: HashMap<String, Arc<dyn ResourceFactory>>,
}

impl ResourceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory; type ids must be unique
    pub fn register(&mut self, factory: Box<dyn ResourceFactory>) -> Result<(), ResourceError> {
        let type_id = factory.type_id().to_string();
        if self.factories.contains_key(&type_id) {
            return Err(ResourceError::DuplicateResourceType { type_id });
        }
        self.factories.insert(type_id, Arc::from(factory));
        Ok(())
    }

    /// Builder-style registration
    pub fn with(mut self, factory: Box<dyn ResourceFactory>) -> Result<Self, ResourceError> {
        self.register(factory)?;
        Ok(self)
    }

    pub fn get(&self, type_id: &str) -> Option<&Arc<dyn ResourceFactory>> {
        self.factories.get(type_id)
    }

    pub fn contains(&self, type_id: &str) -> bool {
        self.factories.contains_key(type_id)
    }

    /// Registered type ids, sorted
    pub fn list_resource_types(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.factories.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Type ids with their summaries, sorted by id
    pub fn summaries(&self) -> Vec<(String, String)> {
        self.list_resource_types()
            .into_iter()
            .map(|id| {
                let summary = self.factories[&id].summary().to_string();
                (id, summary)
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl std::fmt::Debug for ResourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceRegistry")
            .field("types", &self.list_resource_types())
            .finish()
    }
}
