//! Named transports producing backends

use super::local::LocalTransport;
use super::traits::Backend;
use crate::config::{ConfigurationError, TargetConfig};
use std::collections::HashMap;
use std::sync::Arc;

/// Factory for one kind of backend connection
pub trait TransportFactory: Send + Sync {
    /// Name selected by `TargetConfig::backend`
    fn name(&self) -> &str;

    /// Open a connection to the configured target
    fn connect(&self, target: &TargetConfig) -> Result<Arc<dyn Backend>, ConfigurationError>;
}

/// Registry of available transports
pub struct TransportRegistry {
    factories: HashMap<String, Box<dyn TransportFactory>>,
}

impl TransportRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registry with the built-in `local` transport
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(LocalTransport));
        registry
    }

    /// Register a transport, replacing any with the same name
    pub fn register(&mut self, factory: Box<dyn TransportFactory>) {
        self.factories.insert(factory.name().to_string(), factory);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered transport names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.keys().cloned().collect();
        names.sort();
        names
    }

    /// Connect to the target named by `target.backend`
    pub fn create_backend(
        &self,
        target: &TargetConfig,
    ) -> Result<Arc<dyn Backend>, ConfigurationError> {
        let factory = self.factories.get(&target.backend).ok_or_else(|| {
            log_error!(
                crate::logging::codes::error::UNKNOWN_BACKEND,
                "Can't find transport backend",
                "backend" => &target.backend
            );
            ConfigurationError::UnknownBackend {
                name: target.backend.clone(),
                available: self.names(),
            }
        })?;

        let backend = factory.connect(target).map_err(|e| {
            log_error!(
                crate::logging::codes::error::CONNECTION_FAILED,
                "Can't connect to transport backend",
                "backend" => &target.backend,
                "reason" => &e
            );
            e
        })?;

        log_debug!(
            "Backend connected",
            "backend" => backend.name(),
            "os" => backend.os()
        );
        Ok(backend)
    }
}

impl Default for TransportRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
