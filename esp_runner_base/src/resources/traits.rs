//! Resource extension points

use super::errors::ResourceError;
use super::facade::ResourceFacade;
use serde_json::Value;

/// Typed accessor querying the target on behalf of a check
pub trait Resource: Send + Sync {
    /// Registered type id (`file`, `service`, ...)
    fn resource_type(&self) -> &str;

    /// Human readable name used in check descriptions
    fn describe(&self) -> String;

    /// Reason this resource cannot be evaluated on the current backend
    ///
    /// Checks whose subject reports a reason are compiled into skipped
    /// placeholders and never executed.
    fn skip_reason(&self) -> Option<String> {
        None
    }

    /// Look up a property value, querying the backend as needed
    fn property(&self, name: &str) -> Result<Value, ResourceError>;

    /// Property names this resource understands
    fn properties(&self) -> Vec<&'static str> {
        Vec::new()
    }
}

/// Constructor for one resource type
pub trait ResourceFactory: Send + Sync {
    /// Type id this factory is registered under
    fn type_id(&self) -> &str;

    /// One-line summary for listings
    fn summary(&self) -> &str {
        ""
    }

    /// Build a new instance bound to the facade's connection
    fn create(
        &self,
        facade: &ResourceFacade,
        args: &[Value],
    ) -> Result<Box<dyn Resource>, ResourceError>;
}
