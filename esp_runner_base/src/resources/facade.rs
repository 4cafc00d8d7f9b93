//! Resource accessor facade

use super::errors::ResourceError;
use super::registry::ResourceRegistry;
use super::traits::Resource;
use crate::backend::{Backend, CommandError, CommandOutput, Connection, OsInfo};
use serde_json::Value;
use std::sync::Arc;

/// Entry point resources are created through
///
/// Cheap to clone; clones share the connection and registry. Instances are
/// never cached: every [`ResourceFacade::resource`] call builds a new one.
#[derive(Clone, Debug)]
pub struct ResourceFacade {
    connection: Arc<Connection>,
    registry: Arc<ResourceRegistry>,
}

impl ResourceFacade {
    pub fn new(connection: Connection, registry: Arc<ResourceRegistry>) -> Self {
        Self {
            connection: Arc::new(connection),
            registry,
        }
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    pub fn backend(&self) -> &Arc<dyn Backend> {
        self.connection.backend()
    }

    pub fn os(&self) -> &OsInfo {
        self.connection.os()
    }

    /// Run a command through the session's escalation wrapper
    pub fn run_command(&self, command: &str) -> Result<CommandOutput, CommandError> {
        self.connection.run_command(command)
    }

    /// Construct a new resource of the given type
    pub fn resource(&self, type_id: &str, args: &[Value]) -> Result<Arc<dyn Resource>, ResourceError> {
        let factory = self
            .registry
            .get(type_id)
            .ok_or_else(|| ResourceError::UnknownResourceType {
                type_id: type_id.to_string(),
            })?;

        factory.create(self, args).map(Arc::from)
    }

    pub fn has_resource_type(&self, type_id: &str) -> bool {
        self.registry.contains(type_id)
    }

    /// Type ids callable through this facade
    pub fn resource_types(&self) -> Vec<String> {
        self.registry.list_resource_types()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Minimal resource types shared by the crate's tests

    use super::*;
    use crate::resources::ResourceFactory;

    /// `echo <text>`: property `stdout`
    pub struct EchoFactory;

    pub struct EchoResource {
        facade: ResourceFacade,
        text: String,
    }

    impl ResourceFactory for EchoFactory {
        fn type_id(&self) -> &str {
            "echo"
        }

        fn create(
            &self,
            facade: &ResourceFacade,
            args: &[Value],
        ) -> Result<Box<dyn Resource>, ResourceError> {
            let text = args
                .first()
                .and_then(Value::as_str)
                .ok_or_else(|| ResourceError::InvalidArguments {
                    type_id: "echo".to_string(),
                    reason: "expected text".to_string(),
                })?;
            Ok(Box::new(EchoResource {
                facade: facade.clone(),
                text: text.to_string(),
            }))
        }
    }

    impl Resource for EchoResource {
        fn resource_type(&self) -> &str {
            "echo"
        }

        fn describe(&self) -> String {
            format!("Echo {}", self.text)
        }

        fn property(&self, name: &str) -> Result<Value, ResourceError> {
            match name {
                "stdout" => {
                    let output = self
                        .facade
                        .run_command(&format!("echo {}", self.text))
                        .map_err(|source| ResourceError::CommandFailed {
                            resource: self.describe(),
                            source,
                        })?;
                    Ok(Value::String(output.stdout.trim_end().to_string()))
                }
                other => Err(ResourceError::UnknownProperty {
                    resource: self.describe(),
                    property: other.to_string(),
                }),
            }
        }
    }

    /// Resource that always declares itself unsupported
    pub struct UnsupportedFactory;

    pub struct UnsupportedResource;

    impl ResourceFactory for UnsupportedFactory {
        fn type_id(&self) -> &str {
            "unsupported"
        }

        fn create(
            &self,
            _facade: &ResourceFacade,
            _args: &[Value],
        ) -> Result<Box<dyn Resource>, ResourceError> {
            Ok(Box::new(UnsupportedResource))
        }
    }

    impl Resource for UnsupportedResource {
        fn resource_type(&self) -> &str {
            "unsupported"
        }

        fn describe(&self) -> String {
            "Unsupported".to_string()
        }

        fn skip_reason(&self) -> Option<String> {
            Some("Resource unsupported is not supported on this OS".to_string())
        }

        fn property(&self, name: &str) -> Result<Value, ResourceError> {
            panic!("skipped resource queried for '{}'", name)
        }
    }

    pub fn registry() -> Arc<ResourceRegistry> {
        let mut registry = ResourceRegistry::new();
        registry.register(Box::new(EchoFactory)).unwrap();
        registry.register(Box::new(UnsupportedFactory)).unwrap();
        Arc::new(registry)
    }

    pub fn facade(backend: Arc<dyn Backend>) -> ResourceFacade {
        ResourceFacade::new(Connection::direct(backend), registry())
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::backend::MockBackend;
    use crate::escalation::EscalationConfig;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn test_each_call_builds_new_instance() {
        let facade = facade(Arc::new(MockBackend::new()));
        let first = facade.resource("echo", &[json!("a")]).unwrap();
        let second = facade.resource("echo", &[json!("a")]).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_unknown_type() {
        let facade = facade(Arc::new(MockBackend::new()));
        assert_matches!(
            facade.resource("registry_key", &[]).err(),
            Some(ResourceError::UnknownResourceType { ref type_id }) if type_id == "registry_key"
        );
        assert_eq!(facade.resource_types(), vec!["echo", "unsupported"]);
    }

    #[test]
    fn test_resource_commands_go_through_wrapper() {
        let backend = Arc::new(
            MockBackend::new().with_command("echo hi", crate::backend::CommandOutput::success("hi\n")),
        );
        let escalation = EscalationConfig::new().with_sudo().with_options("-n");
        let facade = ResourceFacade::new(Connection::new(backend.clone(), &escalation), registry());

        let echo = facade.resource("echo", &[json!("hi")]).unwrap();
        assert_eq!(echo.property("stdout").unwrap(), json!("hi"));
        assert_eq!(backend.commands(), vec!["sudo -n echo hi".to_string()]);
    }

    #[test]
    fn test_unreachable_backend_fails_fast() {
        let facade = facade(Arc::new(MockBackend::unreachable()));
        let echo = facade.resource("echo", &[json!("hi")]).unwrap();
        assert_matches!(
            echo.property("stdout"),
            Err(ResourceError::CommandFailed { ref source, .. }) if source.is_connection_error()
        );
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = ResourceRegistry::new();
        registry.register(Box::new(EchoFactory)).unwrap();
        assert_matches!(
            registry.register(Box::new(EchoFactory)),
            Err(ResourceError::DuplicateResourceType { .. })
        );
    }
}
