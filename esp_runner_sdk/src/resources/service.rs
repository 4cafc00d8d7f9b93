//! `service` resource: systemd unit state

use super::{has_tool, run, shell_quote, string_arg, unknown_property};
use esp_runner_base::resources::{Resource, ResourceError, ResourceFacade, ResourceFactory};
use serde_json::Value;

pub struct ServiceFactory;

impl ResourceFactory for ServiceFactory {
    fn type_id(&self) -> &str {
        "service"
    }

    fn summary(&self) -> &str {
        "Service running, enabled and loaded state (systemd)"
    }

    fn create(&self, facade: &ResourceFacade, args: &[Value]) -> Result<Box<dyn Resource>, ResourceError> {
        let name = string_arg("service", args, 0, "name")?;
        let describe = format!("Service {}", name);
        let systemd = facade.os().is_unix() && has_tool(facade, &describe, "systemctl")?;

        Ok(Box::new(ServiceResource {
            facade: facade.clone(),
            name,
            systemd,
        }))
    }
}

pub struct ServiceResource {
    facade: ResourceFacade,
    name: String,
    systemd: bool,
}

impl ServiceResource {
    /// First line of `systemctl <verb> <unit>`; exit status is ignored since
    /// inactive units exit non-zero
    fn systemctl(&self, args: &str) -> Result<String, ResourceError> {
        let command = format!("systemctl {} {}", args, shell_quote(&self.name));
        let output = run(&self.facade, &self.describe(), &command)?;
        Ok(output.stdout.lines().next().unwrap_or("").trim().to_string())
    }
}

impl Resource for ServiceResource {
    fn resource_type(&self) -> &str {
        "service"
    }

    fn describe(&self) -> String {
        format!("Service {}", self.name)
    }

    fn skip_reason(&self) -> Option<String> {
        if !self.facade.os().is_unix() {
            Some(format!("Resource service is not supported on {}", self.facade.os()))
        } else if !self.systemd {
            Some("Resource service requires systemd".to_string())
        } else {
            None
        }
    }

    fn property(&self, name: &str) -> Result<Value, ResourceError> {
        let state = match name {
            "running" => self.systemctl("is-active")? == "active",
            "enabled" => self.systemctl("is-enabled")? == "enabled",
            "loaded" => self.systemctl("show -p LoadState --value")? == "loaded",
            other => return Err(unknown_property(self.describe(), other)),
        };
        Ok(Value::Bool(state))
    }

    fn properties(&self) -> Vec<&'static str> {
        vec!["running", "enabled", "loaded"]
    }
}
