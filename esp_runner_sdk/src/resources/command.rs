//! `command` resource: output of an arbitrary shell command

use super::{run, string_arg, unknown_property};
use esp_runner_base::backend::CommandOutput;
use esp_runner_base::resources::{Resource, ResourceError, ResourceFacade, ResourceFactory};
use serde_json::Value;
use std::sync::OnceLock;

pub struct CommandFactory;

impl ResourceFactory for CommandFactory {
    fn type_id(&self) -> &str {
        "command"
    }

    fn summary(&self) -> &str {
        "Output and exit status of a shell command"
    }

    fn create(&self, facade: &ResourceFacade, args: &[Value]) -> Result<Box<dyn Resource>, ResourceError> {
        Ok(Box::new(CommandResource {
            facade: facade.clone(),
            command: string_arg("command", args, 0, "command")?,
            output: OnceLock::new(),
        }))
    }
}

/// Runs its command once, on first property access
pub struct CommandResource {
    facade: ResourceFacade,
    command: String,
    output: OnceLock<CommandOutput>,
}

impl CommandResource {
    fn output(&self) -> Result<&CommandOutput, ResourceError> {
        if let Some(output) = self.output.get() {
            return Ok(output);
        }
        let output = run(&self.facade, &self.describe(), &self.command)?;
        Ok(self.output.get_or_init(|| output))
    }
}

impl Resource for CommandResource {
    fn resource_type(&self) -> &str {
        "command"
    }

    fn describe(&self) -> String {
        format!("Command {}", self.command)
    }

    fn property(&self, name: &str) -> Result<Value, ResourceError> {
        match name {
            "stdout" => Ok(Value::String(self.output()?.stdout.clone())),
            "stderr" => Ok(Value::String(self.output()?.stderr.clone())),
            "exit_status" => Ok(Value::from(self.output()?.exit_code)),
            other => Err(unknown_property(self.describe(), other)),
        }
    }

    fn properties(&self) -> Vec<&'static str> {
        vec!["stdout", "stderr", "exit_status"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::test_support;
    use esp_runner_base::backend::MockBackend;
    use serde_json::json;

    #[test]
    fn test_runs_once_and_exposes_output() {
        let (facade, backend) = test_support::facade(
            MockBackend::new().with_command("uname -s", CommandOutput::success("Linux\n")),
        );
        let resource = facade.resource("command", &[json!("uname -s")]).unwrap();

        assert_eq!(resource.describe(), "Command uname -s");
        assert_eq!(resource.property("stdout").unwrap(), json!("Linux\n"));
        assert_eq!(resource.property("exit_status").unwrap(), json!(0));
        assert_eq!(resource.property("stderr").unwrap(), json!(""));
        assert_eq!(backend.commands().len(), 1);
    }

    #[test]
    fn test_missing_command_argument() {
        let (facade, _) = test_support::facade(MockBackend::new());
        assert!(matches!(
            facade.resource("command", &[]).err(),
            Some(ResourceError::InvalidArguments { .. })
        ));
    }
}
