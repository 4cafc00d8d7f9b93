//! `package` resource: installation status through rpm or dpkg

use super::{has_tool, run, shell_quote, string_arg, unknown_property};
use esp_runner_base::resources::{Resource, ResourceError, ResourceFacade, ResourceFactory};
use serde_json::Value;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Rpm,
    Dpkg,
}

impl PackageManager {
    fn query(self, package: &str) -> String {
        match self {
            PackageManager::Rpm => {
                format!("rpm -q --qf '%{{VERSION}}-%{{RELEASE}}\\n' {}", shell_quote(package))
            }
            PackageManager::Dpkg => {
                format!("dpkg-query -W -f='${{Status}}|${{Version}}\\n' {}", shell_quote(package))
            }
        }
    }

    /// Installed version, if the query output says installed
    fn parse(self, stdout: &str) -> Option<String> {
        let line = stdout.lines().next()?.trim();
        match self {
            PackageManager::Rpm => (!line.is_empty()).then(|| line.to_string()),
            PackageManager::Dpkg => {
                let (status, version) = line.split_once('|')?;
                status.ends_with(" installed").then(|| version.to_string())
            }
        }
    }
}

pub struct PackageFactory;

impl ResourceFactory for PackageFactory {
    fn type_id(&self) -> &str {
        "package"
    }

    fn summary(&self) -> &str {
        "Package installation status and version (rpm or dpkg)"
    }

    fn create(&self, facade: &ResourceFacade, args: &[Value]) -> Result<Box<dyn Resource>, ResourceError> {
        let name = string_arg("package", args, 0, "name")?;
        let describe = format!("System Package {}", name);

        let manager = if !facade.os().is_linux() {
            None
        } else if has_tool(facade, &describe, "rpm")? {
            Some(PackageManager::Rpm)
        } else if has_tool(facade, &describe, "dpkg-query")? {
            Some(PackageManager::Dpkg)
        } else {
            None
        };

        Ok(Box::new(PackageResource {
            facade: facade.clone(),
            name,
            manager,
            version: OnceLock::new(),
        }))
    }
}

pub struct PackageResource {
    facade: ResourceFacade,
    name: String,
    manager: Option<PackageManager>,
    version: OnceLock<Option<String>>,
}

impl PackageResource {
    pub fn manager(&self) -> Option<PackageManager> {
        self.manager
    }

    fn version(&self) -> Result<Option<&String>, ResourceError> {
        if let Some(version) = self.version.get() {
            return Ok(version.as_ref());
        }

        let version = match self.manager {
            Some(manager) => {
                let output = run(&self.facade, &self.describe(), &manager.query(&self.name))?;
                if output.is_success() {
                    manager.parse(&output.stdout)
                } else {
                    None
                }
            }
            None => None,
        };
        Ok(self.version.get_or_init(|| version).as_ref())
    }
}

impl Resource for PackageResource {
    fn resource_type(&self) -> &str {
        "package"
    }

    fn describe(&self) -> String {
        format!("System Package {}", self.name)
    }

    fn skip_reason(&self) -> Option<String> {
        if !self.facade.os().is_linux() {
            Some(format!("Resource package is not supported on {}", self.facade.os()))
        } else if self.manager.is_none() {
            Some("Resource package found no supported package manager (rpm, dpkg)".to_string())
        } else {
            None
        }
    }

    fn property(&self, name: &str) -> Result<Value, ResourceError> {
        match name {
            "installed" => Ok(Value::Bool(self.version()?.is_some())),
            "version" => Ok(self.version()?.map_or(Value::Null, |v| Value::String(v.clone()))),
            other => Err(unknown_property(self.describe(), other)),
        }
    }

    fn properties(&self) -> Vec<&'static str> {
        vec!["installed", "version"]
    }
}
