//! `file` resource: metadata and content of a path

use super::{run, shell_quote, string_arg, unknown_property};
use esp_runner_base::resources::{Resource, ResourceError, ResourceFacade, ResourceFactory};
use serde_json::Value;
use std::sync::OnceLock;

pub struct FileFactory;

impl ResourceFactory for FileFactory {
    fn type_id(&self) -> &str {
        "file"
    }

    fn summary(&self) -> &str {
        "File metadata (type, mode, owner, group, size) and content"
    }

    fn create(&self, facade: &ResourceFacade, args: &[Value]) -> Result<Box<dyn Resource>, ResourceError> {
        Ok(Box::new(FileResource {
            facade: facade.clone(),
            path: string_arg("file", args, 0, "path")?,
            metadata: OnceLock::new(),
            content: OnceLock::new(),
        }))
    }
}

/// Result of one `stat` call
#[derive(Debug, Clone, PartialEq)]
struct FileMetadata {
    kind: String,
    mode: String,
    owner: String,
    group: String,
    size: u64,
}

impl FileMetadata {
    /// Parse `type|mode|owner|group|size`
    fn parse(line: &str) -> Option<Self> {
        let mut parts = line.trim().splitn(5, '|');
        let kind = parts.next()?.to_ascii_lowercase();
        let mode = parts.next()?;
        let owner = parts.next()?.to_string();
        let group = parts.next()?.to_string();
        let size = parts.next()?.parse().ok()?;

        if mode.is_empty() || !mode.chars().all(|c| c.is_digit(8)) {
            return None;
        }

        Some(Self {
            kind,
            mode: format!("{:0>4}", mode),
            owner,
            group,
            size,
        })
    }

    fn is_file(&self) -> bool {
        self.kind.starts_with("regular")
    }

    fn is_directory(&self) -> bool {
        self.kind == "directory"
    }
}

pub struct FileResource {
    facade: ResourceFacade,
    path: String,
    metadata: OnceLock<Option<FileMetadata>>,
    content: OnceLock<Option<String>>,
}

impl FileResource {
    fn stat_command(&self) -> String {
        let format = if self.facade.os().is_linux() {
            "-c '%F|%a|%U|%G|%s'"
        } else {
            "-f '%HT|%Lp|%Su|%Sg|%z'"
        };
        format!("stat {} {}", format, shell_quote(&self.path))
    }

    /// `None` when the path does not exist
    fn metadata(&self) -> Result<Option<&FileMetadata>, ResourceError> {
        if let Some(metadata) = self.metadata.get() {
            return Ok(metadata.as_ref());
        }

        let output = run(&self.facade, &self.describe(), &self.stat_command())?;
        let metadata = if output.is_success() {
            Some(FileMetadata::parse(&output.stdout).ok_or_else(|| ResourceError::ParseFailed {
                resource: self.describe(),
                reason: format!("unexpected stat output '{}'", output.stdout.trim()),
            })?)
        } else {
            None
        };

        Ok(self.metadata.get_or_init(|| metadata).as_ref())
    }

    fn content(&self) -> Result<Option<&String>, ResourceError> {
        if let Some(content) = self.content.get() {
            return Ok(content.as_ref());
        }

        let output = run(&self.facade, &self.describe(), &format!("cat {}", shell_quote(&self.path)))?;
        let content = output.is_success().then(|| output.stdout);
        Ok(self.content.get_or_init(|| content).as_ref())
    }
}

impl Resource for FileResource {
    fn resource_type(&self) -> &str {
        "file"
    }

    fn describe(&self) -> String {
        format!("File {}", self.path)
    }

    fn skip_reason(&self) -> Option<String> {
        if self.facade.os().is_unix() {
            None
        } else {
            Some(format!(
                "Resource file is not supported on {}",
                self.facade.os()
            ))
        }
    }

    fn property(&self, name: &str) -> Result<Value, ResourceError> {
        if name == "content" {
            return Ok(self.content()?.map_or(Value::Null, |c| Value::String(c.clone())));
        }

        let metadata = self.metadata()?;
        let value = match name {
            "exists" => Value::Bool(metadata.is_some()),
            "file" => Value::Bool(metadata.map_or(false, FileMetadata::is_file)),
            "directory" => Value::Bool(metadata.map_or(false, FileMetadata::is_directory)),
            "mode" => metadata.map_or(Value::Null, |m| Value::String(m.mode.clone())),
            "owner" => metadata.map_or(Value::Null, |m| Value::String(m.owner.clone())),
            "group" => metadata.map_or(Value::Null, |m| Value::String(m.group.clone())),
            "size" => metadata.map_or(Value::Null, |m| Value::from(m.size)),
            other => return Err(unknown_property(self.describe(), other)),
        };
        Ok(value)
    }

    fn properties(&self) -> Vec<&'static str> {
        vec!["exists", "file", "directory", "mode", "owner", "group", "size", "content"]
    }
}
