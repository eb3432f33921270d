//! Structured diagnostics attached to a resource list

use super::object::KubeObject;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    #[default]
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// Identifies the object a result is about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRef {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = [
            self.api_version.as_str(),
            self.kind.as_str(),
            self.namespace.as_deref().unwrap_or(""),
            self.name.as_str(),
        ]
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect();
        write!(f, "{}", parts.join("/"))
    }
}

/// File containing the object a result is about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<i64>,
}

/// A single diagnostic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultItem {
    pub message: String,

    #[serde(default)]
    pub severity: Severity,

    /// Every object this result refers to. Aggregated results list more than one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resource_refs: Vec<ResourceRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<FileRef>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
}

impl ResultItem {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
            resource_refs: Vec::new(),
            file: None,
            tags: BTreeMap::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Error)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Warning)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Info)
    }

    /// Reference an object, and the file it came from when it is annotated
    pub fn with_object(mut self, object: &KubeObject) -> Self {
        self.resource_refs.push(object.resource_ref());
        if self.file.is_none() {
            self.file = object.file_ref();
        }
        self
    }

    /// Reference several objects
    pub fn with_objects<'a>(mut self, objects: impl IntoIterator<Item = &'a KubeObject>) -> Self {
        self.resource_refs
            .extend(objects.into_iter().map(KubeObject::resource_ref));
        self
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ResultItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.severity)?;
        if !self.resource_refs.is_empty() {
            let refs: Vec<String> = self.resource_refs.iter().map(|r| r.to_string()).collect();
            write!(f, " {}", refs.join(", "))?;
        }
        if let Some(file) = &self.file {
            write!(f, " ({})", file.path)?;
        }
        write!(f, ": {}", self.message)
    }
}
