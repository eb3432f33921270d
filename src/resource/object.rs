//! Kubernetes-style objects held as YAML mappings

use super::gvk::{GroupVersionKind, ObjectCategory};
use super::result::{FileRef, ResourceRef};
use crate::utils::{KrmError, KrmResult};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

/// Annotation recording the file an object was read from
pub const INTERNAL_PATH_ANNOTATION: &str = "internal.config.kubernetes.io/path";

/// Annotation recording the document position of an object in its file
pub const INTERNAL_INDEX_ANNOTATION: &str = "internal.config.kubernetes.io/index";

/// Legacy spelling of [`INTERNAL_PATH_ANNOTATION`], still written by older tools
pub const PATH_ANNOTATION: &str = "config.kubernetes.io/path";

/// Legacy spelling of [`INTERNAL_INDEX_ANNOTATION`]
pub const INDEX_ANNOTATION: &str = "config.kubernetes.io/index";

/// Every annotation that only tracks where an object lives on disk
pub const LOCATION_ANNOTATIONS: [&str; 4] = [
    INTERNAL_PATH_ANNOTATION,
    INTERNAL_INDEX_ANNOTATION,
    PATH_ANNOTATION,
    INDEX_ANNOTATION,
];

/// An untyped KRM object
///
/// Only `apiVersion`, `kind` and `metadata` are interpreted; every other
/// field passes through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct KubeObject(Mapping);

impl KubeObject {
    pub fn new(api_version: &str, kind: &str, name: &str) -> Self {
        let mut object = Self(Mapping::new());
        object.set_field("apiVersion", api_version);
        object.set_field("kind", kind);
        object
            .metadata_mut()
            .insert(Value::from("name"), Value::from(name));
        object
    }

    pub fn from_mapping(mapping: Mapping) -> Self {
        Self(mapping)
    }

    /// Parse a single YAML document
    pub fn from_yaml(yaml: &str) -> KrmResult<Self> {
        serde_yaml::from_str(yaml).map_err(|e| KrmError::parse("object", e))
    }

    pub fn to_yaml(&self) -> KrmResult<String> {
        serde_yaml::to_string(&self.0).map_err(|e| KrmError::parse("object", e))
    }

    pub fn as_mapping(&self) -> &Mapping {
        &self.0
    }

    pub fn api_version(&self) -> Option<&str> {
        self.0.get("apiVersion").and_then(Value::as_str)
    }

    pub fn kind(&self) -> Option<&str> {
        self.0.get("kind").and_then(Value::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.metadata_str("name")
    }

    pub fn namespace(&self) -> Option<&str> {
        self.metadata_str("namespace")
    }

    /// Group/version/kind, failing when either field is missing
    pub fn gvk(&self) -> KrmResult<GroupVersionKind> {
        let api_version = self
            .api_version()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| KrmError::key_derivation(self.describe(), "missing apiVersion"))?;
        let kind = self
            .kind()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| KrmError::key_derivation(self.describe(), "missing kind"))?;
        Ok(GroupVersionKind::from_api_version(api_version, kind))
    }

    pub fn category(&self) -> ObjectCategory {
        self.gvk()
            .map(|gvk| ObjectCategory::of(&gvk))
            .unwrap_or(ObjectCategory::Other)
    }

    /// Short human description used in messages
    pub fn describe(&self) -> String {
        let name = match self.namespace() {
            Some(ns) if !ns.is_empty() => format!("{}/{}", ns, self.name().unwrap_or("<unnamed>")),
            _ => self.name().unwrap_or("<unnamed>").to_string(),
        };
        format!(
            "{}/{} {}",
            self.api_version().unwrap_or("<no apiVersion>"),
            self.kind().unwrap_or("<no kind>"),
            name
        )
    }

    pub fn resource_ref(&self) -> ResourceRef {
        ResourceRef {
            api_version: self.api_version().unwrap_or_default().to_string(),
            kind: self.kind().unwrap_or_default().to_string(),
            name: self.name().unwrap_or_default().to_string(),
            namespace: self
                .namespace()
                .filter(|ns| !ns.is_empty())
                .map(str::to_string),
        }
    }

    /// File reference from the path and index annotations, when present
    pub fn file_ref(&self) -> Option<FileRef> {
        self.source_path().map(|path| FileRef {
            path: path.to_string(),
            index: self.source_index().and_then(|i| i.trim().parse().ok()),
        })
    }

    /// Path the object was read from; the internal annotation wins over the
    /// legacy one
    pub fn source_path(&self) -> Option<&str> {
        self.annotation(INTERNAL_PATH_ANNOTATION)
            .or_else(|| self.annotation(PATH_ANNOTATION))
    }

    /// Raw document index within [`source_path`](Self::source_path)
    pub fn source_index(&self) -> Option<&str> {
        self.annotation(INTERNAL_INDEX_ANNOTATION)
            .or_else(|| self.annotation(INDEX_ANNOTATION))
    }

    /// Record where the object lives, under both annotation spellings
    pub fn set_location(&mut self, path: &str, index: usize) {
        self.set_annotation(INTERNAL_PATH_ANNOTATION, path);
        self.set_annotation(INTERNAL_INDEX_ANNOTATION, index.to_string());
        self.set_annotation(PATH_ANNOTATION, path);
        self.set_annotation(INDEX_ANNOTATION, index.to_string());
    }

    /// Drop every location annotation
    pub fn clear_location(&mut self) {
        for key in LOCATION_ANNOTATIONS {
            self.remove_annotation(key);
        }
    }

    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.metadata_map("annotations")?
            .get(key)
            .and_then(Value::as_str)
    }

    pub fn set_annotation(&mut self, key: &str, value: impl Into<String>) {
        self.metadata_map_mut("annotations")
            .insert(Value::from(key), Value::String(value.into()));
    }

    /// Remove an annotation, dropping the annotations map once it is empty
    pub fn remove_annotation(&mut self, key: &str) -> Option<String> {
        self.remove_metadata_entry("annotations", key)
    }

    pub fn label(&self, key: &str) -> Option<&str> {
        self.metadata_map("labels")?.get(key).and_then(Value::as_str)
    }

    pub fn set_label(&mut self, key: &str, value: impl Into<String>) {
        self.metadata_map_mut("labels")
            .insert(Value::from(key), Value::String(value.into()));
    }

    fn set_field(&mut self, key: &str, value: &str) {
        self.0.insert(Value::from(key), Value::from(value));
    }

    fn metadata(&self) -> Option<&Mapping> {
        self.0.get("metadata").and_then(Value::as_mapping)
    }

    fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata()?.get(key).and_then(Value::as_str)
    }

    fn metadata_map(&self, key: &str) -> Option<&Mapping> {
        self.metadata()?.get(key).and_then(Value::as_mapping)
    }

    fn metadata_mut(&mut self) -> &mut Mapping {
        ensure_mapping(&mut self.0, "metadata")
    }

    fn metadata_map_mut(&mut self, key: &str) -> &mut Mapping {
        ensure_mapping(self.metadata_mut(), key)
    }

    fn remove_metadata_entry(&mut self, map_key: &str, key: &str) -> Option<String> {
        let metadata = self.0.get_mut("metadata")?.as_mapping_mut()?;
        let map = metadata.get_mut(map_key)?.as_mapping_mut()?;
        let removed = map.shift_remove(key)?;
        if map.is_empty() {
            metadata.shift_remove(map_key);
        }
        Some(match removed {
            Value::String(s) => s,
            other => serde_yaml::to_string(&other)
                .map(|s| s.trim_end().to_string())
                .unwrap_or_default(),
        })
    }
}

/// Return the mapping under `key`, replacing anything that is not a mapping
fn ensure_mapping<'a>(parent: &'a mut Mapping, key: &str) -> &'a mut Mapping {
    let slot = parent
        .entry(Value::from(key))
        .or_insert_with(|| Value::Mapping(Mapping::new()));
    if !slot.is_mapping() {
        *slot = Value::Mapping(Mapping::new());
    }
    match slot {
        Value::Mapping(mapping) => mapping,
        _ => unreachable!("slot was just set to a mapping"),
    }
}
