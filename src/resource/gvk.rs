//! Group/Version/Kind discrimination

use std::fmt;

/// The three-part type discriminator of a Kubernetes object
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupVersionKind {
    pub group: String,
    pub version: String,
    pub kind: String,
}

impl GroupVersionKind {
    pub fn new(
        group: impl Into<String>,
        version: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            kind: kind.into(),
        }
    }

    /// Split an `apiVersion` into group and version. A bare version belongs
    /// to the core group, which is the empty string.
    pub fn from_api_version(api_version: &str, kind: &str) -> Self {
        let (group, version) = match api_version.split_once('/') {
            Some((group, version)) => (group, version),
            None => ("", api_version),
        };
        Self::new(group, version, kind)
    }

    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }

    pub fn is_core(&self) -> bool {
        self.group.is_empty()
    }
}

impl fmt::Display for GroupVersionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.api_version(), self.kind)
    }
}

/// Kinds some functions treat specially. Everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectCategory {
    Namespace,
    Secret,
    ConfigMap,
    Other,
}

impl ObjectCategory {
    pub fn of(gvk: &GroupVersionKind) -> Self {
        if !gvk.is_core() || gvk.version != "v1" {
            return ObjectCategory::Other;
        }
        match gvk.kind.as_str() {
            "Namespace" => ObjectCategory::Namespace,
            "Secret" => ObjectCategory::Secret,
            "ConfigMap" => ObjectCategory::ConfigMap,
            _ => ObjectCategory::Other,
        }
    }
}
