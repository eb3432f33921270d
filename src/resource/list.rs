//! The ResourceList envelope exchanged by KRM functions

use super::object::KubeObject;
use super::result::{ResultItem, Severity};
use crate::utils::{KrmError, KrmResult};
use serde::{Deserialize, Serialize};

pub const RESOURCE_LIST_KIND: &str = "ResourceList";
pub const RESOURCE_LIST_API_VERSION: &str = "config.kubernetes.io/v1";
const LEGACY_API_VERSION: &str = "config.kubernetes.io/v1alpha1";

/// Input and output of every function: the items, an optional function
/// config and the results reported so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceList {
    pub api_version: String,
    pub kind: String,

    #[serde(default)]
    pub items: Vec<KubeObject>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_config: Option<KubeObject>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<ResultItem>,
}

impl Default for ResourceList {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl ResourceList {
    pub fn new(items: Vec<KubeObject>) -> Self {
        Self {
            api_version: RESOURCE_LIST_API_VERSION.to_string(),
            kind: RESOURCE_LIST_KIND.to_string(),
            items,
            function_config: None,
            results: Vec::new(),
        }
    }

    pub fn with_function_config(mut self, config: KubeObject) -> Self {
        self.function_config = Some(config);
        self
    }

    /// Parse a ResourceList, rejecting documents of any other kind
    pub fn from_yaml(yaml: &str) -> KrmResult<Self> {
        let list: ResourceList =
            serde_yaml::from_str(yaml).map_err(|e| KrmError::parse("ResourceList", e))?;

        if list.kind != RESOURCE_LIST_KIND {
            return Err(KrmError::configuration(format!(
                "input was of unexpected kind {:?}; expected {}",
                list.kind, RESOURCE_LIST_KIND
            )));
        }
        if list.api_version != RESOURCE_LIST_API_VERSION && list.api_version != LEGACY_API_VERSION
        {
            crate::log_warn!(
                "Unrecognized ResourceList apiVersion {}, continuing",
                list.api_version
            );
        }

        tracing::debug!(items = list.items.len(), "parsed resource list");
        Ok(list)
    }

    pub fn to_yaml(&self) -> KrmResult<String> {
        serde_yaml::to_string(self).map_err(|e| KrmError::parse("ResourceList", e))
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn has_errors(&self) -> bool {
        self.results.iter().any(|r| r.severity == Severity::Error)
    }

    pub fn error_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_error()).count()
    }
}
