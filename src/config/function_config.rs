//! Function-scoped configuration read from `ResourceList.functionConfig`

use crate::resource::{KubeObject, ObjectCategory};
use crate::utils::{KrmError, KrmResult};
use serde_yaml::Value;
use std::collections::BTreeMap;

/// The `data` map of a ConfigMap-style function config
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FunctionConfig {
    data: BTreeMap<String, String>,
}

impl FunctionConfig {
    /// Read `data` from the config object. A missing object or missing
    /// `data` yields an empty config; non-string values are rejected.
    pub fn from_object(object: Option<&KubeObject>) -> KrmResult<Self> {
        let Some(object) = object else {
            return Ok(Self::default());
        };

        match object.category() {
            ObjectCategory::ConfigMap => {}
            // Secret data is base64 encoded, so its values cannot be used as-is.
            ObjectCategory::Secret => {
                return Err(KrmError::configuration(
                    "functionConfig must be a ConfigMap, not a Secret",
                ));
            }
            ObjectCategory::Namespace | ObjectCategory::Other => {
                crate::log_warn!(
                    "functionConfig {} is not a ConfigMap, reading its data field anyway",
                    object.describe()
                );
            }
        }

        let data = match object.as_mapping().get("data") {
            None | Some(Value::Null) => return Ok(Self::default()),
            Some(Value::Mapping(data)) => data,
            Some(_) => {
                return Err(KrmError::configuration(
                    "functionConfig.data must be a map of strings",
                ));
            }
        };

        let mut entries = BTreeMap::new();
        for (key, value) in data {
            let key = key.as_str().ok_or_else(|| {
                KrmError::configuration("functionConfig.data keys must be strings")
            })?;
            let value = match value {
                Value::String(s) => s.clone(),
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                _ => {
                    return Err(KrmError::configuration(format!(
                        "functionConfig.data.{} must be a scalar",
                        key
                    )));
                }
            };
            entries.insert(key.to_string(), value);
        }

        Ok(Self { data: entries })
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            data: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    /// Comma-separated list under `key`, whitespace trimmed, blanks dropped
    pub fn list(&self, key: &str) -> Vec<String> {
        self.get(key)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn data(&self) -> &BTreeMap<String, String> {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(yaml: &str) -> KrmResult<FunctionConfig> {
        let object = KubeObject::from_yaml(yaml).unwrap();
        FunctionConfig::from_object(Some(&object))
    }

    #[test]
    fn test_reads_data_map() {
        let cfg = config(
            "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: c\ndata:\n  team: platform\n  replicas: 3\n",
        )
        .unwrap();
        assert_eq!(cfg.get("team"), Some("platform"));
        assert_eq!(cfg.get("replicas"), Some("3"));
    }

    #[test]
    fn test_missing_config_is_empty() {
        assert!(FunctionConfig::from_object(None).unwrap().is_empty());
        let cfg = config("apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: c\n").unwrap();
        assert!(cfg.is_empty());
    }

    #[test]
    fn test_rejects_nested_values() {
        let err = config(
            "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: c\ndata:\n  nested:\n    a: b\n",
        )
        .unwrap_err();
        assert!(matches!(err, KrmError::Configuration(_)));
    }

    #[test]
    fn test_secret_is_rejected() {
        let err = config(
            "apiVersion: v1\nkind: Secret\nmetadata:\n  name: s\ndata:\n  annotationKeys: b3duZXI=\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("not a Secret"));
    }

    #[test]
    fn test_custom_kind_data_is_read() {
        let cfg = config(
            "apiVersion: fn.example.com/v1\nkind: Settings\nmetadata:\n  name: s\ndata:\n  team: platform\n",
        )
        .unwrap();
        assert_eq!(cfg.get("team"), Some("platform"));
    }

    #[test]
    fn test_list_splitting() {
        let cfg = FunctionConfig::from_pairs([("keys", " a, b ,, c ")]);
        assert_eq!(cfg.list("keys"), vec!["a", "b", "c"]);
        assert!(cfg.list("absent").is_empty());
    }
}
