//! Rejects namespaces the API server would refuse
//!
//! Checks a Namespace's own `metadata.name` and every other object's
//! `metadata.namespace`. Whether a namespace should be declared at all for a
//! given type is not checked here.

use super::KrmFunction;
use crate::engine::classify_by;
use crate::resource::{KubeObject, ObjectCategory, ResourceList, ResultItem};
use crate::utils::KrmResult;
use regex::Regex;
use std::sync::LazyLock;

// The pattern Kubernetes uses for namespace names (RFC 1123 label).
static NAMESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([-a-z0-9]{0,61}[a-z0-9])?$").expect("namespace pattern compiles")
});

pub const INVALID_NAMESPACE_OBJECT_MESSAGE: &str = "A Namespace's metadata.name MUST be:\n\
1) nonempty;\n\
2) 63 characters or fewer;\n\
3) consist of lowercase letters (a-z), digits (0-9), and hyphen `-`; and\n\
4) begin and end with a lowercase letter or digit";

pub const INVALID_NAMESPACE_FIELD_MESSAGE: &str = "If declared, a Config's metadata.namespace MUST be:\n\
1) 63 characters or fewer;\n\
2) consist of lowercase letters (a-z), digits (0-9), and hyphen `-`; and\n\
3) begin and end with a lowercase letter or digit";

/// Which namespace value an object contributes, if any
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum NamespaceKey {
    /// `metadata.name` of a Namespace object
    Declared(String),
    /// `metadata.namespace` of any other object
    Reference(String),
    Unset,
}

impl NamespaceKey {
    fn of(object: &KubeObject) -> Self {
        if object.category() == ObjectCategory::Namespace {
            return NamespaceKey::Declared(object.name().unwrap_or_default().to_string());
        }
        match object.namespace() {
            // An empty namespace resolves to "default".
            Some(ns) if !ns.is_empty() => NamespaceKey::Reference(ns.to_string()),
            _ => NamespaceKey::Unset,
        }
    }

    fn verdict(&self) -> Option<&'static str> {
        match self {
            NamespaceKey::Declared(name) if !is_valid_namespace(name) => {
                Some(INVALID_NAMESPACE_OBJECT_MESSAGE)
            }
            NamespaceKey::Reference(ns) if !is_valid_namespace(ns) => {
                Some(INVALID_NAMESPACE_FIELD_MESSAGE)
            }
            _ => None,
        }
    }
}

pub fn is_valid_namespace(namespace: &str) -> bool {
    NAMESPACE_REGEX.is_match(namespace)
}

#[derive(Debug, Clone, Default)]
pub struct ValidateNamespaceName;

impl KrmFunction for ValidateNamespaceName {
    fn name(&self) -> &str {
        "validate-namespace-name"
    }

    fn process(&self, list: &mut ResourceList) -> KrmResult<Vec<ResultItem>> {
        let classification = classify_by(
            list.items.iter(),
            |o| NamespaceKey::of(o),
            |key, _| key.verdict(),
        );

        Ok(classification
            .flagged()
            .map(|(o, message)| ResultItem::error(*message).with_object(o))
            .collect())
    }
}
