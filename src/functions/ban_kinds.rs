//! Bans resource types that should never be declared in version control

use super::KrmFunction;
use crate::config::FunctionConfig;
use crate::config::settings::BanKindsSettings;
use crate::engine::{classify, try_group_by};
use crate::resource::{GroupVersionKind, ResourceList, ResultItem};
use crate::utils::{KrmError, KrmResult};
use std::collections::BTreeSet;

/// functionConfig key adding entries to the ban list
pub const BANNED_KINDS_KEY: &str = "bannedKinds";
/// functionConfig key removing entries from the ban list
pub const ALLOWED_KINDS_KEY: &str = "allowedKinds";

/// Group/Kind pairs banned out of the box, every version included.
///
/// Some kinds (Scale, Event) moved between groups over time, so each group
/// that defines one is listed separately.
const DEFAULT_BANNED: &[(&str, &str)] = &[
    // Immutable data snapshots
    ("apps", "ControllerRevision"),
    // Single use requests for permissions
    ("authentication.k8s.io", "TokenReview"),
    ("authorization.k8s.io", "LocalSubjectAccessReview"),
    ("authorization.k8s.io", "SelfSubjectAccessReview"),
    ("authorization.k8s.io", "SubjectAccessReview"),
    ("certificates.k8s.io", "CertificateSigningRequest"),
    // Single-use imperative objects
    ("batch", "Job"),
    ("", "Event"),
    ("events.k8s.io", "Event"),
    ("apps", "Scale"),
    ("autoscaling", "Scale"),
    ("extensions", "Scale"),
    // Credentials
    ("", "Secret"),
    // Deprecated
    ("", "Binding"),
    // Status objects
    ("", "ComponentStatus"),
    ("", "Endpoints"),
];

/// Ban key covering all versions of a group/kind
pub fn unversioned(group: &str, kind: &str) -> String {
    if group.is_empty() {
        format!("*/{}", kind)
    } else {
        format!("{}/*/{}", group, kind)
    }
}

/// Parse `Kind` or `group/Kind` into its ban key
fn parse_entry(entry: &str) -> KrmResult<String> {
    let (group, kind) = match entry.split_once('/') {
        Some((group, kind)) => (group, kind),
        None => ("", entry),
    };
    if kind.is_empty() || kind.contains('/') || group.contains('*') || kind.contains('*') {
        return Err(KrmError::configuration(format!(
            "invalid kind entry {:?}: expected Kind or group/Kind",
            entry
        )));
    }
    Ok(unversioned(group, kind))
}

#[derive(Debug, Clone)]
pub struct BanKinds {
    banned: BTreeSet<String>,
}

impl Default for BanKinds {
    fn default() -> Self {
        Self {
            banned: DEFAULT_BANNED
                .iter()
                .map(|(group, kind)| unversioned(group, kind))
                .collect(),
        }
    }
}

impl BanKinds {
    /// Built-in list adjusted by settings, then by the function config
    pub fn from_config(config: &FunctionConfig, settings: &BanKindsSettings) -> KrmResult<Self> {
        let mut detector = Self::default();

        for entry in settings
            .extra_banned
            .iter()
            .cloned()
            .chain(config.list(BANNED_KINDS_KEY))
        {
            detector.ban(&entry)?;
        }
        for entry in settings
            .allowed
            .iter()
            .cloned()
            .chain(config.list(ALLOWED_KINDS_KEY))
        {
            detector.allow(&entry)?;
        }

        Ok(detector)
    }

    pub fn ban(&mut self, entry: &str) -> KrmResult<()> {
        self.banned.insert(parse_entry(entry)?);
        Ok(())
    }

    pub fn allow(&mut self, entry: &str) -> KrmResult<()> {
        self.banned.remove(&parse_entry(entry)?);
        Ok(())
    }

    pub fn is_banned(&self, gvk: &GroupVersionKind) -> bool {
        self.banned.contains(&unversioned(&gvk.group, &gvk.kind))
    }
}

impl KrmFunction for BanKinds {
    fn name(&self) -> &str {
        "ban-kinds"
    }

    fn process(&self, list: &mut ResourceList) -> KrmResult<Vec<ResultItem>> {
        // Whether an object is banned depends only on its GVK.
        let grouped = try_group_by(list.items.iter(), |o| o.gvk())?;
        let classification = classify(grouped, |gvk, _| {
            self.is_banned(gvk).then(|| gvk.to_string())
        });

        tracing::debug!(
            decisions = classification.decisions(),
            banned = classification.flagged_count(),
            "checked kinds"
        );

        if classification.is_clean() {
            return Ok(Vec::new());
        }

        let kinds: BTreeSet<&str> = classification.flagged().map(|(_, k)| k.as_str()).collect();
        let kinds = kinds.into_iter().collect::<Vec<_>>().join(", ");
        let result = ResultItem::error(format!("Objects with banned kinds: {}", kinds))
            .with_objects(classification.flagged().map(|(o, _)| *o));

        Ok(vec![result])
    }
}
