//! Injects labels from the function config into every item

use super::KrmFunction;
use crate::config::FunctionConfig;
use crate::resource::{ResourceList, ResultItem};
use crate::utils::{KrmError, KrmResult};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static LABEL_VALUE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(([A-Za-z0-9][-A-Za-z0-9_.]*)?[A-Za-z0-9])?$").expect("label pattern compiles")
});

const MAX_LABEL_VALUE_LEN: usize = 63;

#[derive(Debug, Clone)]
pub struct SetLabels {
    labels: BTreeMap<String, String>,
}

impl SetLabels {
    /// Every `data` entry of the config becomes a label
    pub fn from_config(config: &FunctionConfig) -> KrmResult<Self> {
        if config.is_empty() {
            return Err(KrmError::configuration(
                "set-labels expects 1 or more labels in functionConfig.data",
            ));
        }

        for (key, value) in config.data() {
            if key.is_empty() {
                return Err(KrmError::configuration("label keys must not be empty"));
            }
            if value.len() > MAX_LABEL_VALUE_LEN || !LABEL_VALUE_REGEX.is_match(value) {
                return Err(KrmError::configuration(format!(
                    "invalid value {:?} for label {}",
                    value, key
                )));
            }
        }

        Ok(Self {
            labels: config.data().clone(),
        })
    }
}

impl KrmFunction for SetLabels {
    fn name(&self) -> &str {
        "set-labels"
    }

    fn process(&self, list: &mut ResourceList) -> KrmResult<Vec<ResultItem>> {
        for item in &mut list.items {
            for (key, value) in &self.labels {
                item.set_label(key, value.clone());
            }
        }

        Ok(vec![ResultItem::info(format!(
            "Set {} label(s) on {} resource(s)",
            self.labels.len(),
            list.items.len()
        ))])
    }
}
