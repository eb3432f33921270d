//! Removes annotation keys listed in the function config

use super::KrmFunction;
use crate::config::FunctionConfig;
use crate::resource::{ResourceList, ResultItem};
use crate::utils::{KrmError, KrmResult};

pub const ANNOTATION_KEYS_KEY: &str = "annotationKeys";

#[derive(Debug, Clone)]
pub struct DeleteAnnotations {
    keys: Vec<String>,
}

impl DeleteAnnotations {
    pub fn from_config(config: &FunctionConfig) -> KrmResult<Self> {
        let keys = config.list(ANNOTATION_KEYS_KEY);
        if keys.is_empty() {
            return Err(KrmError::configuration(format!(
                "expecting 1 or more annotation keys in functionConfig.data.{}",
                ANNOTATION_KEYS_KEY
            )));
        }
        Ok(Self { keys })
    }
}

impl KrmFunction for DeleteAnnotations {
    fn name(&self) -> &str {
        "delete-annotations"
    }

    fn process(&self, list: &mut ResourceList) -> KrmResult<Vec<ResultItem>> {
        let mut removed = Vec::new();

        for item in &mut list.items {
            let name = item.name().unwrap_or_default().to_string();
            if name.is_empty() || item.kind().is_none_or(str::is_empty) {
                continue;
            }

            // Capture the source file before the path annotation itself may go.
            let file = item.file_ref();
            for key in &self.keys {
                if item.remove_annotation(key).is_some() {
                    let mut result = ResultItem::info(format!(
                        "Annotation [{}] removed from resource [{}]",
                        key, name
                    ))
                    .with_object(item);
                    result.file = file.clone();
                    removed.push(result);
                }
            }
        }

        if removed.is_empty() {
            return Ok(vec![ResultItem::warning(
                "None of the resources had the provided annotations to delete",
            )]);
        }

        let mut results = vec![ResultItem::info(
            "The following annotations were deleted from the resources",
        )];
        results.extend(removed);
        Ok(results)
    }
}
