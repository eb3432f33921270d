//! Rejects metadata.name values the API server would refuse

use super::KrmFunction;
use crate::engine::classify_by;
use crate::resource::{ResourceList, ResultItem};
use crate::utils::KrmResult;
use regex::Regex;
use std::sync::LazyLock;

static NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9-.]{1,253}$").expect("name pattern compiles"));

pub const INVALID_NAME_MESSAGE: &str = "metadata.name MUST be:\n\
1) nonempty;\n\
2) 253 characters or fewer;\n\
3) consist of lowercase letters (a-z), digits (0-9), hyphen `-`, and period `.`; and\n\
4) not be exactly `.` or `..`";

pub fn is_valid_name(name: &str) -> bool {
    NAME_REGEX.is_match(name) && name != "." && name != ".."
}

#[derive(Debug, Clone, Default)]
pub struct ValidateMetadataName;

impl KrmFunction for ValidateMetadataName {
    fn name(&self) -> &str {
        "validate-metadata-name"
    }

    fn process(&self, list: &mut ResourceList) -> KrmResult<Vec<ResultItem>> {
        // A missing name is checked as the empty string and fails.
        let classification = classify_by(
            list.items.iter(),
            |o| o.name().unwrap_or_default().to_string(),
            |name, _| (!is_valid_name(name)).then_some(()),
        );

        Ok(classification
            .flagged()
            .map(|(o, _)| ResultItem::error(INVALID_NAME_MESSAGE).with_object(o))
            .collect())
    }
}
