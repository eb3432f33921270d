//! KRM functions

pub mod ban_kinds;
pub mod delete_annotations;
pub mod metadata_name;
pub mod namespace_name;
pub mod set_labels;

pub use ban_kinds::BanKinds;
pub use delete_annotations::DeleteAnnotations;
pub use metadata_name::ValidateMetadataName;
pub use namespace_name::ValidateNamespaceName;
pub use set_labels::SetLabels;

use crate::config::{FunctionConfig, Settings};
use crate::resource::{ResourceList, ResultItem};
use crate::utils::KrmResult;

/// A function over a resource list
pub trait KrmFunction {
    /// Name used in logs and result tags
    fn name(&self) -> &str;

    /// Mutate or inspect `list` and return the results to report.
    ///
    /// Validation failures come back as error results; `Err` is reserved for
    /// records whose key cannot be derived and for bad configuration.
    fn process(&self, list: &mut ResourceList) -> KrmResult<Vec<ResultItem>>;
}

/// Functions that can be selected by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    BanKinds,
    ValidateMetadataName,
    ValidateNamespaceName,
    SetLabels,
    DeleteAnnotations,
}

impl FunctionKind {
    /// The validators run by `lint`
    pub fn validators() -> Vec<FunctionKind> {
        vec![
            FunctionKind::BanKinds,
            FunctionKind::ValidateMetadataName,
            FunctionKind::ValidateNamespaceName,
        ]
    }

    /// Construct the function from its config and the user settings
    pub fn build(
        self,
        config: &FunctionConfig,
        settings: &Settings,
    ) -> KrmResult<Box<dyn KrmFunction>> {
        Ok(match self {
            FunctionKind::BanKinds => Box::new(BanKinds::from_config(config, &settings.ban_kinds)?),
            FunctionKind::ValidateMetadataName => Box::new(ValidateMetadataName),
            FunctionKind::ValidateNamespaceName => Box::new(ValidateNamespaceName),
            FunctionKind::SetLabels => Box::new(SetLabels::from_config(config)?),
            FunctionKind::DeleteAnnotations => Box::new(DeleteAnnotations::from_config(config)?),
        })
    }
}
