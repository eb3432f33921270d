//! KRM resource model

pub mod gvk;
pub mod list;
pub mod object;
pub mod result;

pub use gvk::{GroupVersionKind, ObjectCategory};
pub use list::ResourceList;
pub use object::{
    INDEX_ANNOTATION, INTERNAL_INDEX_ANNOTATION, INTERNAL_PATH_ANNOTATION, KubeObject,
    LOCATION_ANNOTATIONS, PATH_ANNOTATION,
};
pub use result::{FileRef, ResourceRef, ResultItem, Severity};
