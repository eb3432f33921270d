//! Object classification and grouping engine

pub mod bucket;
pub mod classify;
pub mod group;
pub mod policy;

pub use bucket::{Bucket, DEFAULT_ORDER, bucket_by_path};
pub use classify::{Classification, Tagged, classify, classify_by};
pub use group::{Group, Grouped, group_by, try_group_by};
pub use policy::{ErrorPolicy, Flow};
