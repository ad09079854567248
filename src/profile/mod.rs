//! Device-profile registry and layout variable namespaces

pub mod registry;
pub mod tables;

pub use registry::{defaults, merge, number_of, profiles, ProfileInfo, ProfileKey};
pub use tables::{FieldSpec, Namespace};
