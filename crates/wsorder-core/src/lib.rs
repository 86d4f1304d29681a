mod descriptor;

pub use descriptor::{is_dependency_category, PackageDescriptor, DEFAULT_DEPENDENCY_CATEGORIES};
