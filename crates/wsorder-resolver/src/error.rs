use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// Packages on a dependency loop. For the depth-first sorter the list is
    /// the loop itself in walk order; for the wave sorter it is every package
    /// that could not be placed.
    #[error("dependency cycle detected involving: {}", .cycle.join(" -> "))]
    Cycle { cycle: Vec<String> },

    #[error("package '{package}' depends on '{dependency}', which is not a known package")]
    UnknownDependency { package: String, dependency: String },

    #[error("duplicate package name '{name}'")]
    DuplicatePackage { name: String },
}

impl OrderError {
    pub fn cycle_members(&self) -> Option<&[String]> {
        match self {
            Self::Cycle { cycle } => Some(cycle),
            _ => None,
        }
    }
}
