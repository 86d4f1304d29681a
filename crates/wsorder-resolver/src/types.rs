use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::OrderError;
use crate::order::topo_order;
use crate::waves::wave_order;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStrategy {
    #[default]
    DepthFirst,
    Waves,
}

/// Internal dependency edges keyed by package name. Every package has an
/// entry, leaves map to an empty set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    edges: BTreeMap<String, BTreeSet<String>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a package. Returns `false` if it was already present.
    pub fn insert_package(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.edges.contains_key(&name) {
            return false;
        }
        self.edges.insert(name, BTreeSet::new());
        true
    }

    /// Records that `package` depends on `dependency`, registering `package`
    /// if needed. `dependency` is not registered; ordering fails with
    /// [`OrderError::UnknownDependency`] unless it is inserted as well.
    pub fn add_dependency(&mut self, package: impl Into<String>, dependency: impl Into<String>) {
        self.edges
            .entry(package.into())
            .or_default()
            .insert(dependency.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.edges.contains_key(name)
    }

    pub fn packages(&self) -> BTreeSet<String> {
        self.edges.keys().cloned().collect()
    }

    pub fn dependencies_of(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.edges.get(name)
    }

    pub fn edges(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeSet::len).sum()
    }

    pub fn order(&self, strategy: OrderStrategy) -> Result<Vec<String>, OrderError> {
        let packages = self.packages();
        match strategy {
            OrderStrategy::DepthFirst => topo_order(&packages, &self.edges),
            OrderStrategy::Waves => wave_order(&packages, &self.edges),
        }
    }
}

impl FromIterator<(String, BTreeSet<String>)> for DependencyGraph {
    fn from_iter<T: IntoIterator<Item = (String, BTreeSet<String>)>>(iter: T) -> Self {
        let mut graph = Self::new();
        for (package, dependencies) in iter {
            graph.insert_package(package.clone());
            for dependency in dependencies {
                graph.add_dependency(package.clone(), dependency);
            }
        }
        graph
    }
}
