use std::collections::BTreeSet;

use tracing::{debug, trace};
use wsorder_core::PackageDescriptor;

use crate::error::OrderError;
use crate::types::DependencyGraph;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Namespace shared by internal packages, e.g. `@welshman`.
    pub scope: Option<String>,
    /// Categories to union. `None` means every declared category.
    pub categories: Option<BTreeSet<String>>,
}

impl ExtractOptions {
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = Some(categories.into_iter().map(Into::into).collect());
        self
    }

    fn includes_category(&self, category: &str) -> bool {
        self.categories
            .as_ref()
            .map(|categories| categories.contains(category))
            .unwrap_or(true)
    }
}

/// Strips `<scope>/` from a declared name.
///
/// Without a scope the name is returned unchanged. With a scope, names outside
/// the namespace yield `None`.
pub fn normalize_name<'a>(name: &'a str, scope: Option<&str>) -> Option<&'a str> {
    let Some(scope) = scope else {
        return Some(name);
    };
    let scope = scope.trim_end_matches('/');
    name.strip_prefix(scope)
        .and_then(|rest| rest.strip_prefix('/'))
        .filter(|rest| !rest.is_empty())
}

/// Internal dependencies of one package across every declared category.
pub fn extract_internal_dependencies(
    descriptor: &PackageDescriptor,
    known: &BTreeSet<String>,
) -> BTreeSet<String> {
    extract_with_options(descriptor, known, &ExtractOptions::default())
}

pub fn extract_with_options(
    descriptor: &PackageDescriptor,
    known: &BTreeSet<String>,
    options: &ExtractOptions,
) -> BTreeSet<String> {
    let scope = options.scope.as_deref();
    let mut internal = BTreeSet::new();
    for (category, names) in &descriptor.categories {
        if !options.includes_category(category) {
            continue;
        }
        for declared in names {
            match normalize_name(declared, scope).filter(|name| known.contains(*name)) {
                Some(name) => {
                    internal.insert(name.to_string());
                }
                None => trace!(
                    package = %descriptor.name,
                    category = %category,
                    dependency = %declared,
                    "ignoring external dependency"
                ),
            }
        }
    }
    internal
}

/// Builds the internal graph for a full working set.
///
/// Descriptor names go through the same scope normalization as dependency
/// names; a descriptor outside the scope keeps its declared name.
pub fn build_dependency_graph(
    descriptors: &[PackageDescriptor],
    options: &ExtractOptions,
) -> Result<DependencyGraph, OrderError> {
    let scope = options.scope.as_deref();
    let mut known = BTreeSet::new();
    for descriptor in descriptors {
        let name = package_name(descriptor, scope);
        if !known.insert(name.clone()) {
            return Err(OrderError::DuplicatePackage { name });
        }
    }

    let mut graph = DependencyGraph::new();
    for descriptor in descriptors {
        let name = package_name(descriptor, scope);
        let dependencies = extract_with_options(descriptor, &known, options);
        debug!(
            package = %name,
            dependencies = dependencies.len(),
            "extracted internal dependencies"
        );
        graph.insert_package(name.clone());
        for dependency in dependencies {
            graph.add_dependency(name.clone(), dependency);
        }
    }

    Ok(graph)
}

fn package_name(descriptor: &PackageDescriptor, scope: Option<&str>) -> String {
    normalize_name(&descriptor.name, scope)
        .unwrap_or(&descriptor.name)
        .to_string()
}
