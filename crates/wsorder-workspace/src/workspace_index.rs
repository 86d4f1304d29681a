use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;
use wsorder_core::PackageDescriptor;
use wsorder_resolver::{build_dependency_graph, DependencyGraph, ExtractOptions};

pub const DESCRIPTOR_FILE: &str = "package.json";

/// A directory whose immediate subdirectories are packages, each carrying a
/// `package.json` descriptor.
#[derive(Debug, Clone)]
pub struct WorkspaceIndex {
    root: PathBuf,
}

impl WorkspaceIndex {
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Package directory names that carry a descriptor, sorted.
    pub fn package_dirs(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)
            .with_context(|| format!("failed to read packages directory: {}", self.root.display()))?
        {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().to_string();
            if !entry.path().join(DESCRIPTOR_FILE).is_file() {
                debug!(dir = %name, "skipping directory without {DESCRIPTOR_FILE}");
                continue;
            }
            names.push(name);
        }

        names.sort();
        Ok(names)
    }

    /// Loads every package descriptor, in directory-name order.
    pub fn load_descriptors(&self) -> Result<Vec<PackageDescriptor>> {
        let mut descriptors = Vec::new();
        for dir in self.package_dirs()? {
            descriptors.push(self.load_descriptor(&dir)?);
        }
        debug!(
            root = %self.root.display(),
            packages = descriptors.len(),
            "loaded package descriptors"
        );
        Ok(descriptors)
    }

    pub fn load_descriptor(&self, dir: &str) -> Result<PackageDescriptor> {
        let path = self.root.join(dir).join(DESCRIPTOR_FILE);
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed reading package descriptor: {}", path.display()))?;
        PackageDescriptor::from_json_str(&content, Some(dir))
            .with_context(|| format!("malformed package descriptor: {}", path.display()))
    }

    pub fn dependency_graph(&self, options: &ExtractOptions) -> Result<DependencyGraph> {
        let descriptors = self.load_descriptors()?;
        let graph = build_dependency_graph(&descriptors, options)
            .with_context(|| format!("failed building dependency graph: {}", self.root.display()))?;
        Ok(graph)
    }
}
