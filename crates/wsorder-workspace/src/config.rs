use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use wsorder_core::DEFAULT_DEPENDENCY_CATEGORIES;
use wsorder_resolver::{ExtractOptions, OrderStrategy};

pub const DEFAULT_CONFIG_FILE: &str = "wsorder.toml";
pub const DEFAULT_PACKAGES_DIR: &str = "packages";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderConfig {
    #[serde(default = "default_packages_dir")]
    pub packages_dir: PathBuf,
    #[serde(default)]
    pub scope: Option<String>,
    /// Empty means every declared category.
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
    #[serde(default)]
    pub strategy: OrderStrategy,
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self {
            packages_dir: default_packages_dir(),
            scope: None,
            categories: default_categories(),
            strategy: OrderStrategy::default(),
        }
    }
}

impl OrderConfig {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(input).context("failed to parse wsorder config")?;
        config.scope = config
            .scope
            .map(|scope| scope.trim().trim_end_matches('/').to_string())
            .filter(|scope| !scope.is_empty());
        Ok(config)
    }

    /// Reads `path`; a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content)
                .with_context(|| format!("failed parsing config: {}", path.display())),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => {
                Err(err).with_context(|| format!("failed reading config: {}", path.display()))
            }
        }
    }

    /// Reads `path`, which must exist.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed reading config: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("failed parsing config: {}", path.display()))
    }

    pub fn extract_options(&self) -> ExtractOptions {
        let categories = (!self.categories.is_empty())
            .then(|| self.categories.iter().cloned().collect::<BTreeSet<_>>());
        ExtractOptions {
            scope: self.scope.clone(),
            categories,
        }
    }
}

fn default_packages_dir() -> PathBuf {
    PathBuf::from(DEFAULT_PACKAGES_DIR)
}

fn default_categories() -> Vec<String> {
    DEFAULT_DEPENDENCY_CATEGORIES
        .iter()
        .map(|category| category.to_string())
        .collect()
}
