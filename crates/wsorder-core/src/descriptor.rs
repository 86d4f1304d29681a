use std::collections::{BTreeMap, BTreeSet};

use anyhow::{anyhow, Context};
use serde_json::{Map, Value};

/// Categories consulted when no explicit category list is configured.
pub const DEFAULT_DEPENDENCY_CATEGORIES: [&str; 3] =
    ["dependencies", "devDependencies", "peerDependencies"];

/// Raw per-package metadata: the declared name and every dependency category
/// found in the descriptor, each holding the declared dependency names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageDescriptor {
    pub name: String,
    pub categories: BTreeMap<String, BTreeSet<String>>,
}

impl PackageDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            categories: BTreeMap::new(),
        }
    }

    pub fn with_category<I, S>(mut self, category: impl Into<String>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories
            .entry(category.into())
            .or_default()
            .extend(names.into_iter().map(Into::into));
        self
    }

    /// Parses a `package.json` document.
    ///
    /// The top level must be a JSON object. `fallback_name` is used when the
    /// document has no string `name` field. Category fields with an
    /// unexpected shape are treated as absent.
    pub fn from_json_str(input: &str, fallback_name: Option<&str>) -> anyhow::Result<Self> {
        let value: Value =
            serde_json::from_str(input).context("failed to parse package descriptor")?;
        let Value::Object(fields) = value else {
            return Err(anyhow!("package descriptor must be a JSON object"));
        };

        let name = match fields.get("name").and_then(Value::as_str).map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => fallback_name
                .map(str::to_string)
                .ok_or_else(|| anyhow!("package descriptor has no name"))?,
        };

        Ok(Self {
            name,
            categories: collect_categories(&fields),
        })
    }

    /// Every declared dependency name across all categories.
    pub fn all_dependency_names(&self) -> BTreeSet<&str> {
        self.categories
            .values()
            .flatten()
            .map(String::as_str)
            .collect()
    }

    pub fn category(&self, category: &str) -> Option<&BTreeSet<String>> {
        self.categories.get(category)
    }
}

pub fn is_dependency_category(field: &str) -> bool {
    const SUFFIX: &str = "Dependencies";
    field == "dependencies" || (field.len() > SUFFIX.len() && field.ends_with(SUFFIX))
}

fn collect_categories(fields: &Map<String, Value>) -> BTreeMap<String, BTreeSet<String>> {
    let mut categories = BTreeMap::new();
    for (field, value) in fields {
        if !is_dependency_category(field) {
            continue;
        }
        let names: BTreeSet<String> = match value {
            Value::Object(entries) => entries.keys().cloned().collect(),
            Value::Array(entries) => entries
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            _ => continue,
        };
        categories.insert(field.clone(), names);
    }
    categories
}
