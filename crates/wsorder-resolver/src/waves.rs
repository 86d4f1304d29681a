use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::error::OrderError;
use crate::order::validate_edges;

/// Incremental order built in waves.
///
/// Each wave places every remaining package whose dependencies were placed by
/// earlier waves, in lexicographic order. A wave that places nothing while
/// packages remain means the rest is blocked by a cycle.
pub fn wave_order(
    packages: &BTreeSet<String>,
    edges: &BTreeMap<String, BTreeSet<String>>,
) -> Result<Vec<String>, OrderError> {
    validate_edges(packages, edges)?;

    let mut placed: BTreeSet<&str> = BTreeSet::new();
    let mut ordered = Vec::with_capacity(packages.len());
    let mut remaining: Vec<&str> = packages.iter().map(String::as_str).collect();
    let mut wave = 0_usize;

    while !remaining.is_empty() {
        let (ready, blocked): (Vec<&str>, Vec<&str>) = std::mem::take(&mut remaining)
            .into_iter()
            .partition(|name| dependencies(edges, name).all(|dep| placed.contains(dep)));

        if ready.is_empty() {
            debug!(wave, blocked = blocked.len(), "wave made no progress");
            return Err(OrderError::Cycle {
                cycle: blocked.into_iter().map(str::to_string).collect(),
            });
        }

        wave += 1;
        debug!(wave, packages = ready.len(), "placed wave");
        for name in ready {
            placed.insert(name);
            ordered.push(name.to_string());
        }
        remaining = blocked;
    }

    Ok(ordered)
}

fn dependencies<'a>(
    edges: &'a BTreeMap<String, BTreeSet<String>>,
    name: &str,
) -> impl Iterator<Item = &'a str> {
    edges.get(name).into_iter().flatten().map(String::as_str)
}
