use std::collections::{btree_set, BTreeMap, BTreeSet};

use tracing::debug;

use crate::error::OrderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    InProgress,
    Done,
}

/// A package on the current walk path and the dependencies still to visit.
struct Frame<'a> {
    name: &'a str,
    pending: Option<btree_set::Iter<'a, String>>,
}

struct Walk<'a> {
    edges: &'a BTreeMap<String, BTreeSet<String>>,
    state: BTreeMap<&'a str, VisitState>,
    path: Vec<Frame<'a>>,
    ordered: Vec<String>,
}

/// Depth-first topological order, dependencies first.
///
/// Packages and dependency sets are walked in lexicographic order, so equal
/// inputs always produce the same sequence. A package missing from `edges` is
/// a leaf. The walk keeps its own stack, so chain length is bounded by memory
/// rather than by the thread stack.
pub fn topo_order(
    packages: &BTreeSet<String>,
    edges: &BTreeMap<String, BTreeSet<String>>,
) -> Result<Vec<String>, OrderError> {
    validate_edges(packages, edges)?;

    let mut walk = Walk {
        edges,
        state: BTreeMap::new(),
        path: Vec::new(),
        ordered: Vec::with_capacity(packages.len()),
    };
    for name in packages {
        walk.visit(name)?;
    }

    debug!(packages = walk.ordered.len(), "computed depth-first order");
    Ok(walk.ordered)
}

impl<'a> Walk<'a> {
    fn visit(&mut self, root: &'a str) -> Result<(), OrderError> {
        if self.state.contains_key(root) {
            return Ok(());
        }
        self.enter(root);

        loop {
            let next = match self.path.last_mut() {
                Some(frame) => frame.pending.as_mut().and_then(Iterator::next),
                None => return Ok(()),
            };

            match next {
                Some(dependency) => match self.state.get(dependency.as_str()) {
                    Some(VisitState::Done) => {}
                    Some(VisitState::InProgress) => return Err(self.cycle_through(dependency)),
                    None => self.enter(dependency),
                },
                None => self.leave(),
            }
        }
    }

    fn enter(&mut self, name: &'a str) {
        let edges = self.edges;
        self.state.insert(name, VisitState::InProgress);
        self.path.push(Frame {
            name,
            pending: edges.get(name).map(BTreeSet::iter),
        });
    }

    // All dependencies of the top frame are done.
    fn leave(&mut self) {
        if let Some(frame) = self.path.pop() {
            self.state.insert(frame.name, VisitState::Done);
            self.ordered.push(frame.name.to_string());
        }
    }

    // `name` is in progress, so it is on the current path.
    fn cycle_through(&self, name: &str) -> OrderError {
        let start = self
            .path
            .iter()
            .position(|frame| frame.name == name)
            .unwrap_or(0);
        let mut cycle: Vec<String> = self.path[start..]
            .iter()
            .map(|frame| frame.name.to_string())
            .collect();
        cycle.push(name.to_string());
        debug!(length = cycle.len() - 1, "dependency cycle detected");
        OrderError::Cycle { cycle }
    }
}

/// Every dependency of a known package must itself be known.
pub(crate) fn validate_edges(
    packages: &BTreeSet<String>,
    edges: &BTreeMap<String, BTreeSet<String>>,
) -> Result<(), OrderError> {
    for (package, dependencies) in edges {
        if !packages.contains(package) {
            continue;
        }
        if let Some(dependency) = dependencies.iter().find(|dep| !packages.contains(*dep)) {
            return Err(OrderError::UnknownDependency {
                package: package.clone(),
                dependency: dependency.clone(),
            });
        }
    }
    Ok(())
}
