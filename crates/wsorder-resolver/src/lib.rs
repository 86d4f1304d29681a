mod error;
mod extract;
mod order;
mod types;
mod waves;

pub use error::OrderError;
pub use extract::{
    build_dependency_graph, extract_internal_dependencies, extract_with_options, normalize_name,
    ExtractOptions,
};
pub use order::topo_order;
pub use types::{DependencyGraph, OrderStrategy};
pub use waves::wave_order;
