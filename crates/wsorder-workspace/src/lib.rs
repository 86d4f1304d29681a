mod config;
mod workspace_index;

pub use config::{OrderConfig, DEFAULT_CONFIG_FILE, DEFAULT_PACKAGES_DIR};
pub use workspace_index::{WorkspaceIndex, DESCRIPTOR_FILE};

#[cfg(test)]
mod tests;
