use super::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use wsorder_resolver::{ExtractOptions, OrderError, OrderStrategy};

#[test]
fn loads_descriptors_in_directory_order() {
    let root = test_workspace_root();
    write_package(&root, "util", r#"{"name": "@welshman/util"}"#);
    write_package(
        &root,
        "app",
        r#"{"name": "@welshman/app", "dependencies": {"@welshman/util": "^0.1.0"}}"#,
    );

    let index = WorkspaceIndex::open(&root);
    let descriptors = index.load_descriptors().expect("must load descriptors");
    let loaded: Vec<&str> = descriptors.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(loaded, vec!["@welshman/app", "@welshman/util"]);

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn skips_files_and_directories_without_descriptor() {
    let root = test_workspace_root();
    write_package(&root, "lib", r#"{"name": "lib"}"#);
    fs::create_dir_all(root.join("docs")).expect("must create docs dir");
    fs::write(root.join("README.md"), "# packages").expect("must write readme");

    let index = WorkspaceIndex::open(&root);
    assert_eq!(index.package_dirs().expect("must list dirs"), vec!["lib"]);

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn descriptor_without_name_uses_directory_name() {
    let root = test_workspace_root();
    write_package(&root, "feeds", r#"{"dependencies": {"lib": "*"}}"#);

    let descriptor = WorkspaceIndex::open(&root)
        .load_descriptor("feeds")
        .expect("must load descriptor");
    assert_eq!(descriptor.name, "feeds");

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn malformed_descriptor_is_fatal_and_names_the_file() {
    let root = test_workspace_root();
    write_package(&root, "broken", "{ not json");

    let err = WorkspaceIndex::open(&root)
        .load_descriptors()
        .expect_err("must reject malformed descriptor");
    let message = err.to_string();
    assert!(message.contains("malformed package descriptor"));
    assert!(message.contains("broken"));

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn missing_packages_directory_is_an_error() {
    let root = test_workspace_root();
    let err = WorkspaceIndex::open(root.join("absent"))
        .load_descriptors()
        .expect_err("must fail on missing directory");
    assert!(err.to_string().contains("failed to read packages directory"));
}

#[test]
fn dependency_graph_orders_scoped_workspace() {
    let root = test_workspace_root();
    write_package(
        &root,
        "lib",
        r#"{"name": "@welshman/lib", "dependencies": {"@noble/hashes": "^1.4.0"}}"#,
    );
    write_package(
        &root,
        "util",
        r#"{"name": "@welshman/util", "dependencies": {"@welshman/lib": "*"}}"#,
    );
    write_package(
        &root,
        "net",
        r#"{
  "name": "@welshman/net",
  "dependencies": {"@welshman/util": "*", "isomorphic-ws": "^5.0.0"},
  "devDependencies": {"@welshman/lib": "*"}
}"#,
    );

    let options = ExtractOptions::default().with_scope("@welshman");
    let graph = WorkspaceIndex::open(&root)
        .dependency_graph(&options)
        .expect("must build graph");
    assert_eq!(graph.len(), 3);
    assert_eq!(
        graph.order(OrderStrategy::DepthFirst).expect("must order"),
        vec!["lib", "util", "net"]
    );

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn dependency_graph_keeps_cycle_error_distinguishable() {
    let root = test_workspace_root();
    write_package(&root, "x", r#"{"name": "x", "dependencies": {"y": "*"}}"#);
    write_package(&root, "y", r#"{"name": "y", "peerDependencies": {"x": "*"}}"#);

    let graph = WorkspaceIndex::open(&root)
        .dependency_graph(&ExtractOptions::default())
        .expect("cyclic graph still builds");
    let err = anyhow::Error::from(
        graph
            .order(OrderStrategy::Waves)
            .expect_err("must reject cycle"),
    );
    assert!(matches!(
        err.downcast_ref::<OrderError>(),
        Some(OrderError::Cycle { .. })
    ));

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn duplicate_package_names_fail_graph_build() {
    let root = test_workspace_root();
    write_package(&root, "lib", r#"{"name": "lib"}"#);
    write_package(&root, "lib-copy", r#"{"name": "lib"}"#);

    let err = WorkspaceIndex::open(&root)
        .dependency_graph(&ExtractOptions::default())
        .expect_err("must reject duplicate names");
    assert!(matches!(
        err.downcast_ref::<OrderError>(),
        Some(OrderError::DuplicatePackage { .. })
    ));

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn config_defaults_when_file_missing() {
    let root = test_workspace_root();
    let config =
        OrderConfig::load_or_default(&root.join(DEFAULT_CONFIG_FILE)).expect("must default");
    assert_eq!(config, OrderConfig::default());
    assert_eq!(config.packages_dir, PathBuf::from(DEFAULT_PACKAGES_DIR));
    assert_eq!(
        config.categories,
        vec!["dependencies", "devDependencies", "peerDependencies"]
    );
    assert_eq!(config.strategy, OrderStrategy::DepthFirst);
}

#[test]
fn explicit_config_must_exist() {
    let root = test_workspace_root();
    let err = OrderConfig::load(&root.join("custom.toml")).expect_err("must require file");
    assert!(err.to_string().contains("failed reading config"));
}

#[test]
fn config_parses_all_fields() {
    let config = OrderConfig::from_toml_str(
        r#"
packages_dir = "libs"
scope = "@welshman/"
categories = ["dependencies"]
strategy = "waves"
"#,
    )
    .expect("config must parse");

    assert_eq!(config.packages_dir, PathBuf::from("libs"));
    assert_eq!(config.scope.as_deref(), Some("@welshman"));
    assert_eq!(config.strategy, OrderStrategy::Waves);

    let options = config.extract_options();
    assert_eq!(options.scope.as_deref(), Some("@welshman"));
    assert_eq!(
        options.categories.expect("categories restricted").len(),
        1
    );
}

#[test]
fn config_empty_categories_means_all_declared() {
    let config = OrderConfig::from_toml_str("categories = []\nscope = \"  \"")
        .expect("config must parse");
    let options = config.extract_options();
    assert_eq!(options.categories, None);
    assert_eq!(options.scope, None);
}

#[test]
fn config_rejects_unknown_fields_and_strategies() {
    let err = OrderConfig::from_toml_str("registry = \"npm\"").expect_err("must reject field");
    assert!(err.to_string().contains("failed to parse wsorder config"));

    OrderConfig::from_toml_str("strategy = \"breadth\"").expect_err("must reject strategy");
}

#[test]
fn config_file_parse_errors_name_the_path() {
    let root = test_workspace_root();
    fs::create_dir_all(&root).expect("must create root");
    let path = root.join(DEFAULT_CONFIG_FILE);
    fs::write(&path, "strategy = [").expect("must write config");

    let err = OrderConfig::load_or_default(&path).expect_err("must reject invalid toml");
    assert!(err.to_string().contains("failed parsing config"));

    let _ = fs::remove_dir_all(&root);
}

fn write_package(root: &Path, dir: &str, descriptor: &str) {
    let package_dir = root.join(dir);
    fs::create_dir_all(&package_dir).expect("must create package directory");
    fs::write(package_dir.join(DESCRIPTOR_FILE), descriptor).expect("must write descriptor");
}

static TEST_WORKSPACE_ROOT_COUNTER: AtomicU64 = AtomicU64::new(0);

fn test_workspace_root() -> PathBuf {
    let mut path = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time")
        .as_nanos();
    let counter = TEST_WORKSPACE_ROOT_COUNTER.fetch_add(1, Ordering::SeqCst);
    path.push(format!(
        "wsorder-workspace-tests-{}-{}-{}",
        std::process::id(),
        nanos,
        counter
    ));
    path
}
