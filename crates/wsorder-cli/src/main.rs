use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use tracing::info;
use wsorder_resolver::{DependencyGraph, OrderStrategy};
use wsorder_workspace::{OrderConfig, WorkspaceIndex, DEFAULT_CONFIG_FILE};

mod logging;
mod render;

use render::{render_error, OutputStyle};

#[derive(Parser, Debug)]
#[command(name = "wsorder")]
#[command(about = "Print workspace packages in dependency order", long_about = None)]
struct Cli {
    /// Config file; defaults to ./wsorder.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Raise log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(flatten)]
    selection: SelectionArgs,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Debug)]
struct SelectionArgs {
    /// Directory whose subdirectories are packages.
    #[arg(long, global = true)]
    root: Option<PathBuf>,
    /// Namespace stripped from internal package names, e.g. @welshman.
    #[arg(long, global = true)]
    scope: Option<String>,
    /// Dependency category to consider; repeatable.
    #[arg(long = "category", global = true, conflicts_with = "all_categories")]
    categories: Vec<String>,
    /// Consider every declared dependency category.
    #[arg(long, global = true)]
    all_categories: bool,
    #[arg(long, value_enum, global = true)]
    strategy: Option<CliOrderStrategy>,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Print package names, dependencies first (default).
    Order,
    /// Print each package with its internal dependencies.
    Deps,
    /// Print a shell completion script.
    Completions { shell: Shell },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum CliOrderStrategy {
    DepthFirst,
    Waves,
}

impl From<CliOrderStrategy> for OrderStrategy {
    fn from(value: CliOrderStrategy) -> Self {
        match value {
            CliOrderStrategy::DepthFirst => OrderStrategy::DepthFirst,
            CliOrderStrategy::Waves => OrderStrategy::Waves,
        }
    }
}

impl SelectionArgs {
    fn apply(&self, config: &mut OrderConfig) {
        if let Some(root) = &self.root {
            config.packages_dir = root.clone();
        }
        if let Some(scope) = &self.scope {
            let scope = scope.trim().trim_end_matches('/');
            config.scope = (!scope.is_empty()).then(|| scope.to_string());
        }
        if self.all_categories {
            config.categories.clear();
        } else if !self.categories.is_empty() {
            config.categories = self.categories.clone();
        }
        if let Some(strategy) = self.strategy {
            config.strategy = strategy.into();
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let stdout = io::stdout();
    match run_cli(cli, &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let style = OutputStyle::for_terminal(io::stderr().is_terminal());
            eprintln!("{}", render_error(style, &err));
            ExitCode::FAILURE
        }
    }
}

fn run_cli<W: Write>(cli: Cli, out: &mut W) -> Result<()> {
    match cli.command.clone().unwrap_or(Commands::Order) {
        Commands::Order => {
            let config = resolve_config(&cli)?;
            let graph = load_graph(&config)?;
            let order = graph.order(config.strategy)?;
            info!(
                packages = order.len(),
                strategy = ?config.strategy,
                "resolved package order"
            );
            // Nothing is written until the whole order is known.
            for name in order {
                writeln!(out, "{name}").context("failed writing package order")?;
            }
        }
        Commands::Deps => {
            let config = resolve_config(&cli)?;
            let graph = load_graph(&config)?;
            for line in format_dependency_lines(&graph) {
                writeln!(out, "{line}").context("failed writing dependency listing")?;
            }
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "wsorder", out);
        }
    }

    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<OrderConfig> {
    let mut config = match &cli.config {
        Some(path) => OrderConfig::load(path)?,
        None => OrderConfig::load_or_default(Path::new(DEFAULT_CONFIG_FILE))?,
    };
    cli.selection.apply(&mut config);
    Ok(config)
}

fn load_graph(config: &OrderConfig) -> Result<DependencyGraph> {
    let index = WorkspaceIndex::open(&config.packages_dir);
    let graph = index.dependency_graph(&config.extract_options())?;
    info!(
        root = %index.root().display(),
        packages = graph.len(),
        edges = graph.edge_count(),
        "built dependency graph"
    );
    Ok(graph)
}

fn format_dependency_lines(graph: &DependencyGraph) -> Vec<String> {
    graph
        .edges()
        .iter()
        .map(|(name, dependencies)| {
            if dependencies.is_empty() {
                format!("{name}: (none)")
            } else {
                let joined = dependencies
                    .iter()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{name}: {joined}")
            }
        })
        .collect()
}
