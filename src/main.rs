//! k9table - live, colorized tables of cluster resources
//!
//! Watches a resource kind, diffs every refresh against the previous one and
//! colors rows by what changed.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use k9table::cli;
use k9table::client::Scope;
use k9table::config::{Config, ConfigLoader};
use k9table::render::Registry;
use std::path::PathBuf;

/// k9table - live, colorized tables of cluster resources
#[derive(Parser, Debug)]
#[command(name = "k9table", version)]
#[command(about = "Live, colorized tables of cluster resources", long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(long, short = 'd', global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

/// Namespace selection shared by commands that list objects
#[derive(clap::Args, Debug)]
struct ScopeArgs {
    /// Namespace to show (defaults to `defaultNamespace` from the config)
    #[arg(long, short = 'n', conflicts_with = "all_namespaces")]
    namespace: Option<String>,

    /// Show every namespace
    #[arg(long, short = 'A')]
    all_namespaces: bool,
}

impl ScopeArgs {
    fn scope(&self, default_namespace: &str) -> Scope {
        if self.all_namespaces {
            return Scope::All;
        }
        Scope::from(self.namespace.as_deref().unwrap_or(default_namespace))
    }
}

/// Main commands
#[derive(Subcommand, Debug)]
enum Command {
    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: cli::ConfigSubcommand,
    },
    /// List resource command aliases
    Aliases,
    /// Watch a resource kind (alias like `ks` or `group/version/resource`)
    Watch {
        resource: String,
        #[command(flatten)]
        scope: ScopeArgs,
    },
    /// Benchmark rendering objects read from a JSON or YAML file
    Bench {
        resource: String,
        /// File holding a list of objects
        #[arg(long, short = 'f')]
        file: PathBuf,
        #[command(flatten)]
        scope: ScopeArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_file = cli::init_logging(args.debug);
    if let Some(ref log_path) = log_file {
        eprintln!(
            "Debug logging enabled. Logs written to: {}",
            log_path.display()
        );
    }

    // Renderers are fixed before any view opens
    Registry::init_global(Registry::builtin()).context("Failed to initialize renderers")?;

    let session = cli::KubeContext::current();
    tracing::debug!(
        "Using cluster={} context={}",
        session.cluster,
        session.context
    );

    match args.command {
        Command::Config { subcommand } => cli::handle_config_command(
            subcommand,
            Some(&session.cluster),
            Some(&session.context),
        ),
        Command::Aliases => {
            let config = load_config(&session)?;
            cli::handle_aliases(&config).await
        }
        Command::Watch { resource, scope } => {
            let config = load_config(&session)?;
            let scope = scope.scope(&config.default_namespace);
            cli::handle_watch(&resource, scope, &config).await
        }
        Command::Bench {
            resource,
            file,
            scope,
        } => {
            let config = load_config(&session)?;
            let scope = scope.scope(&config.default_namespace);
            cli::handle_bench(&resource, &file, scope, &config, &session).await
        }
    }
}

/// Load and check the layered configuration for the current context
fn load_config(session: &cli::KubeContext) -> Result<Config> {
    let config = ConfigLoader::validate(Some(&session.cluster), Some(&session.context))
        .context("Invalid configuration")?;
    tracing::debug!(
        "Configuration loaded: namespace={}, refreshRate={}s, skin={}",
        config.default_namespace,
        config.refresh_rate,
        config.ui.skin
    );
    Ok(config)
}
