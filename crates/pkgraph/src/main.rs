//! Pkgraph CLI - dependency closure and metrics from the command line.
//!
//! Reads a package index store, computes the transitive dependency closure
//! and prints the metric catalogue as tables or JSON.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

mod cli;

/// Pkgraph: transitive dependency closure and metrics for package indexes.
#[derive(Parser)]
#[command(name = "pkgraph")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Source database (overrides `database` in the config file)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Configuration file (defaults to ./pkgraph.yaml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute every metric
    Report {
        /// Print JSON instead of tables
        #[arg(long)]
        json: bool,

        /// Rows shown per table
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Compute a single metric by name
    Metric {
        /// Metric name (e.g. "top-packages", "bus-factor-1")
        name: String,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Rows shown
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Compute the transitive closure, or list one package's transitive dependencies
    Closure {
        /// Package whose transitive dependencies are listed
        package: Option<String>,

        /// Let the store evaluate the closure as a recursive query
        #[arg(long)]
        pushdown: bool,

        /// Abort if the fixed point is not reached within this many rounds
        #[arg(long)]
        max_rounds: Option<u32>,
    },

    /// List packages that directly depend on a package
    Dependents {
        /// Package name, as stored
        package: String,
    },

    /// List packages maintained by a maintainer
    Maintained {
        /// Maintainer account name
        maintainer: String,
    },

    /// Detect dependency cycles
    Cycles,

    /// Show store statistics
    Stats,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let result = cli::Context::resolve(cli.database, cli.config).and_then(|ctx| match cli.command {
        Commands::Report { json, limit } => cli::report::run(&ctx, json, limit),
        Commands::Metric { name, json, limit } => cli::metric::run(&ctx, &name, json, limit),
        Commands::Closure {
            package,
            pushdown,
            max_rounds,
        } => cli::closure::run(&ctx, package.as_deref(), pushdown, max_rounds),
        Commands::Dependents { package } => cli::dependents::run(&ctx, &package),
        Commands::Maintained { maintainer } => cli::maintained::run(&ctx, &maintainer),
        Commands::Cycles => cli::cycles::run(&ctx),
        Commands::Stats => cli::stats::run(&ctx),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {e}", "error".red().bold());
            // Show cause chain for nested errors
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                eprintln!("  {}: {cause}", "caused by".dimmed());
                source = std::error::Error::source(cause);
            }
            ExitCode::FAILURE
        }
    }
}
