//! `pkgraph closure` command implementation.

use colored::Colorize;
use pkgraph::{Analysis, AnalysisConfig, ClosureControl, RelationSource, closure_from_store};
use tracing::warn;

use super::Context;
use super::display::print_names;

/// Run the closure command.
pub fn run(
    ctx: &Context,
    package: Option<&str>,
    pushdown: bool,
    max_rounds: Option<u32>,
) -> Result<(), pkgraph::Error> {
    let store = ctx.open_store()?;
    let (analysis, evaluated_by_store) = load_analysis(&store, &ctx.config, pushdown)?;

    let control = ClosureControl {
        cancel: None,
        max_rounds,
    };
    let closure = analysis.closure_with(&control)?;

    if let Some(package) = package {
        let deps = closure.dependencies_of(package);
        println!(
            "{} transitive dependencies of {}:",
            deps.len().to_string().green().bold(),
            package.cyan()
        );
        let names: Vec<String> = deps.into_iter().map(str::to_string).collect();
        print_names(&names, "none");
        return Ok(());
    }

    println!("{}", "Transitive closure".cyan().bold());
    println!();
    println!(
        "  {}: {}",
        "Filter".white().bold(),
        ctx.config.closure.extra
    );
    println!(
        "  {}: {} over {} packages",
        "Direct edges".white().bold(),
        analysis.edges().len().to_string().green(),
        analysis.edges().node_count()
    );
    println!(
        "  {}: {}",
        "Closure pairs".white().bold(),
        closure.len().to_string().green()
    );
    if evaluated_by_store {
        println!("  {}: {}", "Evaluated by".white().bold(), "store".dimmed());
    } else {
        println!("  {}: {}", "Rounds".white().bold(), closure.rounds());
    }
    Ok(())
}

/// Load the analysis, taking the closure from the store when `pushdown` is
/// requested and supported.
///
/// The flag is `true` only when the store's closure was installed.
fn load_analysis(
    store: &dyn RelationSource,
    config: &AnalysisConfig,
    pushdown: bool,
) -> Result<(Analysis, bool), pkgraph::Error> {
    let analysis = Analysis::load(store, config.clone())?;
    if !pushdown {
        return Ok((analysis, false));
    }

    match closure_from_store(store, &config.closure.extra)? {
        Some(closure) => Ok((analysis.with_closure(closure), true)),
        None => {
            warn!("Store cannot evaluate the closure; using the in-process engine");
            Ok((analysis, false))
        }
    }
}
