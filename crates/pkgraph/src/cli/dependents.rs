//! `pkgraph dependents` command implementation.

use colored::Colorize;
use pkgraph::RelationSource;
use pkgraph::metrics::dependents_of;

use super::Context;
use super::display::print_names;

/// Run the dependents command.
pub fn run(ctx: &Context, package: &str) -> Result<(), pkgraph::Error> {
    let store = ctx.open_store()?;
    let dependents = dependents_of(&store.deps()?, package);

    println!(
        "{} packages depend on {}:",
        dependents.len().to_string().green().bold(),
        package.cyan()
    );
    print_names(&dependents, "no dependents found");
    Ok(())
}
