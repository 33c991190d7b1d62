//! `pkgraph maintained` command implementation.

use colored::Colorize;
use pkgraph::RelationSource;
use pkgraph::metrics::packages_maintained_by;

use super::Context;
use super::display::print_names;

/// Run the maintained command.
pub fn run(ctx: &Context, maintainer: &str) -> Result<(), pkgraph::Error> {
    let store = ctx.open_store()?;
    let packages = packages_maintained_by(&store.maintainers()?, &store.packages()?, maintainer);

    println!(
        "{} packages maintained by {}:",
        packages.len().to_string().green().bold(),
        maintainer.cyan()
    );
    print_names(&packages, "no packages found");
    Ok(())
}
