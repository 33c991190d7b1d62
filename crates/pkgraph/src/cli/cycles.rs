//! `pkgraph cycles` command implementation.

use colored::Colorize;
use pkgraph::metrics::dependency_cycles;

use super::Context;

/// Run the cycles command.
pub fn run(ctx: &Context) -> Result<(), pkgraph::Error> {
    let analysis = ctx.analysis()?;

    let cycles = dependency_cycles(analysis.edges(), ctx.config.top_n);

    if cycles.is_empty() {
        println!("{}", "No dependency cycles detected.".green());
        return Ok(());
    }

    println!(
        "Found {} dependency cycles:",
        cycles.len().to_string().red().bold()
    );
    println!();

    for (i, cycle) in cycles.iter().enumerate() {
        println!(
            "  {} {} ({} packages):",
            "Cycle".yellow().bold(),
            i + 1,
            cycle.size()
        );

        // Members are sorted, not in path order
        let mut members = cycle.members.join(" ↔ ");
        if cycle.size() == 1 {
            members.push_str(" → itself");
        }
        println!("    {}", members.dimmed());
    }

    Ok(())
}
