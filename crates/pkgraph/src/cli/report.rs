//! `pkgraph report` command implementation.

use chrono::Utc;
use colored::Colorize;

use super::Context;
use super::display::{print_json, print_table};

/// Run the report command.
pub fn run(ctx: &Context, json: bool, limit: usize) -> Result<(), pkgraph::Error> {
    let analysis = ctx.analysis()?;
    let tables = analysis.report(Utc::now())?;

    if json {
        return print_json(&tables);
    }

    println!(
        "{} ({})",
        "Package index report".cyan().bold(),
        ctx.database.display()
    );
    println!();
    for table in &tables {
        print_table(table, limit);
    }
    Ok(())
}
