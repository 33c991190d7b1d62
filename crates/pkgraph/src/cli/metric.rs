//! `pkgraph metric` command implementation.

use chrono::Utc;
use colored::Colorize;
use pkgraph::MetricKind;

use super::Context;
use super::display::{print_json, print_table};

/// Run the metric command.
pub fn run(ctx: &Context, name: &str, json: bool, limit: usize) -> Result<(), pkgraph::Error> {
    let kind = name.parse::<MetricKind>().inspect_err(|_| {
        let known = MetricKind::ALL
            .iter()
            .map(MetricKind::name)
            .collect::<Vec<_>>()
            .join(", ");
        eprintln!("{}: available metrics: {known}", "hint".dimmed());
    })?;

    let analysis = ctx.analysis()?;
    let table = analysis.run(kind, Utc::now())?;

    if json {
        return print_json(std::slice::from_ref(&table));
    }
    print_table(&table, limit);
    Ok(())
}
