//! `pkgraph stats` command implementation.

use colored::Colorize;
use pkgraph::{Relation, RelationSource};

use super::Context;

/// Run the stats command.
pub fn run(ctx: &Context) -> Result<(), pkgraph::Error> {
    let store = ctx.open_store()?;

    let db_size_str = match std::fs::metadata(&ctx.database) {
        Ok(meta) => format_size(meta.len()),
        Err(e) => {
            tracing::debug!(error = %e, "Failed to get database file size");
            "size unknown".to_string()
        }
    };

    let counts = store.relation_counts()?;

    println!("{}", "Package Index Statistics".cyan().bold());
    println!();
    println!(
        "  {}: {} ({})",
        "Database".white().bold(),
        ctx.database.display(),
        db_size_str
    );
    println!();

    for relation in Relation::ALL {
        match counts.get(relation) {
            Some(rows) => println!(
                "  {}: {}",
                relation.as_str().white().bold(),
                rows.to_string().green()
            ),
            None => println!(
                "  {}: {}",
                relation.as_str().white().bold(),
                "absent".yellow()
            ),
        }
    }

    Ok(())
}

#[allow(clippy::cast_precision_loss)]
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}
