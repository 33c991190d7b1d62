//! Common display utilities for CLI commands.

use colored::Colorize;
use pkgraph::ResultTable;

const MAX_DISPLAY_ITEMS: usize = 10;

/// Print a result table with aligned columns, showing at most `limit` rows.
pub fn print_table(table: &ResultTable, limit: usize) {
    println!("{}", table.metric.cyan().bold());

    if table.is_empty() {
        println!("  {}", "(no rows)".dimmed());
        println!();
        return;
    }

    let shown: Vec<Vec<String>> = table
        .rows
        .iter()
        .take(limit)
        .map(|row| row.iter().map(ToString::to_string).collect())
        .collect();

    let widths: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            shown
                .iter()
                .filter_map(|row| row.get(i))
                .map(String::len)
                .chain(std::iter::once(column.len()))
                .max()
                .unwrap_or_default()
        })
        .collect();

    let header = table
        .columns
        .iter()
        .zip(&widths)
        .map(|(column, &width)| format!("{column:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    println!("  {}", header.white().bold());

    for row in &shown {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(value, &width)| format!("{value:<width$}"))
            .collect::<Vec<_>>()
            .join("  ");
        println!("  {line}");
    }

    if table.len() > shown.len() {
        println!(
            "  {}",
            format!("... and {} more", table.len() - shown.len()).dimmed()
        );
    }
    println!();
}

/// Print tables as pretty JSON.
pub fn print_json(tables: &[ResultTable]) -> Result<(), pkgraph::Error> {
    let json = serde_json::to_string_pretty(tables)
        .map_err(|e| pkgraph::Error::Internal(format!("failed to serialize results: {e}")))?;
    println!("{json}");
    Ok(())
}

/// Print a list of names with truncation.
///
/// Shows up to `MAX_DISPLAY_ITEMS` names with bullet points. If there are
/// more, shows "... and N more". If empty, shows `empty_message`.
pub fn print_names(names: &[String], empty_message: &str) {
    if names.is_empty() {
        println!("    {}", empty_message.dimmed());
        return;
    }

    for name in names.iter().take(MAX_DISPLAY_ITEMS) {
        println!("    {} {name}", "•".dimmed());
    }

    if names.len() > MAX_DISPLAY_ITEMS {
        println!(
            "    {} ... and {} more",
            "•".dimmed(),
            names.len() - MAX_DISPLAY_ITEMS
        );
    }
}
