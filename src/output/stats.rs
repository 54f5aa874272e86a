//! Statistics reporting.

use console::style;

use crate::download::{GlobalState, RunSummary};

/// Print statistics for a single source.
pub fn print_source_stats(summary: &RunSummary) {
    println!();
    println!(
        "{}",
        style(format!("Statistics for {}:", summary.source)).bold()
    );
    println!("  Posts:      {}", summary.posts_processed);
    println!("  Queued:     {}", summary.queued);
    println!("  Downloaded: {}", summary.downloaded);
    println!("  Skipped:    {} (duplicates)", summary.duplicates);
    if summary.failed > 0 {
        println!("  Failed:     {}", style(summary.failed).red());
    }
    if summary.malformed > 0 {
        println!("  Malformed:  {}", style(summary.malformed).yellow());
    }
    if let Some(path) = &summary.history_path {
        println!("  History:    {}", path.display());
    }
}

/// Print global statistics across all sources.
pub fn print_global_stats(state: &GlobalState) {
    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!("{}", style("Global Statistics:").bold());
    println!("  Sources processed: {}", state.sources_processed);
    if state.sources_failed > 0 {
        println!("  Sources failed:    {}", style(state.sources_failed).red());
    }
    print_summary(state.queued, state.downloaded, state.duplicates);
    println!("{}", style("═".repeat(50)).dim());
}

/// Print a summary line for quick viewing.
pub fn print_summary(queued: u64, downloaded: u64, duplicates: u64) {
    println!(
        "{} items queued, {} items downloaded ({} skipped)",
        style(queued).cyan(),
        style(downloaded).green(),
        style(duplicates).yellow()
    );
}
