//! Run statistics reporting.

use console::style;

use crate::download::RunStats;

/// Print the end-of-run summary.
pub fn print_run_stats(stats: &RunStats) {
    println!();
    println!("{}", style("Run summary:").bold());
    println!("  Episodes completed: {}", stats.episodes_completed);
    if stats.episodes_failed > 0 {
        println!(
            "  Episodes failed:    {}",
            style(stats.episodes_failed).red()
        );
    }
    if stats.segments_missing > 0 {
        println!(
            "  Missing segments:   {}",
            style(stats.segments_missing).yellow()
        );
    }
    if stats.segments_recovered > 0 {
        println!(
            "  Recovered segments: {}",
            style(stats.segments_recovered).yellow()
        );
    }
    println!("  Bytes written:      {}", stats.bytes_written);
}
