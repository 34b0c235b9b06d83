use crate::coverage::ScanOutcome;
use crate::graph::BuildStats;
use crate::reduce::ReduceStats;
use colored::Colorize;

/// Human summary after graph extraction.
pub fn print_graph_summary(stats: &BuildStats) {
    println!();
    println!("{}", "Collaboration graph".cyan().bold());
    println!("  Classes:        {}", stats.classes.to_string().white());
    println!("  Edges:          {}", stats.kept_edges.to_string().white());
    println!(
        "  Calls resolved: {} of {}",
        stats.calls_resolved.to_string().white(),
        stats.calls_seen
    );
    println!(
        "{}",
        format!(
            "  {} duplicate call sites collapsed, {} edges filtered",
            stats.duplicate_edges, stats.filtered_edges
        )
        .dimmed()
    );
}

/// Human summary after a missing-test scan, untested targets listed first.
pub fn print_missing_summary(outcome: &ScanOutcome) {
    println!();
    if outcome.missing.is_empty() {
        println!("{}", "Every target is reached by a test.".green().bold());
    } else {
        println!(
            "{}",
            format!("Found {} untested methods:", outcome.untested_count())
                .yellow()
                .bold()
        );
        for descriptor in &outcome.missing {
            println!("  {}", descriptor.qualified_signature().white());
        }
    }

    println!();
    println!(
        "  Targets:  {}",
        outcome.stats.total_targets.to_string().white()
    );
    println!(
        "  Untested: {} ({:.2}%)",
        outcome.untested_count().to_string().white(),
        outcome.untested_percent()
    );
    println!(
        "{}",
        format!(
            "  {} test files scanned, {} skipped",
            outcome.stats.files_scanned, outcome.stats.files_skipped
        )
        .dimmed()
    );
}

/// Human summary after a reduction run.
pub fn print_reduce_summary(stats: &ReduceStats) {
    println!();
    if stats.total_test_methods == 0 {
        println!("{}", "No test methods found.".yellow());
        return;
    }

    println!("{}", "Reduction complete".cyan().bold());
    println!(
        "  Test methods: {}",
        stats.total_test_methods.to_string().white()
    );
    println!(
        "  Removed:      {}",
        stats.removed_methods.to_string().white()
    );
    println!(
        "  Kept:         {} ({:.2}%)",
        stats.kept_methods().to_string().white(),
        stats.kept_percent()
    );
    if stats.files_skipped > 0 {
        println!(
            "{}",
            format!("  {} files skipped", stats.files_skipped).dimmed()
        );
    }
}
