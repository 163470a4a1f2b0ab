//! Text User Interface (TUI) utilities.
//!
//! Handles formatted output for the CLI. Everything goes to stdout except
//! warnings, which go to stderr.

use crate::config::BenchConfig;
use crate::error::Result;
use crate::layout::AlignmentReport;
use crate::math::dot_product::bench::{BenchReport, BenchRow, Suite};
use crate::math::dot_product::relative_error;
use crate::utils::{export_csv, format_seconds};
use terminal_size::{terminal_size, Width};

/// Get the current terminal width, constrained to a reasonable range
fn get_term_width() -> usize {
    if let Some((Width(w), _)) = terminal_size() {
        // Clamp width to avoid layout issues on very small or very large terminals
        (w as usize).clamp(40, 200)
    } else {
        80 // Safe default
    }
}

/// Print the application header
pub fn print_header() {
    let term_width = get_term_width().min(80); // Cap header at 80
    let title = " Aligned Dot Product Benchmarks ";
    let padding = term_width.saturating_sub(title.len() + 2) / 2;
    let right_padding = term_width.saturating_sub(padding + title.len());

    let border = "═".repeat(term_width);

    println!("╔{}╗", border);
    println!(
        "║{}{}{}║",
        " ".repeat(padding),
        title,
        " ".repeat(right_padding)
    );
    println!("╚{}╝", border);
    println!();
}

/// Static version banner.
pub fn disclaimer() -> String {
    format!(
        "{} {}\n\
         {}\n\
         Wide kernels are chosen when the binary is built; build with\n\
         RUSTFLAGS=\"-C target-cpu=native\" to include them.\n\
         Provided as is, without warranty of any kind. License: {}.",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_LICENSE"),
    )
}

/// Print the version banner
pub fn print_disclaimer() {
    println!("{}", disclaimer());
}

/// Print the help message
pub fn print_help() {
    println!("Usage: aligned-dot [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --version, -V  Print the version banner and exit");
    println!("  --help, -h     Show this help message");
    println!("  --iter N       Kernel calls per benchmark row (default: 100000)");
    println!("  --threads N    Worker threads for every kernel (default: 1)");
    println!("  --seed N       Random seed for reproducible input (default: time-based)");
    println!("  --pin          Pin each worker thread to its own CPU core");
    println!("  --csv PATH     Export the benchmark rows to CSV");
    println!();
    println!("Examples:");
    println!("  aligned-dot                      # Run the full suite");
    println!("  aligned-dot --iter 1000          # Quicker run");
    println!("  aligned-dot --threads 4 --pin    # Four pinned workers");
    println!("  aligned-dot --csv data.csv       # Export timings to CSV");
}

/// Print the alignment of one buffer
pub fn print_alignment(name: &str, elements: usize, report: &AlignmentReport) {
    println!("{} ({} elements):", name, elements);
    println!("{}", report);
}

/// One result line: label, runtime with fixed precision, result, and the
/// comparison against `baseline`.
pub fn format_row(row: &BenchRow, baseline: Option<&BenchReport>) -> String {
    let label = format!("{}:", row.case.label());
    match &row.outcome {
        Ok(report) => {
            let mut line = format!(
                " -{:<20} runtime: {:>10}, result: {:.3}",
                label,
                format_seconds(report.elapsed),
                report.result
            );
            if let Some(base) = baseline {
                let speedup = if report.elapsed.as_nanos() > 0 {
                    base.elapsed.as_secs_f64() / report.elapsed.as_secs_f64()
                } else {
                    0.0
                };
                line.push_str(&format!(
                    ", speedup: {:>6.2}x, rel. error: {:.2e}",
                    speedup,
                    relative_error(report.result, base.result)
                ));
            }
            line
        }
        Err(e) => format!(" -{:<20} failed: {}", label, e),
    }
}

/// Run the suite and print its output as rows complete.
///
/// The first successful row is the baseline for speedup and relative error.
/// Writes the CSV file afterwards when `config.csv_path` is set.
pub fn run_and_display<const LINES: usize>(
    suite: &Suite<LINES>,
    config: &BenchConfig,
) -> Result<Vec<BenchRow>> {
    println!();
    println!("DATA ALIGNMENT");
    print_alignment("Vector", suite.length(), &suite.vector_alignment());
    print_alignment("Array", suite.padded_length(), &suite.array_alignment());

    println!();
    println!(
        "STARTING BENCHMARKS with {} iterations ({} thread{})",
        suite.iterations(),
        config.threads,
        if config.threads == 1 { "" } else { "s" }
    );

    let mut baseline: Option<BenchReport> = None;
    let rows = suite.run_all(|row| {
        println!("{}", format_row(row, baseline.as_ref()));
        if baseline.is_none() {
            baseline = row.outcome.as_ref().ok().copied();
        }
    });
    println!();

    if let Some(path) = &config.csv_path {
        export_csv(path, &rows, suite.length(), config.threads)?;
        println!("  Raw data exported to: {}", path.display());
        println!();
    }

    println!("Note: Speedup is relative to the first row.");
    Ok(rows)
}
