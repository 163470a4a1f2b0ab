//! Benchmark CLI.
//!
//! Usage:
//!   aligned-dot              # Run the full suite
//!   aligned-dot --version    # Print the banner and exit
//!   aligned-dot --help       # Show help

use aligned_dot::config::{parse_args, BenchConfig, Command, VECTOR_LENGTH};
use aligned_dot::layout::lines_for;
use aligned_dot::math::dot_product::bench::Suite;
use aligned_dot::{tui, Result};
use std::env;
use std::process;

fn run(config: &BenchConfig) -> Result<()> {
    config.install_thread_pool()?;

    let suite = Suite::<{ lines_for(VECTOR_LENGTH) }>::new(VECTOR_LENGTH, config)?;
    tui::run_and_display(&suite, config)?;
    Ok(())
}

fn main() {
    let command = match parse_args(env::args().skip(1)) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Run with --help for usage.");
            process::exit(1);
        }
    };

    match command {
        Command::Version => tui::print_disclaimer(),
        Command::Help => tui::print_help(),
        Command::Run { config, ignored } => {
            for arg in &ignored {
                eprintln!("Warning: ignoring unknown argument '{}'", arg);
            }

            tui::print_header();
            if let Err(e) = run(&config) {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
    }
}
