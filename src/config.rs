//! Command line configuration.
//!
//! Usage:
//!   aligned-dot                  # run the full suite with defaults
//!   aligned-dot --version        # print the banner and exit
//!   aligned-dot --iter 1000      # fewer calls per kernel
//!   aligned-dot --threads 4      # rayon worker count for every kernel

use crate::error::{Error, Result};
use crate::utils::WorkerPinning;
use std::path::PathBuf;

/// Logical length of the benchmarked vectors. Not a multiple of a cache
/// line, so the fixed-capacity buffers carry real padding.
pub const VECTOR_LENGTH: usize = 100_001;

/// Kernel calls per benchmark row.
pub const DEFAULT_ITERATIONS: usize = 100_000;

/// Worker threads for the kernels.
pub const DEFAULT_THREADS: usize = 1;

/// Settings for one benchmark run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BenchConfig {
    /// Kernel calls per row.
    pub iterations: usize,
    /// Size of the rayon pool, fixed for the whole run.
    pub threads: usize,
    /// Seed for the input vectors; time/OS seeded when `None`.
    pub seed: Option<u64>,
    /// Pin each rayon worker to its own core for the whole run.
    pub pin_cpu: bool,
    /// Where to write per-row results as CSV.
    pub csv_path: Option<PathBuf>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            threads: DEFAULT_THREADS,
            seed: None,
            pin_cpu: false,
            csv_path: None,
        }
    }
}

impl BenchConfig {
    /// Pool builder with `threads` workers. With `pin_cpu`, every worker
    /// pins itself to a core as it starts, round-robin over the cores the
    /// process may use.
    pub fn thread_pool_builder(&self) -> rayon::ThreadPoolBuilder {
        let builder = rayon::ThreadPoolBuilder::new().num_threads(self.threads);
        if !self.pin_cpu {
            return builder;
        }
        let pinning = WorkerPinning::new();
        builder.start_handler(move |index| {
            pinning.pin_worker(index);
        })
    }

    /// Build the global rayon pool from [`Self::thread_pool_builder`].
    ///
    /// Must be called once, before any kernel runs.
    pub fn install_thread_pool(&self) -> Result<()> {
        self.thread_pool_builder().build_global()?;
        Ok(())
    }
}

/// What the binary should do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Print the version banner and exit.
    Version,
    /// Print usage and exit.
    Help,
    /// Run the benchmark suite.
    Run {
        config: BenchConfig,
        /// Arguments that were not understood; reported, then ignored.
        ignored: Vec<String>,
    },
}

/// Parse arguments, excluding the program name.
///
/// `--version` and `--help` win over everything else. Unknown arguments do
/// not stop the suite; a malformed value for a known option does.
pub fn parse_args<I>(args: I) -> Result<Command>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    let args: Vec<String> = args.into_iter().map(Into::into).collect();

    if args.iter().any(|a| matches!(a.as_str(), "--version" | "--v" | "-V")) {
        return Ok(Command::Version);
    }
    if args.iter().any(|a| matches!(a.as_str(), "--help" | "-h")) {
        return Ok(Command::Help);
    }

    let mut config = BenchConfig::default();
    let mut ignored = Vec::new();

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--iter" => config.iterations = parse_value(&arg, iter.next())?,
            "--threads" => {
                config.threads = parse_value(&arg, iter.next())?;
                if config.threads == 0 {
                    return Err(Error::InvalidArgument(
                        "--threads must be at least 1".to_string(),
                    ));
                }
            }
            "--seed" => config.seed = Some(parse_value(&arg, iter.next())?),
            "--pin" => config.pin_cpu = true,
            "--csv" => {
                let path = iter.next().ok_or_else(|| missing_value(&arg))?;
                config.csv_path = Some(PathBuf::from(path));
            }
            _ => ignored.push(arg),
        }
    }

    Ok(Command::Run { config, ignored })
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<String>) -> Result<T> {
    let value = value.ok_or_else(|| missing_value(flag))?;
    value
        .trim()
        .parse()
        .map_err(|_| Error::InvalidArgument(format!("{} expects a number, got '{}'", flag, value)))
}

fn missing_value(flag: &str) -> Error {
    Error::InvalidArgument(format!("{} expects a value", flag))
}
