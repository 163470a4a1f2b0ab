//! CSV export of benchmark rows.

use crate::math::dot_product::bench::BenchRow;
use std::io::{self, Write};
use std::path::Path;

/// Column header, one line per row follows.
pub const CSV_HEADER: &str =
    "container,isa,length,iterations,threads,total_ns,per_call_ns,result,error";

/// Write `rows` as CSV to `out`. A failed row keeps its place with empty
/// timing columns and the error message in the last column.
pub fn write_csv<W: Write>(
    mut out: W,
    rows: &[BenchRow],
    length: usize,
    threads: usize,
) -> io::Result<()> {
    writeln!(out, "{}", CSV_HEADER)?;

    for row in rows {
        let container = row.case.container();
        let isa = row.case.isa().name();
        match &row.outcome {
            Ok(report) => writeln!(
                out,
                "{},{},{},{},{},{},{},{},",
                container,
                isa,
                length,
                report.iterations,
                threads,
                report.elapsed.as_nanos(),
                report
                    .per_call()
                    .map(|d| d.as_nanos().to_string())
                    .unwrap_or_default(),
                report.result
            )?,
            Err(e) => writeln!(
                out,
                "{},{},{},,{},,,,\"{}\"",
                container,
                isa,
                length,
                threads,
                e.to_string().replace('"', "'")
            )?,
        }
    }

    Ok(())
}

/// Export rows to the file at `path`, replacing it if it exists.
pub fn export_csv(path: &Path, rows: &[BenchRow], length: usize, threads: usize) -> io::Result<()> {
    let file = std::fs::File::create(path)?;
    let mut out = io::BufWriter::new(file);
    write_csv(&mut out, rows, length, threads)?;
    out.flush()
}
