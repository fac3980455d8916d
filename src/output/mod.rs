//! Durable report sinks reused by subsequent runs

use std::io::Write;
use std::path::Path;

use crate::error::Result;

pub mod csv;

/// Write organization IDs to a newline-delimited file, one per line, no
/// header. This is the hand-off from `promote` to `demote`.
pub fn write_org_ids(path: &Path, ids: &[String]) -> Result<()> {
    let mut file = std::fs::File::create(path)?;
    for id in ids {
        writeln!(file, "{id}")?;
    }
    Ok(())
}

/// Read organization IDs back from a newline-delimited file.
pub fn read_org_ids(path: &Path) -> Result<Vec<String>> {
    crate::config::read_lines(path)
}
