//! Audit Log
//!
//! One line per finished rewrite command, for later inspection.

use anyhow::Result;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Append an entry to `<dir>/audit.log`
pub fn log_in(dir: &Path, entry: &str) -> Result<()> {
    std::fs::create_dir_all(dir)?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("audit.log"))?;

    writeln!(
        file,
        "[{}] {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        entry
    )?;
    Ok(())
}
