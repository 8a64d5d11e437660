//! School command handler

use anyhow::{bail, Context, Result};

use tally_core::session::RECORD_FILE;
use tally_core::{Config, RecordFile, School};

use crate::output::Output;

/// Show the school record from the data directory
pub fn show(config: &Config, output: &Output) -> Result<()> {
    let record = RecordFile::new(config.school_dir().join(RECORD_FILE));
    if !record.exists() {
        bail!("No school record at {}", record.path().display());
    }
    let data = record.load().context("Failed to read school record")?;
    output.print_school(&School::from_record(&data));
    Ok(())
}
