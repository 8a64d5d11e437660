//! Record command handlers

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::debug;

use tally_core::record::{
    enumerate_field, enumerate_strings, escape_value, field_exists, get_value, replace_value_with,
};
use tally_core::{Config, RecordFile, ReplaceOptions};

use crate::output::Output;

fn open_existing(file: &Path) -> Result<String> {
    let record = RecordFile::new(file);
    if !record.exists() {
        bail!("Record file not found: {}", file.display());
    }
    record
        .load()
        .with_context(|| format!("Failed to read {}", file.display()))
}

/// Print the value of one field
pub fn get(file: PathBuf, field: String, output: &Output) -> Result<()> {
    let data = open_existing(&file)?;
    let present = field_exists(&data, &field);
    output.print_value(&field, &get_value(&data, &field), present);
    Ok(())
}

/// Print the items of a comma separated field
pub fn list(file: PathBuf, field: String, output: &Output) -> Result<()> {
    let data = open_existing(&file)?;
    output.print_list(&enumerate_field(&data, &field));
    Ok(())
}

/// Split a comma separated string given on the command line
pub fn split(data: String, output: &Output) -> Result<()> {
    output.print_list(&enumerate_strings(&data));
    Ok(())
}

/// Write one field, creating the file when it does not exist yet
pub fn set(
    config: &Config,
    file: PathBuf,
    field: String,
    value: String,
    inline: bool,
    escape: Option<bool>,
    output: &Output,
) -> Result<()> {
    let mut options = config.replace_options();
    if inline {
        options.create_line = false;
    }
    if let Some(escape) = escape {
        options.escape = escape;
    }

    let stored = write_field(&file, &field, &value, &options)?;
    output.success(&format!("Set {} = \"{}\"", field, stored));
    Ok(())
}

/// Replace `field` in the record at `file` and return the text written
/// between the quotes
fn write_field(file: &Path, field: &str, value: &str, options: &ReplaceOptions) -> Result<String> {
    if field.trim().is_empty() {
        bail!("Field name cannot be empty");
    }

    let record = RecordFile::new(file);
    let current = record
        .load()
        .with_context(|| format!("Failed to read {}", file.display()))?;
    if field_exists(&current, field) && !options.boundary.finds(&current, field) {
        bail!(
            "{} is in {} but the '{}' boundary rule cannot find it; \
             run `tally config set boundary lookup` to edit it",
            field,
            file.display(),
            options.boundary
        );
    }

    debug!("Setting {} in {:?} with {:?}", field, file, options);
    record
        .update(|data| replace_value_with(data, field, value, options))
        .with_context(|| format!("Failed to update {}", file.display()))?;

    Ok(if options.escape {
        escape_value(value)
    } else {
        value.to_string()
    })
}
