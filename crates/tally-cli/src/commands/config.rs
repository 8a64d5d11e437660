//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use tally_core::{Boundary, Config};

use crate::output::Output;

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    if output.is_json() {
        println!(
            "{}",
            serde_json::json!({
                "data_dir": config.data_dir,
                "log_file": config.log_file,
                "escape_values": config.escape_values,
                "boundary": config.boundary,
                "create_line": config.create_line
            })
        );
        return Ok(());
    }
    if output.is_quiet() {
        println!("{}", config.data_dir.display());
        return Ok(());
    }

    let effective_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    println!("Configuration:");
    println!("  data_dir:      {}", config.data_dir.display());
    println!(
        "  log_file:      {}",
        config
            .log_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(not set)".to_string())
    );
    println!("  escape_values: {}", config.escape_values);
    println!("  boundary:      {}", config.boundary);
    println!("  create_line:   {}", config.create_line);
    println!();
    println!("Config file: {}", effective_path.display());

    Ok(())
}

/// Apply one `key = value` change to a configuration
fn apply(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "data_dir" => {
            config.data_dir = value.into();
        }
        "log_file" => {
            config.log_file = if value.is_empty() || value == "none" {
                None
            } else {
                Some(value.into())
            };
        }
        "escape_values" => {
            config.escape_values = value
                .parse()
                .context("Invalid value for escape_values. Use 'true' or 'false'.")?;
        }
        "boundary" => {
            config.boundary = value.parse::<Boundary>().map_err(anyhow::Error::msg)?;
        }
        "create_line" => {
            config.create_line = value
                .parse()
                .context("Invalid value for create_line. Use 'true' or 'false'.")?;
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: data_dir, log_file, escape_values, boundary, create_line",
                key
            );
        }
    }
    Ok(())
}

/// Set a configuration value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    apply(&mut config, &key, &value)?;

    // Save to the CLI-specified path or default
    let save_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}
