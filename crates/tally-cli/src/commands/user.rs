//! User command handlers

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use tally_core::session::RECORD_FILE;
use tally_core::{Config, Session, UserDirectory};

use crate::output::Output;

fn directory(config: &Config) -> UserDirectory {
    UserDirectory::new(config.users_dir()).with_options(config.replace_options())
}

/// Resolve a user folder name and make sure it holds a record
fn user_folder(config: &Config, folder: &str) -> Result<PathBuf> {
    let dir = config.users_dir().join(folder);
    if !dir.join(RECORD_FILE).is_file() {
        bail!("No user record in {}", dir.display());
    }
    Ok(dir)
}

fn log_on(dir: &Path) -> Result<Session> {
    Session::log_on(dir).with_context(|| format!("Failed to log on from {}", dir.display()))
}

/// List all user folders
pub fn list(config: &Config, output: &Output) -> Result<()> {
    let users = directory(config)
        .entries()
        .context("Failed to read users directory")?;
    output.print_users(&users);
    Ok(())
}

/// Show one user's profile and recent files
pub fn show(config: &Config, folder: String, output: &Output) -> Result<()> {
    let session = log_on(&user_folder(config, &folder)?)?;
    output.print_profile(session.profile(), session.visible_recent());
    Ok(())
}

/// Check a user name and password
pub fn login(config: &Config, user_name: String, password: String, output: &Output) -> Result<()> {
    let Some(folder) = directory(config)
        .authenticate(&user_name, &password)
        .context("Failed to read users directory")?
    else {
        bail!("Unknown user name or wrong password");
    };

    if output.is_json() {
        println!(
            "{}",
            serde_json::json!({ "user_name": user_name, "folder": folder })
        );
    } else if output.is_quiet() {
        println!("{}", folder.display());
    } else {
        println!("✓ Logged on {} ({})", user_name, folder.display());
    }
    Ok(())
}

/// Grant or revoke the teacher flag
pub fn teacher(
    config: &Config,
    user_name: String,
    password: String,
    disable: bool,
    output: &Output,
) -> Result<()> {
    let changed = directory(config)
        .set_teacher(&user_name, &password, !disable)
        .context("Failed to update user record")?;
    if !changed {
        bail!("Unknown user name or wrong password");
    }

    let verb = if disable { "Revoked" } else { "Granted" };
    output.success(&format!("{} teacher access for {}", verb, user_name));
    Ok(())
}

/// Put a file at the front of a user's recent list
pub fn open(config: &Config, folder: String, file: PathBuf, output: &Output) -> Result<()> {
    let mut session = log_on(&user_folder(config, &folder)?)?;
    if !session.touch_recent(&file) {
        bail!("File not found: {}", file.display());
    }
    session.log_off().context("Failed to save session")?;
    output.success(&format!("Added {} to recent files", file.display()));
    Ok(())
}

/// Remove a file from a user's recent list
pub fn forget(config: &Config, folder: String, file: String, output: &Output) -> Result<()> {
    let mut session = log_on(&user_folder(config, &folder)?)?;
    if !session.forget_recent(&file) {
        bail!("{} is not in the recent list", file);
    }
    session.log_off().context("Failed to save session")?;
    output.success(&format!("Removed {} from recent files", file));
    Ok(())
}
