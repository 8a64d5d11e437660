//! Tally CLI
//!
//! Command-line interface for Tally - flat record files, user folders and
//! search text.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use tally_core::Config;

mod commands;
mod logging;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Tally - read and edit flat record files")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use this config file instead of the default
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print one field of a record file
    Get {
        /// Record file
        file: PathBuf,
        /// Field name
        field: String,
    },
    /// Write one field of a record file
    Set {
        /// Record file (created if missing)
        file: PathBuf,
        /// Field name
        field: String,
        /// New value
        value: String,
        /// Append a missing field without starting a new line
        #[arg(long)]
        inline: bool,
        /// Escape quotes and backslashes in the value
        #[arg(long, conflicts_with = "raw")]
        escape: bool,
        /// Write the value exactly as given
        #[arg(long, conflicts_with = "escape")]
        raw: bool,
    },
    /// Print the items of a comma separated field
    #[command(alias = "ls")]
    List {
        /// Record file
        file: PathBuf,
        /// Field name
        field: String,
    },
    /// Split a comma separated string
    Split {
        /// Text to split
        data: String,
    },
    /// Break search text into quoted phrases and words
    Query {
        /// Search text
        text: String,
    },
    /// Manage user folders
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Show the school record
    School,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// List all users
    #[command(alias = "ls")]
    List,
    /// Show a user's profile
    Show {
        /// User folder name
        folder: String,
    },
    /// Check a user name and password
    Login {
        /// User name (any case)
        user_name: String,
        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// Grant or revoke teacher access
    Teacher {
        /// User name (any case)
        user_name: String,
        /// Password
        #[arg(short, long)]
        password: String,
        /// Revoke instead of grant
        #[arg(long)]
        disable: bool,
    },
    /// Add a file to a user's recent list
    Open {
        /// User folder name
        folder: String,
        /// File to add
        file: PathBuf,
    },
    /// Remove a file from a user's recent list
    Forget {
        /// User folder name
        folder: String,
        /// Entry to remove, as shown by `user show`
        file: String,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, log_file, escape_values, boundary, create_line)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    let config = Config::load_with_cli_override(cli.config.as_ref())
        .context("Failed to load configuration")?;
    logging::init(&config, cli.verbose);

    match cli.command {
        Commands::Get { file, field } => commands::record::get(file, field, &output),
        Commands::Set {
            file,
            field,
            value,
            inline,
            escape,
            raw,
        } => {
            let escape = match (escape, raw) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            commands::record::set(&config, file, field, value, inline, escape, &output)
        }
        Commands::List { file, field } => commands::record::list(file, field, &output),
        Commands::Split { data } => commands::record::split(data, &output),
        Commands::Query { text } => commands::query::parse(text, &output),
        Commands::User { command } => handle_user_command(command, &config, &output),
        Commands::School => commands::school::show(&config, &output),
        Commands::Config { command } => {
            handle_config_command(command, cli.config.as_ref(), &output)
        }
    }
}

fn handle_user_command(command: UserCommands, config: &Config, output: &Output) -> Result<()> {
    match command {
        UserCommands::List => commands::user::list(config, output),
        UserCommands::Show { folder } => commands::user::show(config, folder, output),
        UserCommands::Login {
            user_name,
            password,
        } => commands::user::login(config, user_name, password, output),
        UserCommands::Teacher {
            user_name,
            password,
            disable,
        } => commands::user::teacher(config, user_name, password, disable, output),
        UserCommands::Open { folder, file } => commands::user::open(config, folder, file, output),
        UserCommands::Forget { folder, file } => {
            commands::user::forget(config, folder, file, output)
        }
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}
