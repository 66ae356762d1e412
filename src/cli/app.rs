//! Main CLI application structure

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use super::commands;
use super::console::Terminal;
use super::output::{Output, OutputFormat};
use super::shell::Shell;
use crate::book::{ContactBook, Operation, OperationFailure};
use crate::storage::{Config, ErrorLog, Overrides};

#[derive(Parser)]
#[command(name = "contacts")]
#[command(author, version, about = "A single-user contact book backed by a CSV file")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Config file (defaults to ./contact-book.toml, then the user config dir)
    #[arg(long, global = true, env = "CONTACT_BOOK_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Contact CSV file
    #[arg(long, global = true, env = "CONTACT_BOOK_CONTACTS", value_name = "FILE")]
    pub contacts: Option<PathBuf>,

    /// JSON file used by export and import
    #[arg(long, global = true, env = "CONTACT_BOOK_INTERCHANGE", value_name = "FILE")]
    pub interchange: Option<PathBuf>,

    /// Error log file
    #[arg(long, global = true, env = "CONTACT_BOOK_ERROR_LOG", value_name = "FILE")]
    pub error_log: Option<PathBuf>,

    /// Command to run (defaults to the interactive shell)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the interactive menu (default)
    Shell,

    /// Add a contact
    Add {
        /// Contact name
        name: String,

        /// Phone number
        #[arg(long, short, default_value = "")]
        phone: String,

        /// Email address
        #[arg(long, short, default_value = "")]
        email: String,

        /// Add even if a contact with this name exists
        #[arg(long, short)]
        yes: bool,
    },

    /// List all contacts
    List,

    /// Show the first contact with a name
    Search {
        /// Name to look up (case-insensitive)
        name: String,
    },

    /// Change phone and/or email of every contact with a name
    Update {
        /// Name to update (case-insensitive)
        name: String,

        /// New phone number
        #[arg(long, short)]
        phone: Option<String>,

        /// New email address
        #[arg(long, short)]
        email: Option<String>,
    },

    /// Delete every contact with a name
    Delete {
        /// Name to delete (case-insensitive)
        name: String,
    },

    /// Export all contacts to the JSON file
    Export,

    /// Replace all contacts with those in the JSON file
    Import {
        /// Confirm replacing the contact file
        #[arg(long, short)]
        yes: bool,
    },
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(cli.format, cli.verbose);

    let overrides = Overrides {
        contacts_file: cli.contacts,
        interchange_file: cli.interchange,
        error_log: cli.error_log,
    };
    let config = Config::load(cli.config.as_deref(), overrides)?;
    output.verbose_ctx(
        "config",
        &format!(
            "contacts={} interchange={} error_log={}",
            config.contacts_file.display(),
            config.interchange_file.display(),
            config.error_log.display()
        ),
    );

    let book = ContactBook::new(&config);
    let log = ErrorLog::new(&config.error_log);

    let (operation, result) = match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => {
            return Shell::new(&book, &log, &output, Terminal::new())
                .run()
                .context("Failed to read from the console");
        }
        Commands::Add {
            name,
            phone,
            email,
            yes,
        } => (
            Operation::Add,
            commands::add(&book, &output, &name, &phone, &email, yes),
        ),
        Commands::List => (Operation::List, commands::list(&book, &output)),
        Commands::Search { name } => (Operation::Search, commands::search(&book, &output, &name)),
        Commands::Update { name, phone, email } => (
            Operation::Update,
            commands::update(&book, &output, &name, phone, email),
        ),
        Commands::Delete { name } => (Operation::Delete, commands::delete(&book, &output, &name)),
        Commands::Export => (Operation::Export, commands::export(&book, &output)),
        Commands::Import { yes } => (Operation::Import, commands::import(&book, &output, yes)),
    };

    if let Err(error) = result {
        let failure = OperationFailure::new(operation, &error);
        log.record(failure.operation, &failure.message);
        return Err(failure.into());
    }

    Ok(())
}
