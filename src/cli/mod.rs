//! # Command-Line Interface
//!
//! Without a subcommand, `contacts` starts the interactive menu:
//!
//! | Choice | Operation |
//! |--------|-----------|
//! | 1 | Add Contact |
//! | 2 | View Contacts |
//! | 3 | Search Contact |
//! | 4 | Update Contact |
//! | 5 | Delete Contact |
//! | 6 | Export to JSON |
//! | 7 | Import from JSON |
//! | 8 | Exit |
//!
//! The same operations are available as subcommands for scripting
//! (`contacts add Alice --phone 123`, `contacts import --yes`, ...), with
//! `--format json` for machine-readable output.
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod commands;
mod console;
mod output;
mod shell;

pub use app::{run, Cli, Commands};
pub use console::{Console, ScriptedConsole, Terminal};
pub use output::{contact_card, contact_table, Output, OutputFormat};
pub use shell::{MenuChoice, Shell};
