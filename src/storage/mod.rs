//! # Storage Layer
//!
//! Persistence for Contact Book in plain text formats.
//!
//! ## Storage Formats
//!
//! | Data | Format | Default location |
//! |------|--------|------------------|
//! | Contacts | CSV with `name,phone,email` header | `contacts.csv` |
//! | Snapshot | JSON array of objects | `contacts.json` |
//! | Failures | One timestamped line per failure | `error_log.txt` |
//! | Config | TOML | `contact-book.toml` |
//!
//! ## Concurrency
//!
//! Single-user by assumption. [`ContactStore`] holds an `fs2` advisory lock
//! only while a file is open, and rewrites go through a temp file + rename.
//! Nothing protects a read-modify-write cycle from another process.
//!
//! ## Key Types
//!
//! - [`ContactStore`] - Read/append/rewrite the contact CSV
//! - [`Interchange`] - Export to and validate imports from JSON
//! - [`ErrorLog`] - Append failure entries
//! - [`Config`] - File locations

mod csv_store;
mod interchange;
mod error_log;
mod config;

pub use csv_store::{ContactStore, FIELDS};
pub use interchange::{ImportBatch, Interchange};
pub use error_log::ErrorLog;
pub use config::{Config, ConfigError, Overrides, LOCAL_CONFIG_FILE};
