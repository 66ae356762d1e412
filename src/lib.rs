//! Contact Book - a single-user contact book
//!
//! Contacts live in a CSV file that is re-read on every operation and fully
//! rewritten on every mutation. A JSON snapshot can be exported and imported
//! back on demand. Failures are recorded in a sidecar error log.

pub mod domain;
pub mod storage;
pub mod book;
pub mod cli;

pub use book::{ContactBook, Operation, OperationFailure};
pub use domain::{Contact, ContactEdit, ContactList};
pub use storage::Config;
