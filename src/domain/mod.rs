//! Domain models for Contact Book
//!
//! Contains the matching and editing rules without any I/O concerns.

mod contact;

pub use contact::{Contact, ContactEdit, ContactError, ContactList};
