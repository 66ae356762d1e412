//! JSON interchange file
//!
//! A snapshot of the contact store as a top-level JSON array of
//! `{"name", "phone", "email"}` objects. It is written only by export and
//! read only by import; nothing keeps it in sync with the store.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Serializer, Value};

use crate::domain::{Contact, ContactList};

/// The interchange file on disk
pub struct Interchange {
    path: PathBuf,
}

impl Interchange {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `contacts` as an indented JSON array, replacing any existing file
    pub fn export(&self, contacts: &ContactList) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let mut buf = Vec::new();
        let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        contacts
            .serialize(&mut serializer)
            .context("Failed to serialize contacts")?;
        buf.push(b'\n');

        fs::write(&self.path, buf)
            .with_context(|| format!("Failed to write interchange file: {}", self.path.display()))
    }

    /// Reads and validates the interchange file
    ///
    /// Returns `None` if the file does not exist. Content that is not a JSON
    /// array is an error; individual entries that fail validation are dropped.
    pub fn load(&self) -> Result<Option<ImportBatch>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read interchange file: {}", self.path.display()))?;

        let entries: Vec<Value> = serde_json::from_str(&content).with_context(|| {
            format!(
                "Failed to parse interchange file (expected an array of contacts): {}",
                self.path.display()
            )
        })?;

        Ok(Some(ImportBatch::from_entries(entries)))
    }
}

/// Contacts accepted from an interchange file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportBatch {
    /// Valid entries in file order
    pub contacts: ContactList,
    /// Number of entries that failed validation
    pub dropped: usize,
}

impl ImportBatch {
    /// Keeps every entry that is an object with a non-empty `name`
    ///
    /// A name may be any truthy JSON value; numbers and booleans are kept in
    /// their JSON text form.
    pub fn from_entries(entries: impl IntoIterator<Item = Value>) -> Self {
        let mut batch = Self::default();
        for entry in entries {
            match entry.as_object().and_then(contact_from_object) {
                Some(contact) => batch.contacts.push(contact),
                None => batch.dropped += 1,
            }
        }
        batch
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }
}

fn contact_from_object(object: &Map<String, Value>) -> Option<Contact> {
    let name = object.get("name").filter(|v| is_truthy(v))?;
    Contact::new(
        field_text(Some(name)),
        field_text(object.get("phone")),
        field_text(object.get("email")),
    )
    .ok()
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

fn field_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
