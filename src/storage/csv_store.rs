//! CSV storage for contacts
//!
//! Contacts are stored in `contacts.csv` with a `name,phone,email` header and
//! one row per contact. The file is read in full for every operation and
//! rewritten in full for every mutation except adds, which append a row.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;

use crate::domain::{Contact, ContactList};

/// Header row of the contact file
pub const FIELDS: [&str; 3] = ["name", "phone", "email"];

/// Store for contact data in CSV format
pub struct ContactStore {
    path: PathBuf,
}

impl ContactStore {
    /// Creates a new contact store at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if the store file has been created
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Reads all contacts in file order
    ///
    /// A missing file reads as an empty list.
    pub fn read_all(&self) -> Result<ContactList> {
        if !self.path.exists() {
            return Ok(ContactList::new());
        }

        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open contact store: {}", self.path.display()))?;

        file.lock_shared()
            .context("Failed to acquire read lock on contact store")?;

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(BufReader::new(&file));

        // Columns are located by header name; short rows leave fields empty
        let headers = reader
            .headers()
            .context("Failed to read contact store header")?
            .clone();
        let columns = FIELDS.map(|field| headers.iter().position(|h| h.trim() == field));

        let mut contacts = ContactList::new();
        for (index, record) in reader.records().enumerate() {
            // Row 1 is the header
            let record = record
                .with_context(|| format!("Failed to parse contact at row {}", index + 2))?;
            let [name, phone, email] = columns.map(|column| {
                column
                    .and_then(|i| record.get(i))
                    .unwrap_or_default()
                    .to_string()
            });
            contacts.push(Contact { name, phone, email });
        }

        Ok(contacts)
    }

    /// Appends a single contact, writing the header first if the file is new
    pub fn append(&self, contact: &Contact) -> Result<()> {
        self.ensure_parent()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open contact store: {}", self.path.display()))?;

        file.lock_exclusive()
            .context("Failed to acquire write lock on contact store")?;

        let is_new = file
            .metadata()
            .context("Failed to inspect contact store")?
            .len()
            == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(BufWriter::new(&file));

        if is_new {
            writer
                .write_record(FIELDS)
                .context("Failed to write contact header")?;
        }
        writer
            .serialize(contact)
            .context("Failed to write contact")?;
        writer.flush().context("Failed to flush contact store")?;

        Ok(())
    }

    /// Replaces the store with the header followed by `contacts`, in order
    pub fn rewrite(&self, contacts: &ContactList) -> Result<()> {
        self.ensure_parent()?;

        let temp_path = self.temp_path();

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            file.lock_exclusive()
                .context("Failed to acquire write lock on contact store")?;

            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(BufWriter::new(&file));

            writer
                .write_record(FIELDS)
                .context("Failed to write contact header")?;
            for contact in contacts {
                writer
                    .serialize(contact)
                    .context("Failed to write contact")?;
            }

            writer.flush().context("Failed to flush contact store")?;
        }

        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }

    fn ensure_parent(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("contacts.csv"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
