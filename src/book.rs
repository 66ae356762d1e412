//! Contact book operations
//!
//! Every operation re-reads the store from disk. Mutations rewrite the whole
//! file, except [`ContactBook::add`] which appends one row. Operations report
//! what happened through small outcome enums and leave prompting and printing
//! to the caller.

use std::fmt;

use anyhow::Result;
use thiserror::Error;

use crate::domain::{Contact, ContactEdit, ContactError, ContactList};
use crate::storage::{Config, ContactStore, ImportBatch, Interchange};

/// The user-facing operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    List,
    Search,
    Update,
    Delete,
    Export,
    Import,
}

impl Operation {
    /// Name recorded in the error log
    pub fn label(&self) -> &'static str {
        match self {
            Operation::Add => "Add Contact",
            Operation::List => "View Contacts",
            Operation::Search => "Search Contact",
            Operation::Update => "Update Contact",
            Operation::Delete => "Delete Contact",
            Operation::Export => "Export to JSON",
            Operation::Import => "Import from JSON",
        }
    }

    /// Progressive verb used in failure messages
    pub fn verb(&self) -> &'static str {
        match self {
            Operation::Add => "adding contact",
            Operation::List => "displaying contacts",
            Operation::Search => "searching contact",
            Operation::Update => "updating contact",
            Operation::Delete => "deleting contact",
            Operation::Export => "exporting to JSON",
            Operation::Import => "importing from JSON",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An operation that did not complete
#[derive(Debug, Error)]
#[error("{operation}: {message}")]
pub struct OperationFailure {
    pub operation: Operation,
    pub message: String,
}

impl OperationFailure {
    pub fn new(operation: Operation, error: &anyhow::Error) -> Self {
        Self {
            operation,
            message: format!("{:#}", error),
        }
    }

    /// Short message shown to the user; details go to the error log
    pub fn user_message(&self) -> String {
        format!("Error {}. See error log.", self.operation.verb())
    }
}

/// Result of reading the store for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    /// The store file has not been created yet
    Missing,
    /// The store file exists but has no contacts
    Empty,
    Contacts(ContactList),
}

/// Result of a search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    MissingStore,
    NotFound,
    Found(Contact),
}

/// Result of an update or delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    MissingStore,
    /// Nothing matched and the store was not written
    NotFound,
    /// Number of rows changed
    Changed(usize),
}

/// The contact store together with its interchange file
pub struct ContactBook {
    store: ContactStore,
    interchange: Interchange,
}

impl ContactBook {
    pub fn new(config: &Config) -> Self {
        Self {
            store: ContactStore::new(&config.contacts_file),
            interchange: Interchange::new(&config.interchange_file),
        }
    }

    pub fn store(&self) -> &ContactStore {
        &self.store
    }

    pub fn interchange(&self) -> &Interchange {
        &self.interchange
    }

    /// Reads every contact, distinguishing a missing store from an empty one
    pub fn listing(&self) -> Result<Listing> {
        if !self.store.exists() {
            return Ok(Listing::Missing);
        }

        let contacts = self.store.read_all()?;
        if contacts.is_empty() {
            Ok(Listing::Empty)
        } else {
            Ok(Listing::Contacts(contacts))
        }
    }

    /// Returns true if a contact with this name is already stored
    pub fn contains(&self, name: &str) -> Result<bool> {
        Ok(self.store.read_all()?.contains_name(name))
    }

    /// Appends a contact; duplicates are the caller's decision
    pub fn add(&self, contact: &Contact) -> Result<()> {
        require_name(&contact.name)?;
        self.store.append(contact)
    }

    /// Finds the first contact with the given name
    pub fn search(&self, name: &str) -> Result<Lookup> {
        require_name(name)?;
        if !self.store.exists() {
            return Ok(Lookup::MissingStore);
        }

        let contacts = self.store.read_all()?;
        Ok(match contacts.first_named(name) {
            Some(contact) => Lookup::Found(contact.clone()),
            None => Lookup::NotFound,
        })
    }

    /// Edits every contact with the given name
    ///
    /// `edit` is asked for each match in store order. The store is rewritten
    /// once at the end, and only if something matched.
    pub fn update<F>(&self, name: &str, edit: F) -> Result<Change>
    where
        F: FnMut(&Contact) -> Result<ContactEdit>,
    {
        require_name(name)?;
        if !self.store.exists() {
            return Ok(Change::MissingStore);
        }

        let mut contacts = self.store.read_all()?;
        let matched = contacts.update_named(name, edit)?;
        if matched == 0 {
            return Ok(Change::NotFound);
        }

        self.store.rewrite(&contacts)?;
        Ok(Change::Changed(matched))
    }

    /// Removes every contact with the given name
    pub fn delete(&self, name: &str) -> Result<Change> {
        require_name(name)?;
        if !self.store.exists() {
            return Ok(Change::MissingStore);
        }

        let mut contacts = self.store.read_all()?;
        let removed = contacts.remove_named(name);
        if removed == 0 {
            return Ok(Change::NotFound);
        }

        self.store.rewrite(&contacts)?;
        Ok(Change::Changed(removed))
    }

    /// Writes the whole store to the interchange file
    ///
    /// Returns the number of contacts exported, or `None` if there is no store.
    pub fn export(&self) -> Result<Option<usize>> {
        if !self.store.exists() {
            return Ok(None);
        }

        let contacts = self.store.read_all()?;
        self.interchange.export(&contacts)?;
        Ok(Some(contacts.len()))
    }

    /// Reads and validates the interchange file without touching the store
    pub fn preview_import(&self) -> Result<Option<ImportBatch>> {
        self.interchange.load()
    }

    /// Replaces the store with `contacts`
    pub fn replace(&self, contacts: &ContactList) -> Result<()> {
        self.store.rewrite(contacts)
    }
}

fn require_name(name: &str) -> Result<(), ContactError> {
    if name.trim().is_empty() {
        return Err(ContactError::EmptyName);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, ContactBook) {
        let dir = TempDir::new().unwrap();
        let book = ContactBook::new(&Config::in_dir(dir.path()));
        (dir, book)
    }

    fn contact(name: &str, phone: &str, email: &str) -> Contact {
        Contact::new(name, phone, email).unwrap()
    }

    fn stored(book: &ContactBook) -> Vec<Contact> {
        book.store().read_all().unwrap().into_vec()
    }

    #[test]
    fn add_then_list() {
        let (_dir, book) = setup();
        assert_eq!(book.listing().unwrap(), Listing::Missing);

        book.add(&contact("Alice", "123", "a@x.com")).unwrap();

        match book.listing().unwrap() {
            Listing::Contacts(list) => {
                assert_eq!(list.as_slice(), &[contact("Alice", "123", "a@x.com")])
            }
            other => panic!("unexpected listing: {:?}", other),
        }
    }

    #[test]
    fn listing_distinguishes_empty_store() {
        let (_dir, book) = setup();
        book.add(&contact("Alice", "", "")).unwrap();
        book.delete("alice").unwrap();

        assert_eq!(book.listing().unwrap(), Listing::Empty);
    }

    #[test]
    fn add_rejects_blank_name() {
        let (_dir, book) = setup();
        let blank = Contact {
            name: "  ".to_string(),
            ..Contact::default()
        };

        assert!(book.add(&blank).is_err());
        assert!(!book.store().exists());
    }

    /// Store with a row whose name column was left blank
    fn setup_with_blank_row() -> (TempDir, ContactBook) {
        let (dir, book) = setup();
        fs::write(book.store().path(), "name,phone,email\n,555,x@y\nAlice,1,\n").unwrap();
        (dir, book)
    }

    fn is_empty_name(error: &anyhow::Error) -> bool {
        error.downcast_ref::<ContactError>() == Some(&ContactError::EmptyName)
    }

    #[test]
    fn search_rejects_blank_name() {
        let (_dir, book) = setup_with_blank_row();

        assert!(is_empty_name(&book.search("  ").unwrap_err()));
        assert!(is_empty_name(&book.search("").unwrap_err()));
    }

    #[test]
    fn update_rejects_blank_name() {
        let (_dir, book) = setup_with_blank_row();
        let before = fs::read(book.store().path()).unwrap();

        let err = book
            .update(" ", |_| Ok(ContactEdit::new("9", "9")))
            .unwrap_err();

        assert!(is_empty_name(&err));
        assert_eq!(fs::read(book.store().path()).unwrap(), before);
    }

    #[test]
    fn delete_rejects_blank_name() {
        let (_dir, book) = setup_with_blank_row();

        assert!(is_empty_name(&book.delete("").unwrap_err()));
        assert_eq!(stored(&book).len(), 2);
    }

    #[test]
    fn search_is_case_insensitive_and_first_match() {
        let (_dir, book) = setup();
        assert_eq!(book.search("bob").unwrap(), Lookup::MissingStore);

        book.add(&contact("Bob", "1", "")).unwrap();
        book.add(&contact("bob", "2", "")).unwrap();

        assert_eq!(book.search("BOB").unwrap(), Lookup::Found(contact("Bob", "1", "")));
        assert_eq!(book.search("bob").unwrap(), Lookup::Found(contact("Bob", "1", "")));
        assert_eq!(book.search("rob").unwrap(), Lookup::NotFound);
    }

    #[test]
    fn update_missing_name_leaves_file_untouched() {
        let (_dir, book) = setup();
        book.add(&contact("Alice", "123", "a@x.com")).unwrap();
        let before = fs::read(book.store().path()).unwrap();

        let change = book
            .update("nobody", |_| Ok(ContactEdit::new("9", "9")))
            .unwrap();

        assert_eq!(change, Change::NotFound);
        assert_eq!(fs::read(book.store().path()).unwrap(), before);
    }

    #[test]
    fn update_touches_every_duplicate() {
        let (_dir, book) = setup();
        book.add(&contact("Carol", "1", "")).unwrap();
        book.add(&contact("Dan", "2", "")).unwrap();
        book.add(&contact("CAROL", "3", "")).unwrap();

        let change = book
            .update("carol", |_| Ok(ContactEdit::new("", "c@y.com")))
            .unwrap();

        assert_eq!(change, Change::Changed(2));
        assert_eq!(
            stored(&book),
            vec![
                contact("Carol", "1", "c@y.com"),
                contact("Dan", "2", ""),
                contact("CAROL", "3", "c@y.com"),
            ]
        );
    }

    #[test]
    fn delete_removes_all_duplicates() {
        let (_dir, book) = setup();
        assert_eq!(book.delete("carol").unwrap(), Change::MissingStore);

        book.add(&contact("Carol", "555", "c@y.com")).unwrap();
        book.add(&contact("Dan", "1", "")).unwrap();
        book.add(&contact("carol", "000", "")).unwrap();

        assert_eq!(book.delete("Carol").unwrap(), Change::Changed(2));
        assert_eq!(stored(&book), vec![contact("Dan", "1", "")]);
        assert_eq!(book.delete("Carol").unwrap(), Change::NotFound);
    }

    #[test]
    fn export_requires_store() {
        let (_dir, book) = setup();

        assert_eq!(book.export().unwrap(), None);
        assert!(!book.interchange().path().exists());
    }

    #[test]
    fn export_then_import_round_trip() {
        let (_dir, book) = setup();
        let originals = vec![
            contact("Zed", "1", "z@x.com"),
            contact("Amy", "2", ""),
            contact("Smith, Jane", "3", "j@x.com"),
        ];
        for c in &originals {
            book.add(c).unwrap();
        }

        assert_eq!(book.export().unwrap(), Some(3));
        book.delete("zed").unwrap();

        let batch = book.preview_import().unwrap().unwrap();
        assert_eq!(batch.dropped, 0);
        book.replace(&batch.contacts).unwrap();

        assert_eq!(stored(&book), originals);
    }

    #[test]
    fn import_without_valid_entries_reports_empty_batch() {
        let (_dir, book) = setup();
        book.add(&contact("Alice", "1", "")).unwrap();
        fs::write(book.interchange().path(), r#"[{"phone": "1"}, {"email": "x"}]"#).unwrap();

        let batch = book.preview_import().unwrap().unwrap();

        assert!(batch.is_empty());
        assert_eq!(batch.dropped, 2);
        assert_eq!(stored(&book), vec![contact("Alice", "1", "")]);
    }

    #[test]
    fn failure_carries_operation_and_chain() {
        let error = anyhow::anyhow!("disk full").context("Failed to write contact");
        let failure = OperationFailure::new(Operation::Add, &error);

        assert_eq!(failure.message, "Failed to write contact: disk full");
        assert_eq!(failure.user_message(), "Error adding contact. See error log.");
        assert_eq!(failure.to_string(), "Add Contact: Failed to write contact: disk full");
    }
}
