//! Contact domain model
//!
//! A contact is identified only loosely by its name. Names are compared
//! trimmed and case-insensitively, and duplicates are allowed.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContactError {
    #[error("Name cannot be empty")]
    EmptyName,
}

/// A single contact record
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

impl Contact {
    /// Creates a contact, rejecting names that are empty after trimming
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Self, ContactError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(ContactError::EmptyName);
        }

        Ok(Self {
            name,
            phone: phone.into().trim().to_string(),
            email: email.into().trim().to_string(),
        })
    }

    /// Returns true if this contact's name equals `query`, ignoring case and
    /// surrounding whitespace
    pub fn matches_name(&self, query: &str) -> bool {
        normalize(&self.name) == normalize(query)
    }

    /// Applies an edit in place
    pub fn apply(&mut self, edit: ContactEdit) {
        if let Some(phone) = non_blank(edit.phone) {
            self.phone = phone;
        }
        if let Some(email) = non_blank(edit.email) {
            self.email = email;
        }
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Replacement values for a contact's phone and email
///
/// Absent or blank values keep the existing field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactEdit {
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl ContactEdit {
    pub fn new(phone: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            phone: Some(phone.into()),
            email: Some(email.into()),
        }
    }

    /// Returns true if applying this edit would change nothing
    pub fn is_empty(&self) -> bool {
        [&self.phone, &self.email]
            .into_iter()
            .all(|value| value.as_deref().map_or(true, |v| v.trim().is_empty()))
    }
}

/// Ordered collection of contacts as they appear in the store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactList(Vec<Contact>);

impl ContactList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Contact> {
        self.0.iter()
    }

    pub fn push(&mut self, contact: Contact) {
        self.0.push(contact);
    }

    pub fn as_slice(&self) -> &[Contact] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Contact> {
        self.0
    }

    /// Returns the first contact with the given name
    ///
    /// Later duplicates are never reported.
    pub fn first_named(&self, name: &str) -> Option<&Contact> {
        self.0.iter().find(|c| c.matches_name(name))
    }

    /// Returns true if any contact has the given name
    pub fn contains_name(&self, name: &str) -> bool {
        self.first_named(name).is_some()
    }

    /// Edits every contact with the given name, in order
    ///
    /// `edit` is called once per matching contact and may fail, in which case
    /// the list is left partially edited and the error is returned. Returns the
    /// number of contacts that matched.
    pub fn update_named<F>(&mut self, name: &str, mut edit: F) -> Result<usize>
    where
        F: FnMut(&Contact) -> Result<ContactEdit>,
    {
        let mut matched = 0;
        for contact in self.0.iter_mut().filter(|c| c.matches_name(name)) {
            let change = edit(contact)?;
            contact.apply(change);
            matched += 1;
        }
        Ok(matched)
    }

    /// Removes every contact with the given name, returning how many were removed
    pub fn remove_named(&mut self, name: &str) -> usize {
        let len_before = self.0.len();
        self.0.retain(|c| !c.matches_name(name));
        len_before - self.0.len()
    }
}

impl From<Vec<Contact>> for ContactList {
    fn from(contacts: Vec<Contact>) -> Self {
        Self(contacts)
    }
}

impl FromIterator<Contact> for ContactList {
    fn from_iter<I: IntoIterator<Item = Contact>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ContactList {
    type Item = Contact;
    type IntoIter = std::vec::IntoIter<Contact>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ContactList {
    type Item = &'a Contact;
    type IntoIter = std::slice::Iter<'a, Contact>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
