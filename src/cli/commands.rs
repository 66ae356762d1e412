//! Non-interactive commands
//!
//! Each command performs one operation from its arguments alone. Anything the
//! shell would ask to confirm must be confirmed up front with `--yes`.

use anyhow::Result;

use super::output::{contact_card, contact_table, Output};
use crate::book::{Change, ContactBook, Listing, Lookup};
use crate::domain::{Contact, ContactEdit};

/// Adds a contact, refusing duplicates unless `yes` is set
pub fn add(
    book: &ContactBook,
    output: &Output,
    name: &str,
    phone: &str,
    email: &str,
    yes: bool,
) -> Result<()> {
    let contact = Contact::new(name, phone, email)?;

    if book.contains(&contact.name)? && !yes {
        output.verbose_ctx("add", &format!("'{}' already stored, no --yes", contact.name));
        if output.is_json() {
            output.data(&serde_json::json!({ "added": null, "cancelled": true }));
        } else {
            output.success(&format!(
                "A contact named '{}' already exists. Add cancelled (pass --yes to add a duplicate).",
                contact.name
            ));
        }
        return Ok(());
    }

    book.add(&contact)?;

    if output.is_json() {
        output.data(&serde_json::json!({ "added": contact }));
    } else {
        output.success(&format!("Contact '{}' added successfully.", contact.name));
    }
    Ok(())
}

/// Prints every contact
pub fn list(book: &ContactBook, output: &Output) -> Result<()> {
    let listing = book.listing()?;

    if output.is_json() {
        let contacts = match listing {
            Listing::Contacts(contacts) => contacts.into_vec(),
            Listing::Missing | Listing::Empty => Vec::new(),
        };
        output.data(&contacts);
        return Ok(());
    }

    match listing {
        Listing::Missing => println!("No contact file found, add contacts first."),
        Listing::Empty => println!("No contacts found, add some contacts first."),
        Listing::Contacts(contacts) => {
            for line in contact_table(&contacts) {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

/// Prints the first contact with the given name
pub fn search(book: &ContactBook, output: &Output, name: &str) -> Result<()> {
    let lookup = book.search(name)?;

    if output.is_json() {
        let found = match lookup {
            Lookup::Found(contact) => Some(contact),
            Lookup::MissingStore | Lookup::NotFound => None,
        };
        output.data(&serde_json::json!({ "found": found }));
        return Ok(());
    }

    match lookup {
        Lookup::MissingStore => println!("No contacts found, add some first."),
        Lookup::NotFound => println!("Contact not found, try a different name."),
        Lookup::Found(contact) => {
            for line in contact_card(&contact) {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

/// Applies the same phone/email to every contact with the given name
pub fn update(
    book: &ContactBook,
    output: &Output,
    name: &str,
    phone: Option<String>,
    email: Option<String>,
) -> Result<()> {
    let edit = ContactEdit { phone, email };
    if edit.is_empty() {
        output.verbose_ctx("update", "no --phone or --email given");
        if output.is_json() {
            output.data(&serde_json::json!({ "updated": 0 }));
        } else {
            output.success("Nothing to update (pass --phone and/or --email).");
        }
        return Ok(());
    }

    let change = book.update(name, |_| Ok(edit.clone()))?;
    report_change(output, "updated", name, change);
    Ok(())
}

/// Removes every contact with the given name
pub fn delete(book: &ContactBook, output: &Output, name: &str) -> Result<()> {
    let change = book.delete(name)?;
    report_change(output, "deleted", name, change);
    Ok(())
}

/// Exports the store to the interchange file
pub fn export(book: &ContactBook, output: &Output) -> Result<()> {
    let path = book.interchange().path().display().to_string();

    match book.export()? {
        None => output.success("No contacts to export."),
        Some(count) if output.is_json() => {
            output.data(&serde_json::json!({ "exported": count, "path": path }))
        }
        Some(count) => output.success(&format!("Exported {} contact(s) to {}", count, path)),
    }
    Ok(())
}

/// Replaces the store with the interchange file's valid entries
///
/// Without `yes` this only reports what would be imported.
pub fn import(book: &ContactBook, output: &Output, yes: bool) -> Result<()> {
    let Some(batch) = book.preview_import()? else {
        output.success("No JSON file found.");
        return Ok(());
    };

    output.verbose_ctx(
        "import",
        &format!("{} valid, {} dropped", batch.contacts.len(), batch.dropped),
    );

    let imported = !batch.is_empty() && yes;
    if imported {
        book.replace(&batch.contacts)?;
    }

    if output.is_json() {
        output.data(&serde_json::json!({
            "valid": batch.contacts.len(),
            "dropped": batch.dropped,
            "imported": imported,
        }));
    } else if batch.is_empty() {
        println!("No valid contacts found in JSON.");
    } else {
        println!("Found {} contact(s) in JSON.", batch.contacts.len());
        if imported {
            println!("CSV replaced with JSON contacts.");
        } else {
            println!("Import cancelled (pass --yes to replace the CSV).");
        }
    }
    Ok(())
}

fn report_change(output: &Output, verb: &str, name: &str, change: Change) {
    if output.is_json() {
        let count = match change {
            Change::Changed(count) => count,
            Change::MissingStore | Change::NotFound => 0,
        };
        let mut body = serde_json::Map::new();
        body.insert(verb.to_string(), count.into());
        output.data(&body);
        return;
    }

    match change {
        Change::MissingStore => println!("No contacts found, add some first."),
        Change::NotFound => println!("Contact not found."),
        Change::Changed(count) => {
            println!("{} contact(s) named '{}' {}.", count, name, verb)
        }
    }
}
