//! Interactive menu shell
//!
//! Shows the numbered menu, runs one operation per choice and always returns
//! to the menu. Choice 8 or the end of input leaves the loop. Failures inside
//! an operation are reported and logged here, in [`Shell::dispatch`], and
//! never end the session.

use std::io;

use anyhow::Result;

use super::console::Console;
use super::output::{contact_card, contact_table, Output};
use crate::book::{Change, ContactBook, Listing, Lookup, Operation, OperationFailure};
use crate::domain::{Contact, ContactEdit};
use crate::storage::ErrorLog;

const MENU: [&str; 8] = [
    "1. Add Contact",
    "2. View Contacts",
    "3. Search Contact",
    "4. Update Contact",
    "5. Delete Contact",
    "6. Export to JSON",
    "7. Import from JSON",
    "8. Exit",
];

/// A parsed menu selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Run(Operation),
    Exit,
}

impl MenuChoice {
    /// Parses a menu entry number; anything else is `None`
    pub fn parse(input: &str) -> Option<Self> {
        let choice = match input.trim() {
            "1" => MenuChoice::Run(Operation::Add),
            "2" => MenuChoice::Run(Operation::List),
            "3" => MenuChoice::Run(Operation::Search),
            "4" => MenuChoice::Run(Operation::Update),
            "5" => MenuChoice::Run(Operation::Delete),
            "6" => MenuChoice::Run(Operation::Export),
            "7" => MenuChoice::Run(Operation::Import),
            "8" => MenuChoice::Exit,
            _ => return None,
        };
        Some(choice)
    }
}

/// The interactive session
pub struct Shell<'a, C: Console> {
    book: &'a ContactBook,
    log: &'a ErrorLog,
    output: &'a Output,
    console: C,
}

impl<'a, C: Console> Shell<'a, C> {
    pub fn new(book: &'a ContactBook, log: &'a ErrorLog, output: &'a Output, console: C) -> Self {
        Self {
            book,
            log,
            output,
            console,
        }
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    /// Runs the menu loop until the user exits or input ends
    pub fn run(&mut self) -> io::Result<()> {
        self.welcome();

        loop {
            self.console.say("\nOptions:");
            for entry in MENU {
                self.console.say(entry);
            }

            let Some(input) = self.console.read_line("\nEnter your choice: ")? else {
                break;
            };

            match MenuChoice::parse(&input) {
                Some(MenuChoice::Run(operation)) => self.dispatch(operation),
                Some(MenuChoice::Exit) => break,
                None => self
                    .console
                    .say("Your choice doesn't exist, please try again."),
            }
        }

        self.console.say("\nExiting Contact Book, Goodbye!");
        Ok(())
    }

    /// Runs one operation, reporting and logging any failure
    pub fn dispatch(&mut self, operation: Operation) {
        self.output
            .verbose_ctx("shell", &format!("Running {}", operation));

        let result = match operation {
            Operation::Add => self.add(),
            Operation::List => self.list(),
            Operation::Search => self.search(),
            Operation::Update => self.update(),
            Operation::Delete => self.delete(),
            Operation::Export => self.export(),
            Operation::Import => self.import(),
        };

        if let Err(error) = result {
            let failure = OperationFailure::new(operation, &error);
            self.output.verbose_ctx("shell", &failure.to_string());
            self.console.say(&failure.user_message());
            self.log.record(failure.operation, &failure.message);
        }
    }

    fn welcome(&mut self) {
        let banner = "~".repeat(43);
        self.console.say(&banner);
        self.console.say("          WELCOME TO CONTACT BOOK          ");
        self.console.say(&banner);
        self.console
            .say("This tool helps you manage contacts using CSV and JSON files.");
        self.console
            .say("You can add, view, search, update, and delete contacts in this program\n");
    }

    fn add(&mut self) -> Result<()> {
        let name = self.console.ask("Enter Name: ")?;
        if name.is_empty() {
            self.console.say("Name cannot be empty.");
            return Ok(());
        }

        let phone = self.console.ask("Enter Phone No. : ")?;
        let email = self.console.ask("Enter Email Address: ")?;

        if self.book.contains(&name)? {
            self.console
                .say(&format!("A contact named '{}' already exists.", name));
            if !self
                .console
                .confirm("Do you want to add a duplicate? (y/N): ")?
            {
                self.console.say("Add cancelled.");
                return Ok(());
            }
        }

        let contact = Contact::new(name, phone, email)?;
        self.book.add(&contact)?;
        self.console
            .say(&format!("\nContact: '{}' added successfully.\n", contact.name));
        Ok(())
    }

    fn list(&mut self) -> Result<()> {
        match self.book.listing()? {
            Listing::Missing => self
                .console
                .say("\nNo contact file found, add contacts first.\n"),
            Listing::Empty => self
                .console
                .say("\nNo contacts found, add some contacts first.\n"),
            Listing::Contacts(contacts) => {
                self.console.say("\n===== CONTACT LIST =====");
                for line in contact_table(&contacts) {
                    self.console.say(&line);
                }
            }
        }
        Ok(())
    }

    fn search(&mut self) -> Result<()> {
        let Some(name) = self.ask_name("Enter name to search: ", "Search name cannot be empty.")?
        else {
            return Ok(());
        };

        match self.book.search(&name)? {
            Lookup::MissingStore => self.console.say("No contacts found, add some first."),
            Lookup::NotFound => self
                .console
                .say("\nContact not found, try a different name.\n"),
            Lookup::Found(contact) => {
                self.console.say("\nContact Found:");
                for line in contact_card(&contact) {
                    self.console.say(&line);
                }
                self.console.say("");
            }
        }
        Ok(())
    }

    fn update(&mut self) -> Result<()> {
        let Some(name) = self.ask_name("Enter name to update: ", "Name cannot be empty.")? else {
            return Ok(());
        };

        let console = &mut self.console;
        let change = self.book.update(&name, |contact| {
            console.say("\nEnter new details (leave blank to keep existing):");
            let phone = console.ask(&format!("New Phone ({}): ", contact.phone))?;
            let email = console.ask(&format!("New Email ({}): ", contact.email))?;
            Ok(ContactEdit::new(phone, email))
        })?;

        match change {
            Change::MissingStore => self.console.say("No contacts found, add some first."),
            Change::NotFound => self.console.say("\nContact not found.\n"),
            Change::Changed(1) => self
                .console
                .say(&format!("\nContact '{}' updated successfully.\n", name)),
            Change::Changed(count) => self.console.say(&format!(
                "\n{} contacts named '{}' updated successfully.\n",
                count, name
            )),
        }
        Ok(())
    }

    fn delete(&mut self) -> Result<()> {
        let Some(name) = self.ask_name("Enter name to delete: ", "Name cannot be empty.")? else {
            return Ok(());
        };

        match self.book.delete(&name)? {
            Change::MissingStore => self.console.say("No contacts found, add some first."),
            Change::NotFound => self
                .console
                .say("\nContact not found, nothing deleted.\n"),
            Change::Changed(1) => self
                .console
                .say(&format!("\nContact '{}' deleted successfully.\n", name)),
            Change::Changed(count) => self.console.say(&format!(
                "\n{} contacts named '{}' deleted successfully.\n",
                count, name
            )),
        }
        Ok(())
    }

    fn export(&mut self) -> Result<()> {
        match self.book.export()? {
            None => self.console.say("No contacts to export."),
            Some(_) => self.console.say(&format!(
                "\nContacts exported to {}\n",
                self.book.interchange().path().display()
            )),
        }
        Ok(())
    }

    fn import(&mut self) -> Result<()> {
        let Some(batch) = self.book.preview_import()? else {
            self.console.say("No JSON file found.");
            return Ok(());
        };

        if batch.is_empty() {
            self.console.say("No valid contacts found in JSON.");
            return Ok(());
        }

        self.console
            .say(&format!("Found {} contact(s) in JSON.", batch.contacts.len()));
        if batch.dropped > 0 {
            self.console
                .say(&format!("Skipping {} invalid entr(y/ies).", batch.dropped));
        }

        if self
            .console
            .confirm("Replace CSV with JSON contacts? (y/N): ")?
        {
            self.book.replace(&batch.contacts)?;
            self.console.say("CSV replaced with JSON contacts.");
        } else {
            self.console.say("Import cancelled (no changes made).");
        }
        Ok(())
    }

    /// Asks for a name, printing `empty_message` and returning `None` if blank
    fn ask_name(&mut self, prompt: &str, empty_message: &str) -> Result<Option<String>> {
        let name = self.console.ask(prompt)?;
        if name.is_empty() {
            self.console.say(empty_message);
            return Ok(None);
        }
        Ok(Some(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::console::ScriptedConsole;
    use crate::cli::output::OutputFormat;
    use crate::storage::Config;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
        book: ContactBook,
        log: ErrorLog,
        output: Output,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let config = Config::in_dir(dir.path());
            Self {
                book: ContactBook::new(&config),
                log: ErrorLog::new(&config.error_log),
                output: Output::new(OutputFormat::Text, false),
                dir,
            }
        }

        /// Runs a whole session and returns its transcript
        fn session(&self, input: &[&str]) -> String {
            let mut shell = Shell::new(
                &self.book,
                &self.log,
                &self.output,
                ScriptedConsole::new(input.iter().copied()),
            );
            shell.run().unwrap();
            shell.console().transcript().to_string()
        }

        fn names(&self) -> Vec<String> {
            self.book
                .store()
                .read_all()
                .unwrap()
                .into_iter()
                .map(|c| c.name)
                .collect()
        }
    }

    #[test]
    fn parse_menu_choices() {
        assert_eq!(MenuChoice::parse("1"), Some(MenuChoice::Run(Operation::Add)));
        assert_eq!(MenuChoice::parse(" 7 "), Some(MenuChoice::Run(Operation::Import)));
        assert_eq!(MenuChoice::parse("8"), Some(MenuChoice::Exit));
        assert_eq!(MenuChoice::parse("9"), None);
        assert_eq!(MenuChoice::parse("add"), None);
    }

    #[test]
    fn add_then_list_shows_one_row() {
        let fx = Fixture::new();

        let out = fx.session(&["1", "Alice", "123", "a@x.com", "2", "8"]);

        assert!(out.contains("Contact: 'Alice' added successfully."));
        assert!(out.contains("===== CONTACT LIST ====="));
        assert!(out.contains(&format!("{:<20}{:<15}a@x.com", "Alice", "123")));
        assert_eq!(fx.names(), vec!["Alice"]);
    }

    #[test]
    fn list_distinguishes_missing_and_empty_store() {
        let fx = Fixture::new();

        let out = fx.session(&["2", "8"]);
        assert!(out.contains("No contact file found"));

        fs::write(&fx.book.store().path(), "name,phone,email\n").unwrap();
        let out = fx.session(&["2", "8"]);
        assert!(out.contains("No contacts found, add some contacts first."));
    }

    #[test]
    fn empty_name_is_rejected() {
        let fx = Fixture::new();

        let out = fx.session(&["1", "   ", "8"]);

        assert!(out.contains("Name cannot be empty."));
        assert!(!fx.book.store().exists());
    }

    #[test]
    fn declined_duplicate_is_not_added() {
        let fx = Fixture::new();

        let out = fx.session(&["1", "Alice", "1", "", "1", "ALICE", "2", "", "n", "8"]);

        assert!(out.contains("A contact named 'ALICE' already exists."));
        assert!(out.contains("Add cancelled."));
        assert_eq!(fx.names(), vec!["Alice"]);
    }

    #[test]
    fn search_ignores_case() {
        let fx = Fixture::new();

        let out = fx.session(&["1", "Bob", "42", "", "3", "BOB", "3", "bob", "3", "Rob", "8"]);

        assert_eq!(out.matches("Contact Found:").count(), 2);
        assert_eq!(out.matches("Phone: 42").count(), 2);
        assert!(out.contains("Contact not found, try a different name."));
    }

    #[test]
    fn update_prompts_for_each_duplicate() {
        let fx = Fixture::new();
        fx.session(&["1", "Carol", "1", "c@y.com", "1", "carol", "2", "", "y", "8"]);

        let out = fx.session(&["4", "CAROL", "111", "", "222", "new@y.com", "8"]);

        assert_eq!(out.matches("Enter new details").count(), 2);
        assert!(out.contains("New Phone (1): 111"));
        assert!(out.contains("2 contacts named 'CAROL' updated successfully."));

        let stored = fx.book.store().read_all().unwrap().into_vec();
        assert_eq!(stored[0], Contact::new("Carol", "111", "c@y.com").unwrap());
        assert_eq!(stored[1], Contact::new("carol", "222", "new@y.com").unwrap());
    }

    #[test]
    fn update_unknown_name_leaves_file_untouched() {
        let fx = Fixture::new();
        fx.session(&["1", "Alice", "123", "a@x.com", "8"]);
        let before = fs::read(fx.book.store().path()).unwrap();

        let out = fx.session(&["4", "Nobody", "8"]);

        assert!(out.contains("Contact not found."));
        assert_eq!(fs::read(fx.book.store().path()).unwrap(), before);
    }

    #[test]
    fn add_duplicate_then_delete_removes_both() {
        let fx = Fixture::new();

        let out = fx.session(&[
            "1", "Carol", "555", "c@y.com", "1", "carol", "000", "", "y", "5", "Carol", "2", "8",
        ]);

        assert!(out.contains("2 contacts named 'Carol' deleted successfully."));
        assert!(out.contains("No contacts found, add some contacts first."));
        assert!(fx.names().is_empty());
    }

    #[test]
    fn export_import_round_trip() {
        let fx = Fixture::new();
        fx.session(&["1", "Zed", "1", "z@x.com", "1", "Amy", "2", "", "6", "8"]);
        let exported = fx.book.store().read_all().unwrap();

        let out = fx.session(&["5", "Zed", "7", "y", "8"]);

        assert!(out.contains("Found 2 contact(s) in JSON."));
        assert!(out.contains("CSV replaced with JSON contacts."));
        assert_eq!(fx.book.store().read_all().unwrap(), exported);
    }

    #[test]
    fn import_requires_confirmation() {
        let fx = Fixture::new();
        fx.session(&["1", "Zed", "1", "", "6", "5", "Zed", "8"]);

        let out = fx.session(&["7", "", "8"]);

        assert!(out.contains("Import cancelled (no changes made)."));
        assert!(fx.names().is_empty());
    }

    #[test]
    fn import_without_valid_entries_aborts() {
        let fx = Fixture::new();
        fx.session(&["1", "Alice", "1", "", "8"]);
        fs::write(fx.book.interchange().path(), r#"[{"phone": "1"}, 3]"#).unwrap();

        let out = fx.session(&["7", "8"]);

        assert!(out.contains("No valid contacts found in JSON."));
        assert_eq!(fx.names(), vec!["Alice"]);
    }

    #[test]
    fn failures_are_reported_and_logged() {
        let fx = Fixture::new();
        fs::write(fx.book.interchange().path(), "not json").unwrap();

        let out = fx.session(&["7", "2", "8"]);

        assert!(out.contains("Error importing from JSON. See error log."));
        // The session carries on after the failure
        assert!(out.contains("No contact file found"));
        assert!(out.ends_with("Exiting Contact Book, Goodbye!\n"));

        let log = fs::read_to_string(fx.dir.path().join("error_log.txt")).unwrap();
        assert_eq!(log.lines().count(), 1);
        assert!(log.contains("Operation: Import from JSON | Error: Failed to parse interchange file"));
    }

    #[test]
    fn invalid_choice_reprompts() {
        let fx = Fixture::new();

        let out = fx.session(&["9", "abc", "8"]);

        assert_eq!(out.matches("Your choice doesn't exist").count(), 2);
        assert_eq!(out.matches("Enter your choice: ").count(), 3);
    }

    #[test]
    fn end_of_input_exits() {
        let fx = Fixture::new();

        let out = fx.session(&["2"]);

        assert!(out.ends_with("Exiting Contact Book, Goodbye!\n"));
    }
}
