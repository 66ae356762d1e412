//! Output formatting for CLI commands

use serde::Serialize;

use crate::domain::{Contact, ContactList};

const NAME_WIDTH: usize = 20;
const PHONE_WIDTH: usize = 15;
const RULE_WIDTH: usize = 50;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Output helper for consistent formatting
pub struct Output {
    format: OutputFormat,
    verbose: bool,
}

impl Output {
    pub fn new(format: OutputFormat, verbose: bool) -> Self {
        Self { format, verbose }
    }

    /// Prints a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Text => println!("{}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "success": true,
                        "message": message
                    })
                );
            }
        }
    }

    /// Prints structured data
    pub fn data<T: Serialize>(&self, data: &T) {
        match self.format {
            OutputFormat::Text => {
                if let Ok(json) = serde_json::to_string_pretty(data) {
                    println!("{}", json);
                }
            }
            OutputFormat::Json => {
                if let Ok(json) = serde_json::to_string(data) {
                    println!("{}", json);
                }
            }
        }
    }

    /// Returns true if using JSON format
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Prints a verbose debug message with context (only when --verbose is set)
    pub fn verbose_ctx(&self, context: &str, message: &str) {
        if self.verbose {
            eprintln!("[verbose:{}] {}", context, message);
        }
    }
}

/// Renders contacts as a fixed-width table with header and rule lines
pub fn contact_table(contacts: &ContactList) -> Vec<String> {
    let rule = "-".repeat(RULE_WIDTH);
    let mut lines = Vec::with_capacity(contacts.len() + 3);

    lines.push(format!(
        "{:<name$}{:<phone$}{}",
        "Name",
        "Phone",
        "Email",
        name = NAME_WIDTH,
        phone = PHONE_WIDTH
    ));
    lines.push(rule.clone());
    for c in contacts {
        lines.push(format!(
            "{:<name$}{:<phone$}{}",
            c.name,
            c.phone,
            c.email,
            name = NAME_WIDTH,
            phone = PHONE_WIDTH
        ));
    }
    lines.push(rule);

    lines
}

/// Renders a single contact as labelled lines
pub fn contact_card(contact: &Contact) -> Vec<String> {
    vec![
        format!("Name: {}", contact.name),
        format!("Phone: {}", contact.phone),
        format!("Email: {}", contact.email),
    ]
}
