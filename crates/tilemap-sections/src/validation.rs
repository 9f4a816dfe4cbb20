//! Append-only validation collector.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A single finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationMessage {
    pub severity: Severity,
    pub message: String,
}

impl ValidationMessage {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Findings for one section, in the order they were recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationList {
    messages: Vec<ValidationMessage>,
}

impl ValidationList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<ValidationMessage>) {
        self.messages.push(message.into());
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(ValidationMessage::warning(message));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(ValidationMessage::error(message));
    }

    /// Append every message of another list.
    pub fn extend(&mut self, other: ValidationList) {
        self.messages.extend(other.messages);
    }

    pub fn messages(&self) -> &[ValidationMessage] {
        &self.messages
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationMessage> {
        self.messages.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// True if any message has error severity.
    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(ValidationMessage::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.messages.iter().filter(|m| m.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.severity == Severity::Warning)
            .count()
    }
}

/// Findings of one section, keyed by a human-readable section identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationEntry {
    pub section: String,
    pub messages: ValidationList,
}

/// Findings for a whole file, one entry per section in visit order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationMap {
    entries: Vec<ValidationEntry>,
}

impl ValidationMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// The list for a section, created empty on first use.
    pub fn section(&mut self, identity: &str) -> &mut ValidationList {
        let index = match self.entries.iter().position(|e| e.section == identity) {
            Some(index) => index,
            None => {
                self.entries.push(ValidationEntry {
                    section: identity.to_string(),
                    messages: ValidationList::new(),
                });
                self.entries.len() - 1
            }
        };
        &mut self.entries[index].messages
    }

    /// Append a finished list to a section's entry.
    pub fn record(&mut self, identity: &str, list: ValidationList) {
        self.section(identity).extend(list);
    }

    pub fn get(&self, identity: &str) -> Option<&ValidationList> {
        self.entries
            .iter()
            .find(|e| e.section == identity)
            .map(|e| &e.messages)
    }

    pub fn entries(&self) -> &[ValidationEntry] {
        &self.entries
    }

    /// Entries that hold at least one message.
    pub fn non_empty(&self) -> impl Iterator<Item = &ValidationEntry> {
        self.entries.iter().filter(|e| !e.messages.is_empty())
    }

    /// True if no section has any message.
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|e| e.messages.is_empty())
    }

    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|e| e.messages.has_errors())
    }

    pub fn error_count(&self) -> usize {
        self.entries.iter().map(|e| e.messages.error_count()).sum()
    }

    /// Render the non-empty entries for a terminal.
    pub fn to_human(&self) -> String {
        let mut out = String::new();
        for entry in self.non_empty() {
            out.push_str(&format!("{}:\n", entry.section));
            for message in entry.messages.iter() {
                out.push_str(&format!("  - {}\n", message));
            }
        }
        out
    }
}
