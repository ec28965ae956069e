//! Types for standardized reports to the user about sequence queries.
//!
//! Commands return their value alongside a [`Report`] of things the user should know
//! about but that are not errors, e.g. a region that returned no sequence.
//!

/// The [`CommandOutput<U>`] type output is generic over some data output
/// from a command, and a [`Report`] that reports information to the user.
pub struct CommandOutput<U> {
    pub value: U,
    pub report: Report,
}

impl<U> CommandOutput<U> {
    pub fn new(value: U, report: Report) -> Self {
        Self { value, report }
    }
}

/// A type to (semi) standardize reporting to the user.
#[derive(Debug, Default)]
pub struct Report {
    entries: Vec<String>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_issue(&mut self, message: String) {
        self.entries.push(message)
    }

    pub fn issues(&self) -> &[String] {
        &self.entries
    }
}
