//! Typed headers and the ordered header block.

mod content;
mod mailbox;
mod special;
mod textual;

pub use self::content::*;
pub use self::mailbox::*;
pub use self::special::*;
pub use self::textual::*;

use crate::config::Newline;
use std::fmt::{Display, Formatter, Result as FmtResult, Write};

/// Typed header, its `Display` renders the header value
pub trait Header: Display {
    fn header_name() -> &'static str;
}

/// Ordered list of headers
///
/// Headers keep the order they were first set in. Setting a header again
/// replaces the value in place, setting an empty value is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    #[inline]
    pub fn new() -> Self {
        Headers::default()
    }

    /// Set a typed header
    #[inline]
    pub fn set<H: Header>(&mut self, header: H) {
        self.set_raw(H::header_name(), header.to_string());
    }

    /// Set a typed header and move the headers
    ///
    /// Useful for the "builder-style" pattern.
    #[inline]
    pub fn with<H: Header>(mut self, header: H) -> Self {
        self.set(header);
        self
    }

    /// Set a header by name
    pub fn set_raw<N: Into<String>, V: Into<String>>(&mut self, name: N, value: V) {
        let value = value.into();
        if value.trim().is_empty() {
            return;
        }

        let name = name.into();
        match self.entries.iter_mut().find(|(known, _)| known.eq_ignore_ascii_case(&name)) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Header value by name, case-insensitive
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn remove(&mut self, name: &str) {
        self.entries.retain(|(known, _)| !known.eq_ignore_ascii_case(name));
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Write every header line followed by `newline`
    pub fn write_to<W: Write>(&self, w: &mut W, newline: Newline) -> FmtResult {
        for (name, value) in &self.entries {
            w.write_str(name)?;
            w.write_str(": ")?;
            w.write_str(value)?;
            w.write_str(newline.as_str())?;
        }
        Ok(())
    }

    /// Header block without the terminating blank line
    pub fn render(&self, newline: Newline) -> String {
        let mut out = String::new();
        // writing into a String never fails
        let _ = self.write_to(&mut out, newline);
        out
    }
}

impl Display for Headers {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        self.write_to(f, Newline::Crlf)
    }
}
