use super::Header;
use crate::config::Priority;
use crate::error::Result;
use crate::mailbox::Recipient;
use std::fmt::{Display, Formatter, Result as FmtResult};
use textnonce::TextNonce;
use time::format_description::well_known::Rfc2822;
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq)]
pub struct MimeVersion {
    pub major: u8,
    pub minor: u8,
}

pub const MIME_VERSION_1_0: MimeVersion = MimeVersion { major: 1, minor: 0 };

impl Default for MimeVersion {
    fn default() -> Self {
        MIME_VERSION_1_0
    }
}

impl Header for MimeVersion {
    fn header_name() -> &'static str {
        "MIME-Version"
    }
}

impl Display for MimeVersion {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// `Date:` header in RFC 2822 format
#[derive(Debug, Clone, PartialEq)]
pub struct Date(String);

impl Date {
    pub fn new(time: OffsetDateTime) -> Result<Self> {
        Ok(Date(time.format(&Rfc2822)?))
    }

    pub fn now() -> Result<Self> {
        Self::new(OffsetDateTime::now_utc())
    }
}

impl Header for Date {
    fn header_name() -> &'static str {
        "Date"
    }
}

impl Display for Date {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// `Message-ID:` header
#[derive(Debug, Clone, PartialEq)]
pub struct MessageId(pub String);

impl MessageId {
    /// Unique id in the domain of the sender, `<token@domain>`
    pub fn generate(from: &Recipient) -> Self {
        let token = TextNonce::sized_urlsafe(32)
            .map(TextNonce::into_string)
            .unwrap_or_else(|_| TextNonce::new().into_string());
        MessageId(format!("<{}{}>", token, from.domain_part()))
    }
}

impl Header for MessageId {
    fn header_name() -> &'static str {
        "Message-ID"
    }
}

impl Display for MessageId {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// `X-Priority:` header
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XPriority(pub Priority);

impl Header for XPriority {
    fn header_name() -> &'static str {
        "X-Priority"
    }
}

impl Display for XPriority {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        self.0.fmt(f)
    }
}
