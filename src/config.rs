use crate::error::{Error, Result};
use crate::mailbox::Recipient;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Longest line allowed in a message body (RFC 2045 §6.7, §6.8)
pub const MAX_LINE_LENGTH: usize = 76;

/// Body transfer encoding
///
/// **NOTE**: With feature "serde" it is (de)serialized by its header name (_quoted-printable_, _8bit_, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "String", into = "String")
)]
pub enum TransferEncoding {
    SevenBit,
    #[default]
    EightBit,
    QuotedPrintable,
    Base64,
}

impl TransferEncoding {
    pub fn as_str(&self) -> &'static str {
        use self::TransferEncoding::*;
        match *self {
            SevenBit => "7bit",
            EightBit => "8bit",
            QuotedPrintable => "quoted-printable",
            Base64 => "base64",
        }
    }
}

impl Display for TransferEncoding {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransferEncoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        use self::TransferEncoding::*;
        match s.trim().to_ascii_lowercase().as_str() {
            "7bit" => Ok(SevenBit),
            "8bit" => Ok(EightBit),
            "quoted-printable" => Ok(QuotedPrintable),
            "base64" => Ok(Base64),
            _ => Err(Error::UnsupportedEncoding(s.into())),
        }
    }
}

impl TryFrom<String> for TransferEncoding {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<TransferEncoding> for String {
    fn from(encoding: TransferEncoding) -> Self {
        encoding.as_str().into()
    }
}

/// Line separator used for headers and bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "String", into = "String")
)]
pub enum Newline {
    #[default]
    Crlf,
    Lf,
}

impl Newline {
    pub fn as_str(&self) -> &'static str {
        match *self {
            Newline::Crlf => "\r\n",
            Newline::Lf => "\n",
        }
    }
}

impl Display for Newline {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for Newline {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "\r\n" => Ok(Newline::Crlf),
            "\n" => Ok(Newline::Lf),
            _ if s.eq_ignore_ascii_case("crlf") => Ok(Newline::Crlf),
            _ if s.eq_ignore_ascii_case("lf") => Ok(Newline::Lf),
            _ => Err(Error::InvalidNewline(s.into())),
        }
    }
}

impl TryFrom<String> for Newline {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Newline> for String {
    fn from(newline: Newline) -> Self {
        newline.as_str().into()
    }
}

/// Value of the `X-Priority:` header
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "u8", into = "u8")
)]
pub enum Priority {
    Highest = 1,
    High = 2,
    #[default]
    Normal = 3,
    Low = 4,
    Lowest = 5,
}

impl TryFrom<u8> for Priority {
    type Error = Error;

    fn try_from(level: u8) -> Result<Self> {
        use self::Priority::*;
        Ok(match level {
            1 => Highest,
            2 => High,
            3 => Normal,
            4 => Low,
            5 => Lowest,
            _ => return Err(Error::InvalidPriority(level)),
        })
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> Self {
        priority as u8
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        use self::Priority::*;
        let label = match *self {
            Highest => "Highest",
            High => "High",
            Normal => "Normal",
            Low => "Low",
            Lowest => "Lowest",
        };
        write!(f, "{} ({})", *self as u8, label)
    }
}

/// Composition settings
///
/// Loading these from a file is left to the application. With the "serde"
/// feature any missing key falls back to [`Config::default`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct Config {
    /// Send the body as `text/html`
    pub is_html: bool,

    /// Derive the alternative plain body from the HTML body
    pub generate_alt: bool,

    /// Attach local images referenced from the HTML body inline
    pub auto_attach: bool,

    pub charset: String,

    pub encoding: TransferEncoding,

    /// Word wrap width, `0` disables wrapping. Values above 76 are capped.
    pub wordwrap: usize,

    pub newline: Newline,

    pub priority: Priority,

    pub user_agent: String,

    /// Check recipient address syntax before sending
    pub validate: bool,

    /// Default sender
    pub from: Option<Recipient>,
}

impl Config {
    /// Effective wrap width, `None` when wrapping is disabled
    pub fn wrap_width(&self) -> Option<usize> {
        match self.wordwrap {
            0 => None,
            width => Some(width.min(MAX_LINE_LENGTH)),
        }
    }

    /// Line width for base64 attachment content
    pub fn chunk_width(&self) -> usize {
        self.wrap_width().unwrap_or(MAX_LINE_LENGTH)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            is_html: false,
            generate_alt: true,
            auto_attach: true,
            charset: "utf-8".into(),
            encoding: TransferEncoding::default(),
            wordwrap: MAX_LINE_LENGTH,
            newline: Newline::default(),
            priority: Priority::default(),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).into(),
            validate: true,
            from: None,
        }
    }
}
