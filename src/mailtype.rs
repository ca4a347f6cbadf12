use crate::error::{Error, Result};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Layout of a message
///
/// Computed from the body kind and the kinds of attachments, it selects the
/// multipart nesting of the message body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MailType {
    Plain,
    PlainAttach,
    Html,
    HtmlAlt,
    HtmlInline,
    HtmlAttach,
    HtmlAltInline,
    HtmlAltAttach,
    HtmlInlineAttach,
    HtmlAltInlineAttach,
}

impl MailType {
    pub const ALL: [MailType; 10] = [
        MailType::Plain,
        MailType::PlainAttach,
        MailType::Html,
        MailType::HtmlAlt,
        MailType::HtmlInline,
        MailType::HtmlAttach,
        MailType::HtmlAltInline,
        MailType::HtmlAltAttach,
        MailType::HtmlInlineAttach,
        MailType::HtmlAltInlineAttach,
    ];

    /// Classify a message
    ///
    /// The alternative body and inline parts only count for html messages.
    pub fn classify(is_html: bool, has_alt: bool, has_inline: bool, has_attach: bool) -> Self {
        use self::MailType::*;
        match (is_html, is_html && has_alt, is_html && has_inline, has_attach) {
            (false, _, _, false) => Plain,
            (false, _, _, true) => PlainAttach,
            (true, false, false, false) => Html,
            (true, true, false, false) => HtmlAlt,
            (true, false, true, false) => HtmlInline,
            (true, false, false, true) => HtmlAttach,
            (true, true, true, false) => HtmlAltInline,
            (true, true, false, true) => HtmlAltAttach,
            (true, false, true, true) => HtmlInlineAttach,
            (true, true, true, true) => HtmlAltInlineAttach,
        }
    }

    pub fn is_html(&self) -> bool {
        !matches!(self, MailType::Plain | MailType::PlainAttach)
    }

    pub fn has_alt(&self) -> bool {
        matches!(
            self,
            MailType::HtmlAlt
                | MailType::HtmlAltInline
                | MailType::HtmlAltAttach
                | MailType::HtmlAltInlineAttach
        )
    }

    pub fn has_inline(&self) -> bool {
        matches!(
            self,
            MailType::HtmlInline
                | MailType::HtmlAltInline
                | MailType::HtmlInlineAttach
                | MailType::HtmlAltInlineAttach
        )
    }

    pub fn has_attach(&self) -> bool {
        matches!(
            self,
            MailType::PlainAttach
                | MailType::HtmlAttach
                | MailType::HtmlAltAttach
                | MailType::HtmlInlineAttach
                | MailType::HtmlAltInlineAttach
        )
    }

    /// Whether the body is a single text part
    pub fn is_multipart(&self) -> bool {
        !matches!(self, MailType::Plain | MailType::Html)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MailType::Plain => "plain",
            MailType::PlainAttach => "plain_attach",
            MailType::Html => "html",
            MailType::HtmlAlt => "html_alt",
            MailType::HtmlInline => "html_inline",
            MailType::HtmlAttach => "html_attach",
            MailType::HtmlAltInline => "html_alt_inline",
            MailType::HtmlAltAttach => "html_alt_attach",
            MailType::HtmlInlineAttach => "html_inline_attach",
            MailType::HtmlAltInlineAttach => "html_alt_inline_attach",
        }
    }
}

impl Display for MailType {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for MailType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        MailType::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::InvalidContentType(s.into()))
    }
}
