//! MIME part tree and the body layout of each mail type.

use crate::attachment::Attachment;
use crate::boundary::BoundarySet;
use crate::config::{Newline, TransferEncoding};
use crate::header::{
    ContentDisposition, ContentId, ContentTransferEncoding, ContentType, Header, Headers,
};
use crate::mailtype::MailType;
use std::fmt::{Display, Formatter, Result as FmtResult, Write};

/// MIME part variants
///
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    /// Single part with content
    ///
    Single(SinglePart),

    /// Multiple parts of content
    ///
    Multi(MultiPart),
}

impl Part {
    fn write_to<W: Write>(&self, w: &mut W, newline: Newline) -> FmtResult {
        match self {
            Part::Single(part) => part.write_to(w, newline),
            Part::Multi(part) => part.write_nested(w, newline),
        }
    }
}

/// Creates builder for single part
///
pub struct SinglePartBuilder {
    headers: Headers,
}

impl SinglePartBuilder {
    /// Creates a default SinglePartBuilder
    pub fn new() -> Self {
        Self {
            headers: Headers::new(),
        }
    }

    /// Set a header and move the Part
    ///
    #[inline]
    pub fn header<H: Header>(mut self, header: H) -> Self {
        self.headers.set(header);
        self
    }

    /// Set the body and move the Part
    ///
    /// The body must already be transfer encoded.
    #[inline]
    pub fn body<T: Into<String>>(self, body: T) -> SinglePart {
        SinglePart {
            headers: self.headers,
            body: body.into(),
        }
    }
}

impl Default for SinglePartBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Single part
///
#[derive(Debug, Clone, PartialEq)]
pub struct SinglePart {
    headers: Headers,
    body: String,
}

impl SinglePart {
    /// Creates a default SinglePartBuilder
    pub fn builder() -> SinglePartBuilder {
        SinglePartBuilder::new()
    }

    /// Text part with an encoded body
    pub fn text(subtype: &str, charset: &str, encoding: TransferEncoding, body: &str) -> Self {
        Self::builder()
            .header(ContentType::text(subtype, charset))
            .header(ContentTransferEncoding(encoding))
            .body(body)
    }

    /// Base64 part of an inline resource or a file attachment
    pub fn attachment(attachment: &Attachment) -> Self {
        let mut builder = Self::builder()
            .header(ContentType::attachment(attachment.mime(), attachment.filename()))
            .header(ContentTransferEncoding(TransferEncoding::Base64));
        if attachment.content_id().is_some() {
            builder = builder.header(ContentId(attachment.id().into()));
        }
        builder
            .header(ContentDisposition {
                disposition: attachment.disposition(),
                filename: attachment.filename().into(),
            })
            .body(attachment.encoded())
    }

    /// Get the headers from the Part
    #[inline]
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Read the body
    #[inline]
    pub fn body_ref(&self) -> &str {
        &self.body
    }

    fn write_to<W: Write>(&self, w: &mut W, newline: Newline) -> FmtResult {
        let nl = newline.as_str();
        self.headers.write_to(w, newline)?;
        w.write_str(nl)?;
        w.write_str(&self.body)?;
        w.write_str(nl)?;
        w.write_str(nl)
    }
}

impl Display for SinglePart {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        self.write_to(f, Newline::Crlf)
    }
}

/// The kind of multipart
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiPartKind {
    /// Mixed kind to combine unrelated content parts
    ///
    /// For example this kind can be used to mix email message and attachments.
    Mixed,

    /// Alternative kind to join several variants of same email contents.
    ///
    /// That kind is recommended to use for joining plain (text) and rich (HTML) messages into single email message.
    Alternative,

    /// Related kind to mix content and related resources.
    ///
    /// For example, you can include images into HTML content using that.
    Related,
}

impl Display for MultiPartKind {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        use self::MultiPartKind::*;
        f.write_str(match *self {
            Mixed => "mixed",
            Alternative => "alternative",
            Related => "related",
        })
    }
}

/// Multipart variant with parts
///
#[derive(Debug, Clone, PartialEq)]
pub struct MultiPart {
    kind: MultiPartKind,
    boundary: String,
    parts: Vec<Part>,
}

impl MultiPart {
    /// Creates MultiPart of specified kind
    #[inline]
    pub fn new<S: Into<String>>(kind: MultiPartKind, boundary: S) -> Self {
        MultiPart {
            kind,
            boundary: boundary.into(),
            parts: Vec::new(),
        }
    }

    /// Creates MultiPart mixed
    #[inline]
    pub fn mixed<S: Into<String>>(boundary: S) -> Self {
        MultiPart::new(MultiPartKind::Mixed, boundary)
    }

    /// Creates MultiPart alternative
    #[inline]
    pub fn alternative<S: Into<String>>(boundary: S) -> Self {
        MultiPart::new(MultiPartKind::Alternative, boundary)
    }

    /// Creates MultiPart related
    #[inline]
    pub fn related<S: Into<String>>(boundary: S) -> Self {
        MultiPart::new(MultiPartKind::Related, boundary)
    }

    /// Add a single sub-part and move the MultiPart
    #[inline]
    pub fn singlepart(mut self, part: SinglePart) -> Self {
        self.parts.push(Part::Single(part));
        self
    }

    /// Add a multi sub-part and move the MultiPart
    #[inline]
    pub fn multipart(mut self, part: MultiPart) -> Self {
        self.parts.push(Part::Multi(part));
        self
    }

    /// Add attachment parts and move the MultiPart
    pub fn attachments(mut self, attachments: &[Attachment]) -> Self {
        self.parts
            .extend(attachments.iter().map(|a| Part::Single(SinglePart::attachment(a))));
        self
    }

    #[inline]
    pub fn kind(&self) -> MultiPartKind {
        self.kind
    }

    /// Get the boundary of MultiPart contents
    #[inline]
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Get the sub-parts from the MultiPart.
    #[inline]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// `Content-Type:` of this section
    pub fn content_type(&self) -> ContentType {
        ContentType::multipart(self.kind, &self.boundary)
    }

    fn write_parts<W: Write>(&self, w: &mut W, newline: Newline) -> FmtResult {
        for part in &self.parts {
            w.write_str("--")?;
            w.write_str(&self.boundary)?;
            w.write_str(newline.as_str())?;
            part.write_to(w, newline)?;
        }
        w.write_str("--")?;
        w.write_str(&self.boundary)?;
        w.write_str("--")
    }

    /// Section nested into another one, with its own `Content-Type`
    fn write_nested<W: Write>(&self, w: &mut W, newline: Newline) -> FmtResult {
        let nl = newline.as_str();
        Headers::new().with(self.content_type()).write_to(w, newline)?;
        w.write_str(nl)?;
        self.write_parts(w, newline)?;
        w.write_str(nl)?;
        w.write_str(nl)
    }

    /// Body of a top level section, its `Content-Type` goes to the message headers
    pub fn write_to<W: Write>(&self, w: &mut W, newline: Newline) -> FmtResult {
        self.write_parts(w, newline)
    }
}

impl Display for MultiPart {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        self.write_to(f, Newline::Crlf)
    }
}

/// Encoded contents of a message body
#[derive(Debug, Clone, Copy)]
pub struct BodyContent<'a> {
    /// Transfer encoded and wrapped body
    pub body: &'a str,
    /// Transfer encoded and wrapped alternative body
    pub alt_body: &'a str,
    pub charset: &'a str,
    pub encoding: TransferEncoding,
    pub inline: &'a [Attachment],
    pub attachments: &'a [Attachment],
}

/// Top level body of a message
#[derive(Debug, Clone, PartialEq)]
pub enum MessageBody {
    /// Text only message
    Single {
        content_type: ContentType,
        encoding: TransferEncoding,
        body: String,
    },
    /// Multipart message
    Multi(MultiPart),
}

impl MessageBody {
    /// Arrange the contents the way the mail type requires
    ///
    /// `B1` is the outermost boundary, `B2` and `B3` separate nested
    /// alternative and related sections.
    pub fn layout(kind: MailType, boundaries: &BoundarySet, content: &BodyContent) -> Self {
        use self::MailType::*;

        let subtype = if kind.is_html() { "html" } else { "plain" };
        let text = || SinglePart::text(subtype, content.charset, content.encoding, content.body);
        let alt = || SinglePart::text("plain", content.charset, content.encoding, content.alt_body);

        let (outer, inner, innermost) =
            (boundaries.outer(), boundaries.inner(), boundaries.innermost());

        let multi = match kind {
            Plain | Html => {
                return MessageBody::Single {
                    content_type: ContentType::text(subtype, content.charset),
                    encoding: content.encoding,
                    body: content.body.into(),
                }
            }
            PlainAttach | HtmlAttach => MultiPart::related(outer)
                .singlepart(text())
                .attachments(content.attachments),
            HtmlAlt => MultiPart::alternative(outer).singlepart(alt()).singlepart(text()),
            HtmlInline => MultiPart::alternative(outer)
                .singlepart(text())
                .attachments(content.inline),
            HtmlAltInline => MultiPart::alternative(outer).singlepart(alt()).multipart(
                MultiPart::related(inner)
                    .singlepart(text())
                    .attachments(content.inline),
            ),
            HtmlAltAttach | HtmlInlineAttach => {
                let mut alternative = MultiPart::alternative(inner);
                if kind.has_alt() {
                    alternative = alternative.singlepart(alt());
                }
                alternative = alternative.singlepart(text());
                if kind.has_inline() {
                    alternative = alternative.attachments(content.inline);
                }
                MultiPart::mixed(outer)
                    .multipart(alternative)
                    .attachments(content.attachments)
            }
            HtmlAltInlineAttach => MultiPart::mixed(outer)
                .multipart(
                    MultiPart::alternative(inner).singlepart(alt()).multipart(
                        MultiPart::related(innermost)
                            .singlepart(text())
                            .attachments(content.inline),
                    ),
                )
                .attachments(content.attachments),
        };

        MessageBody::Multi(multi)
    }

    /// `Content-Type:` of the message
    pub fn content_type(&self) -> ContentType {
        match self {
            MessageBody::Single { content_type, .. } => content_type.clone(),
            MessageBody::Multi(part) => part.content_type(),
        }
    }

    /// Message level `Content-Transfer-Encoding:`, single part messages only
    pub fn transfer_encoding(&self) -> Option<ContentTransferEncoding> {
        match self {
            MessageBody::Single { encoding, .. } => Some(ContentTransferEncoding(*encoding)),
            MessageBody::Multi(_) => None,
        }
    }

    /// Body block as sent
    pub fn render(&self, newline: Newline) -> String {
        match self {
            MessageBody::Single { body, .. } => body.clone(),
            MessageBody::Multi(part) => {
                let mut out = String::new();
                // writing into a String never fails
                let _ = part.write_to(&mut out, newline);
                out
            }
        }
    }
}
