use super::Header;
use crate::attachment::Disposition;
use crate::config::TransferEncoding;
use crate::mimebody::MultiPartKind;
use crate::utf8_b;
use mime::Mime;
use std::fmt::{Display, Formatter, Result as FmtResult};

fn quote(value: &str) -> String {
    format!("\"{}\"", utf8_b::encode(value).replace('\\', "\\\\").replace('"', "\\\""))
}

/// `Content-Type:` header
#[derive(Debug, Clone, PartialEq)]
pub struct ContentType(pub String);

impl ContentType {
    /// Text part, `text/<subtype>; charset="<charset>"`
    pub fn text(subtype: &str, charset: &str) -> Self {
        ContentType(format!("text/{}; charset={}", subtype, quote(charset)))
    }

    /// Multipart section, `multipart/<kind>; boundary="<boundary>"`
    pub fn multipart(kind: MultiPartKind, boundary: &str) -> Self {
        ContentType(format!("multipart/{}; boundary={}", kind, quote(boundary)))
    }

    /// Attachment part, `<mime>; name="<filename>"`
    pub fn attachment(mime: &Mime, filename: &str) -> Self {
        ContentType(format!("{}; name={}", mime.essence_str(), quote(filename)))
    }
}

impl Header for ContentType {
    fn header_name() -> &'static str {
        "Content-Type"
    }
}

impl Display for ContentType {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// `Content-Transfer-Encoding:` header
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentTransferEncoding(pub TransferEncoding);

impl Header for ContentTransferEncoding {
    fn header_name() -> &'static str {
        "Content-Transfer-Encoding"
    }
}

impl Display for ContentTransferEncoding {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        self.0.fmt(f)
    }
}

/// `Content-Disposition:` header
#[derive(Debug, Clone, PartialEq)]
pub struct ContentDisposition {
    pub disposition: Disposition,
    pub filename: String,
}

impl Header for ContentDisposition {
    fn header_name() -> &'static str {
        "Content-Disposition"
    }
}

impl Display for ContentDisposition {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{}; filename={}", self.disposition, quote(&self.filename))
    }
}

/// `Content-ID:` header
#[derive(Debug, Clone, PartialEq)]
pub struct ContentId(pub String);

impl Header for ContentId {
    fn header_name() -> &'static str {
        "Content-ID"
    }
}

impl Display for ContentId {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "<{}>", self.0)
    }
}
