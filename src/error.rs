//! Error types for message composition.

use std::io;
use std::path::PathBuf;

/// Result type alias for composition operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal composition errors.
///
/// Recoverable outcomes (invalid recipient addresses, a transport which
/// refused the message) are not errors, see [`SendOutcome`](crate::SendOutcome).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// None of the `To`, `Cc` or `Bcc` lists has a recipient.
    #[error("Cannot send email without recipients")]
    MissingRecipient,

    /// The sender address is not set.
    #[error("Cannot send without from address")]
    MissingSender,

    /// The attachment path does not name a file.
    #[error("Email attachment not found: {}", .0.display())]
    AttachmentNotFound(PathBuf),

    /// The attachment could not be read or has no content.
    #[error("Could not read attachment or attachment is empty: {}", .path.display())]
    InvalidAttachment {
        /// Attachment source path or file name.
        path: PathBuf,
        /// Underlying read error, if any.
        #[source]
        source: Option<io::Error>,
    },

    /// Transfer encoding name is not one of `quoted-printable`, `base64`,
    /// `7bit` or `8bit`.
    #[error("{0} is not a supported encoding method")]
    UnsupportedEncoding(String),

    /// Mail type name does not match any known message layout.
    #[error("Invalid content-type {0}")]
    InvalidContentType(String),

    /// An email address holds characters which would break the header line.
    #[error("Invalid email address: {0:?}")]
    InvalidAddress(String),

    /// An explicit content id holds whitespace, control characters or angle brackets.
    #[error("Invalid content id: {0:?}")]
    InvalidContentId(String),

    /// A media type string could not be parsed.
    #[error("Invalid mime type: {0}")]
    InvalidMime(String),

    /// Line separator is neither CRLF nor LF.
    #[error("Invalid newline sequence: {0:?}")]
    InvalidNewline(String),

    /// Priority outside of 1..=5.
    #[error("Invalid priority: {0}")]
    InvalidPriority(u8),

    /// Date header could not be formatted.
    #[error("Date format error: {0}")]
    Date(#[from] time::error::Format),
}

impl Error {
    pub(crate) fn invalid_attachment(path: impl Into<PathBuf>, source: Option<io::Error>) -> Self {
        Self::InvalidAttachment {
            path: path.into(),
            source,
        }
    }
}
