//! MIME email message composition.
//!
//! A [`MessageDraft`] collects recipients, a plain or html body and
//! attachments. Building it classifies the message into a [`MailType`],
//! nests the multipart sections it needs and renders the header and body
//! blocks, which a [`Transport`] then delivers.

#[macro_use]
extern crate lazy_static;

mod attachment;
mod boundary;
mod config;
pub mod encoder;
mod error;
pub mod header;
pub mod html;
mod mailbox;
mod mailtype;
mod message;
mod mimebody;
mod mimetypes;
mod transport;
mod utf8_b;

pub use self::attachment::{content_id_for, Attachment, AttachmentStore, Disposition};
pub use self::boundary::BoundarySet;
pub use self::config::{Config, Newline, Priority, TransferEncoding, MAX_LINE_LENGTH};
pub use self::error::{Error, Result};
pub use self::mailbox::*;
pub use self::mailtype::MailType;
pub use self::message::{BuiltMessage, MessageDraft};
pub use self::mimebody::{
    BodyContent, MessageBody, MultiPart, MultiPartKind, Part, SinglePart, SinglePartBuilder,
};
pub use self::mimetypes::MimeTypes;
pub use self::transport::{SendOutcome, SendState, Transport};
