use crate::attachment::{Attachment, AttachmentStore, Disposition};
use crate::boundary::BoundarySet;
use crate::config::{Config, Newline, Priority, TransferEncoding, MAX_LINE_LENGTH};
use crate::encoder;
use crate::error::{Error, Result};
use crate::header::{
    self, Date, Headers, MessageId, MimeVersion, ReturnPath, Subject, XMailer, XPriority,
};
use crate::html;
use crate::mailbox::{AddressBook, IntoRecipients, InvalidRecipient, Recipient, Role};
use crate::mailtype::MailType;
use crate::mimebody::{BodyContent, MessageBody};
use crate::mimetypes::MimeTypes;
use crate::transport::{SendOutcome, SendState, Transport};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::Path;
use std::sync::Arc;

/// Message under composition
///
/// The draft is mutated freely until it is built or sent. Building never
/// touches the stored contents, so a draft can be sent again after
/// corrections.
///
/// # Example
///
/// ```
/// use emailcompose::{MessageDraft, SendOutcome};
///
/// let mut draft = MessageDraft::default();
/// draft
///     .to(("a@x.com", "Alice"))
///     .from("b@y.com", Some("Bob"))
///     .subject("Hi")
///     .body("Hello");
///
/// let transport = |_: &str, _: &str, _: &str, _: &str, _: &str| true;
/// assert_eq!(draft.send(&transport).unwrap(), SendOutcome::Sent);
/// ```
#[derive(Debug, Clone)]
pub struct MessageDraft {
    config: Config,
    addresses: AddressBook,
    from: Option<Recipient>,
    subject: String,
    body: String,
    alt_body: String,
    attachments: AttachmentStore,
    invalid_addresses: Vec<InvalidRecipient>,
}

impl MessageDraft {
    /// Constructs an empty draft, the sender comes from the config
    pub fn new(config: Config, types: Arc<MimeTypes>) -> Self {
        MessageDraft {
            from: config.from.clone(),
            config,
            addresses: AddressBook::new(),
            subject: String::new(),
            body: String::new(),
            alt_body: String::new(),
            attachments: AttachmentStore::new(types),
            invalid_addresses: Vec::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get a mutable reference to the config
    #[inline]
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    #[inline]
    pub fn addresses(&self) -> &AddressBook {
        &self.addresses
    }

    #[inline]
    pub fn sender(&self) -> Option<&Recipient> {
        self.from.as_ref()
    }

    #[inline]
    pub fn subject_ref(&self) -> &str {
        &self.subject
    }

    #[inline]
    pub fn body_ref(&self) -> &str {
        &self.body
    }

    #[inline]
    pub fn alt_body_ref(&self) -> &str {
        &self.alt_body
    }

    #[inline]
    pub fn attachments(&self) -> &AttachmentStore {
        &self.attachments
    }

    /// Recipients rejected by the last validation
    #[inline]
    pub fn invalid_addresses(&self) -> &[InvalidRecipient] {
        &self.invalid_addresses
    }

    /// Add `To:` recipients
    pub fn to<R: IntoRecipients>(&mut self, recipients: R) -> &mut Self {
        self.addresses.add(Role::To, recipients);
        self
    }

    /// Add `Cc:` recipients
    pub fn cc<R: IntoRecipients>(&mut self, recipients: R) -> &mut Self {
        self.addresses.add(Role::Cc, recipients);
        self
    }

    /// Add `Bcc:` recipients
    pub fn bcc<R: IntoRecipients>(&mut self, recipients: R) -> &mut Self {
        self.addresses.add(Role::Bcc, recipients);
        self
    }

    /// Add `Reply-To:` addresses
    pub fn reply_to<R: IntoRecipients>(&mut self, recipients: R) -> &mut Self {
        self.addresses.add(Role::ReplyTo, recipients);
        self
    }

    /// Set the sender
    pub fn from<E: Into<String>>(&mut self, email: E, name: Option<&str>) -> &mut Self {
        self.from = Some(Recipient::new(email, name.map(Into::into)));
        self
    }

    pub fn subject<S: Into<String>>(&mut self, subject: S) -> &mut Self {
        self.subject = subject.into();
        self
    }

    /// Set a plain or html body as is
    pub fn body<S: Into<String>>(&mut self, body: S) -> &mut Self {
        self.body = body.into();
        self
    }

    /// Set the plain text alternative of an html body
    pub fn alt_body<S: Into<String>>(&mut self, alt_body: S) -> &mut Self {
        self.alt_body = alt_body.into();
        self
    }

    pub fn priority(&mut self, priority: Priority) -> &mut Self {
        self.config.priority = priority;
        self
    }

    /// Set an html body using the configured alternative and auto attach settings
    pub fn html_body(&mut self, html: &str) -> Result<&mut Self> {
        self.html_body_with(html, None, None)
    }

    /// Set an html body
    ///
    /// Comments are dropped. With auto attach every local `src` and
    /// `background` file is attached inline and referenced by `cid:`. With
    /// alternative generation the plain text alternative is derived from
    /// the html. `None` falls back to the config. When attaching fails
    /// the body is left unchanged.
    pub fn html_body_with(
        &mut self,
        html: &str,
        generate_alt: Option<bool>,
        auto_attach: Option<bool>,
    ) -> Result<&mut Self> {
        let generate_alt = generate_alt.unwrap_or(self.config.generate_alt);
        let auto_attach = auto_attach.unwrap_or(self.config.auto_attach);

        let mut html = html::strip_comments(html);

        if auto_attach {
            let (attachments, config) = (&mut self.attachments, &self.config);
            html = html::rewrite_resources(&html, |url| {
                attachments
                    .attach_file(url, Disposition::Inline, None, None, config)
                    .map(Attachment::cid)
            })?;
        }

        if generate_alt {
            self.alt_body = html::generate_alt(&html, self.config.wordwrap, self.config.newline);
        }
        self.body = html;
        self.config.is_html = true;
        Ok(self)
    }

    /// Attach a file
    ///
    /// The content id defaults to the hash of the file name, the media type
    /// to the one known for the extension.
    pub fn attach<P: AsRef<Path>>(
        &mut self,
        path: P,
        inline: bool,
        content_id: Option<&str>,
        mime: Option<&str>,
    ) -> Result<&mut Self> {
        self.attachments
            .attach_file(path, inline.into(), content_id, mime, &self.config)?;
        Ok(self)
    }

    /// Attach in-memory content
    pub fn attach_bytes(
        &mut self,
        data: &[u8],
        filename: &str,
        inline: bool,
        content_id: Option<&str>,
        mime: Option<&str>,
    ) -> Result<&mut Self> {
        self.attachments
            .attach_bytes(data, filename, inline.into(), content_id, mime, &self.config)?;
        Ok(self)
    }

    pub fn clear_attachments(&mut self) -> &mut Self {
        self.attachments.clear();
        self
    }

    /// Empty the given address lists
    pub fn clear(&mut self, roles: &[Role]) -> &mut Self {
        self.addresses.clear(roles);
        self
    }

    /// Empty `To:`, `Cc:` and `Bcc:`
    pub fn clear_recipients(&mut self) -> &mut Self {
        self.clear(&Role::RECIPIENTS)
    }

    /// Empty every address list and the sender
    pub fn clear_addresses(&mut self) -> &mut Self {
        self.from = None;
        self.clear(&Role::ALL)
    }

    /// Layout the message would be sent with
    pub fn mail_type(&self) -> MailType {
        MailType::classify(
            self.config.is_html,
            !self.alt_body.trim().is_empty(),
            !self.attachments.inline().is_empty(),
            !self.attachments.attachments().is_empty(),
        )
    }

    fn check_ready(&self) -> Result<&Recipient> {
        if !self.addresses.has_recipients() {
            return Err(Error::MissingRecipient);
        }
        let from = self
            .from
            .as_ref()
            .filter(|from| !from.email.trim().is_empty())
            .ok_or(Error::MissingSender)?;

        // addresses go into header lines verbatim, validated or not
        let unsafe_address = Role::ALL
            .iter()
            .flat_map(|role| self.addresses.list(*role).iter())
            .chain(Some(from))
            .find(|recipient| !recipient.is_header_safe());
        if let Some(recipient) = unsafe_address {
            return Err(Error::InvalidAddress(recipient.email.clone()));
        }
        Ok(from)
    }

    fn prepare_text(&self, text: &str) -> String {
        let Config {
            encoding,
            newline,
            ref charset,
            ..
        } = self.config;
        let qp_mode = encoding == TransferEncoding::QuotedPrintable;
        let encoded = encoder::encode(text, encoding, newline);

        // quoted-printable lines are bounded even with wrapping disabled
        let width = match self.config.wrap_width() {
            Some(width) => width,
            None if qp_mode => MAX_LINE_LENGTH,
            None => return encoded,
        };
        encoder::wrap(&encoded, width, charset, newline, qp_mode)
    }

    /// Compose headers and body without validating the recipients
    ///
    /// Boundaries, date and message id are fresh on every call.
    pub fn build(&self) -> Result<BuiltMessage> {
        let from = self.check_ready()?;
        let newline = self.config.newline;

        let boundaries = BoundarySet::generate();
        let mail_type = self.mail_type();

        let body = self.prepare_text(&self.body);
        let alt_body = if mail_type.has_alt() {
            self.prepare_text(&self.alt_body)
        } else {
            String::new()
        };

        let content = BodyContent {
            body: &body,
            alt_body: &alt_body,
            charset: &self.config.charset,
            encoding: self.config.encoding,
            inline: self.attachments.inline(),
            attachments: self.attachments.attachments(),
        };
        let message_body = MessageBody::layout(mail_type, &boundaries, &content);

        let to = self.addresses.list(Role::To);
        let mut headers = Headers::new()
            .with(Date::now()?)
            .with(ReturnPath(from.email.clone()))
            .with(header::To(to.clone()))
            .with(Subject(self.subject.clone()))
            .with(header::From(from.clone()))
            .with(header::Cc(self.addresses.list(Role::Cc).clone()))
            .with(header::Bcc(self.addresses.list(Role::Bcc).clone()))
            .with(header::ReplyTo(self.addresses.list(Role::ReplyTo).clone()))
            .with(MessageId::generate(from))
            .with(MimeVersion::default())
            .with(XPriority(self.config.priority))
            .with(XMailer(self.config.user_agent.clone()));
        if let Some(encoding) = message_body.transfer_encoding() {
            headers.set(encoding);
        }
        headers.set(message_body.content_type());

        tracing::debug!(
            state = %SendState::Built,
            %mail_type,
            boundary = boundaries.outer(),
            "message built"
        );

        Ok(BuiltMessage {
            to: to.to_string(),
            subject: self.subject.clone(),
            envelope_from: from.email.clone(),
            header_block: headers.render(newline),
            body_block: message_body.render(newline),
            mail_type,
            newline,
        })
    }

    /// Validate (when configured), build and hand the message to the transport
    pub fn send<T: Transport + ?Sized>(&mut self, transport: &T) -> Result<SendOutcome> {
        self.send_with(transport, None)
    }

    /// Send, overriding the configured validation when `validate` is set
    ///
    /// A missing recipient or sender is an error raised before the
    /// transport is called. Malformed addresses and a refusing transport
    /// are reported as [`SendOutcome`] values.
    pub fn send_with<T: Transport + ?Sized>(
        &mut self,
        transport: &T,
        validate: Option<bool>,
    ) -> Result<SendOutcome> {
        self.check_ready()?;
        tracing::trace!(state = %SendState::Draft, "sending message");

        if validate.unwrap_or(self.config.validate) {
            if let Err(failed) = self.addresses.validate() {
                tracing::warn!(
                    state = %SendState::Failed,
                    count = failed.len(),
                    "recipient validation failed"
                );
                self.invalid_addresses = failed.clone();
                return Ok(SendOutcome::FailedValidation(failed));
            }
            tracing::trace!(state = %SendState::Validated, "recipients validated");
        }
        self.invalid_addresses.clear();

        let message = self.build()?;

        if transport.send(
            &message.to,
            &message.subject,
            &message.body_block,
            &message.header_block,
            &message.envelope_from,
        ) {
            tracing::debug!(
                state = %SendState::Sent,
                mail_type = %message.mail_type,
                "message sent"
            );
            Ok(SendOutcome::Sent)
        } else {
            tracing::warn!(
                state = %SendState::Failed,
                mail_type = %message.mail_type,
                "transport refused message"
            );
            Ok(SendOutcome::FailedSend)
        }
    }
}

impl Default for MessageDraft {
    fn default() -> Self {
        MessageDraft::new(Config::default(), Arc::new(MimeTypes::default()))
    }
}

/// Composed message ready for a transport
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltMessage {
    to: String,
    subject: String,
    envelope_from: String,
    header_block: String,
    body_block: String,
    mail_type: MailType,
    newline: Newline,
}

impl BuiltMessage {
    /// Formatted `To:` list
    #[inline]
    pub fn to(&self) -> &str {
        &self.to
    }

    #[inline]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Sender address for the envelope
    #[inline]
    pub fn envelope_from(&self) -> &str {
        &self.envelope_from
    }

    /// Header lines, each terminated by the newline
    #[inline]
    pub fn header_block(&self) -> &str {
        &self.header_block
    }

    #[inline]
    pub fn body_block(&self) -> &str {
        &self.body_block
    }

    #[inline]
    pub fn mail_type(&self) -> MailType {
        self.mail_type
    }

    /// Value of the first header with the given name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.header_block.split(self.newline.as_str()).find_map(|line| {
            let (known, value) = line.split_once(": ")?;
            if known.eq_ignore_ascii_case(name) {
                Some(value)
            } else {
                None
            }
        })
    }
}

impl Display for BuiltMessage {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        f.write_str(&self.header_block)?;
        f.write_str(self.newline.as_str())?;
        f.write_str(&self.body_block)
    }
}
