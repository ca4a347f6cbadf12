//! File attachments and inline resources.

use crate::config::Config;
use crate::encoder::base64_lines;
use crate::error::{Error, Result};
use crate::mimetypes::{parse_mime, MimeTypes};
use mime::Mime;
use sha2::{Digest, Sha256};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// How a part is presented by the mail client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Disposition {
    /// Resource referenced from the html body by `cid:`
    Inline,
    /// Standalone file
    Attachment,
}

impl Disposition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Disposition::Inline => "inline",
            Disposition::Attachment => "attachment",
        }
    }
}

impl Display for Disposition {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl From<bool> for Disposition {
    /// `true` means inline
    fn from(inline: bool) -> Self {
        if inline {
            Disposition::Inline
        } else {
            Disposition::Attachment
        }
    }
}

/// Encoded attachment ready to be placed into a message
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    filename: String,
    mime: Mime,
    disposition: Disposition,
    id: String,
    encoded: String,
}

impl Attachment {
    /// File name shown to the recipient
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn mime(&self) -> &Mime {
        &self.mime
    }

    pub fn disposition(&self) -> Disposition {
        self.disposition
    }

    /// Identifier without the `cid:` prefix
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Value of the `Content-ID` header, inline parts only
    pub fn content_id(&self) -> Option<String> {
        match self.disposition {
            Disposition::Inline => Some(format!("<{}>", self.id)),
            Disposition::Attachment => None,
        }
    }

    /// Reference usable in html attributes (`cid:<id>`)
    pub fn cid(&self) -> String {
        format!("cid:{}", self.id)
    }

    /// Base64 content split into lines
    pub fn encoded(&self) -> &str {
        &self.encoded
    }
}

/// Default content id of a file, the hex SHA-256 of its basename
pub fn content_id_for(filename: &str) -> String {
    hex::encode(Sha256::digest(basename(filename).as_bytes()))
}

fn basename(name: &str) -> &str {
    Path::new(name)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(name)
}

fn resolve_id(filename: &str, content_id: Option<&str>) -> Result<String> {
    let id = match content_id.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => id.strip_prefix("cid:").unwrap_or(id),
        None => return Ok(content_id_for(filename)),
    };
    // rendered inside `<...>` in a header line
    let forbidden = |c: char| c.is_whitespace() || c.is_control() || c == '<' || c == '>';
    if id.is_empty() || id.contains(forbidden) {
        return Err(Error::InvalidContentId(id.into()));
    }
    Ok(id.into())
}

/// Inline and regular attachments of a message
///
/// The two collections are separate namespaces keyed by content id.
#[derive(Debug, Clone)]
pub struct AttachmentStore {
    inline: Vec<Attachment>,
    attachment: Vec<Attachment>,
    types: Arc<MimeTypes>,
}

impl AttachmentStore {
    pub fn new(types: Arc<MimeTypes>) -> Self {
        AttachmentStore {
            inline: Vec::new(),
            attachment: Vec::new(),
            types,
        }
    }

    fn collection(&self, disposition: Disposition) -> &Vec<Attachment> {
        match disposition {
            Disposition::Inline => &self.inline,
            Disposition::Attachment => &self.attachment,
        }
    }

    /// Find an attachment by id, an optional `cid:` prefix is ignored
    pub fn get(&self, disposition: Disposition, id: &str) -> Option<&Attachment> {
        let id = id.strip_prefix("cid:").unwrap_or(id);
        self.collection(disposition).iter().find(|a| a.id == id)
    }

    /// Read and attach a file
    ///
    /// Attaching a second file under a known content id keeps the first one
    /// and does not read the file at all.
    pub fn attach_file<P: AsRef<Path>>(
        &mut self,
        path: P,
        disposition: Disposition,
        content_id: Option<&str>,
        mime: Option<&str>,
        config: &Config,
    ) -> Result<&Attachment> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| Error::AttachmentNotFound(path.into()))?;

        let id = resolve_id(&filename, content_id)?;
        if let Some(index) = self.position(disposition, &id) {
            tracing::debug!(%id, %disposition, "attachment already known");
            return Ok(&self.collection(disposition)[index]);
        }

        if !path.is_file() {
            return Err(Error::AttachmentNotFound(path.into()));
        }

        let data = fs::read(path).map_err(|error| Error::invalid_attachment(path, Some(error)))?;
        if data.is_empty() {
            return Err(Error::invalid_attachment(path, None));
        }

        let mime = match mime {
            Some(mime) => parse_mime(mime)?,
            None => self.types.lookup(path).clone(),
        };

        Ok(self.insert(filename, id, mime, disposition, &data, config))
    }

    /// Attach in-memory content under a file name
    pub fn attach_bytes(
        &mut self,
        data: &[u8],
        filename: &str,
        disposition: Disposition,
        content_id: Option<&str>,
        mime: Option<&str>,
        config: &Config,
    ) -> Result<&Attachment> {
        let filename = basename(filename).to_string();

        let id = resolve_id(&filename, content_id)?;
        if let Some(index) = self.position(disposition, &id) {
            tracing::debug!(%id, %disposition, "attachment already known");
            return Ok(&self.collection(disposition)[index]);
        }

        if data.is_empty() {
            return Err(Error::invalid_attachment(filename, None));
        }

        let mime = match mime {
            Some(mime) => parse_mime(mime)?,
            None => self.types.lookup(&filename).clone(),
        };

        Ok(self.insert(filename, id, mime, disposition, data, config))
    }

    fn position(&self, disposition: Disposition, id: &str) -> Option<usize> {
        self.collection(disposition).iter().position(|a| a.id == id)
    }

    fn insert(
        &mut self,
        filename: String,
        id: String,
        mime: Mime,
        disposition: Disposition,
        data: &[u8],
        config: &Config,
    ) -> &Attachment {
        let encoded = base64_lines(data, config.chunk_width(), config.newline);

        tracing::debug!(
            file = %filename,
            %id,
            %mime,
            %disposition,
            size = data.len(),
            "attachment encoded"
        );

        let collection = match disposition {
            Disposition::Inline => &mut self.inline,
            Disposition::Attachment => &mut self.attachment,
        };
        collection.push(Attachment {
            filename,
            mime,
            disposition,
            id,
            encoded,
        });
        &collection[collection.len() - 1]
    }

    /// Inline parts in attach order
    pub fn inline(&self) -> &[Attachment] {
        &self.inline
    }

    /// Regular attachments in attach order
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachment
    }

    pub fn is_empty(&self) -> bool {
        self.inline.is_empty() && self.attachment.is_empty()
    }

    /// Drop every attachment
    pub fn clear(&mut self) {
        self.inline.clear();
        self.attachment.clear();
    }
}

#[cfg(test)]
mod test {
    use super::{content_id_for, AttachmentStore, Disposition};
    use crate::config::{Config, Newline};
    use crate::error::Error;
    use crate::mimetypes::MimeTypes;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn store() -> AttachmentStore {
        AttachmentStore::new(Arc::new(MimeTypes::default()))
    }

    fn write_file(dir: &TempDir, name: &str, data: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(data).unwrap();
        path
    }

    #[test]
    fn content_id_uses_basename() {
        assert_eq!(content_id_for("images/logo.png"), content_id_for("logo.png"));
        assert_eq!(content_id_for("logo.png").len(), 64);
        assert_ne!(content_id_for("logo.png"), content_id_for("logo.gif"));
    }

    #[test]
    fn attach_file_round_trip() {
        let dir = TempDir::new().unwrap();
        let data: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
        let path = write_file(&dir, "report.PDF", &data);

        let mut store = store();
        let config = Config::default();
        let attachment = store
            .attach_file(&path, Disposition::Attachment, None, None, &config)
            .unwrap();

        assert_eq!(attachment.filename(), "report.PDF");
        assert_eq!(attachment.mime().as_ref(), "application/pdf");
        assert_eq!(attachment.id(), content_id_for("report.PDF"));
        assert_eq!(attachment.content_id(), None);
        assert!(attachment.encoded().split("\r\n").all(|line| line.len() <= 76));
        assert_eq!(STANDARD.decode(attachment.encoded().replace("\r\n", "")).unwrap(), data);
        assert_eq!(store.attachments().len(), 1);
        assert!(store.inline().is_empty());
    }

    #[test]
    fn attach_uses_configured_width() {
        let config = Config {
            wordwrap: 20,
            newline: Newline::Lf,
            ..Config::default()
        };
        let mut store = store();
        let attachment = store
            .attach_bytes(&[7u8; 60], "blob.bin", Disposition::Attachment, None, None, &config)
            .unwrap();

        assert!(attachment.encoded().lines().all(|line| line.len() <= 20));
        assert_eq!(attachment.encoded().lines().count(), 4);
    }

    #[test]
    fn missing_file() {
        let dir = TempDir::new().unwrap();
        let mut store = store();

        let result = store.attach_file(
            dir.path().join("missing.png"),
            Disposition::Inline,
            None,
            None,
            &Config::default(),
        );

        assert!(matches!(result, Err(Error::AttachmentNotFound(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn empty_file() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "empty.txt", b"");
        let mut store = store();

        let config = Config::default();
        let result = store.attach_file(&path, Disposition::Attachment, None, None, &config);

        assert!(matches!(result, Err(Error::InvalidAttachment { .. })));
        assert!(store.is_empty());
    }

    #[test]
    fn explicit_id_and_mime() {
        let mut store = store();
        let config = Config::default();
        let attachment = store
            .attach_bytes(
                b"<svg/>",
                "logo",
                Disposition::Inline,
                Some("cid:logo"),
                Some("image/svg+xml"),
                &config,
            )
            .unwrap();

        assert_eq!(attachment.id(), "logo");
        assert_eq!(attachment.cid(), "cid:logo");
        assert_eq!(attachment.content_id().as_deref(), Some("<logo>"));
        assert_eq!(attachment.mime().as_ref(), "image/svg+xml");

        let result =
            store.attach_bytes(b"x", "x.txt", Disposition::Inline, None, Some("no mime"), &config);
        assert!(matches!(result, Err(Error::InvalidMime(_))));
    }

    #[test]
    fn content_id_must_fit_header() {
        let mut store = store();
        let config = Config::default();

        for id in ["x>\r\nX-Evil: 1", "a b", "<x>", "cid:"] {
            let result =
                store.attach_bytes(b"png", "a.png", Disposition::Inline, Some(id), None, &config);
            assert!(matches!(result, Err(Error::InvalidContentId(_))), "{:?} accepted", id);
        }
        assert!(store.is_empty());

        let attachment = store
            .attach_bytes(
                b"png",
                "logo.png",
                Disposition::Inline,
                Some(" logo@example.com "),
                None,
                &config,
            )
            .unwrap();
        assert_eq!(attachment.content_id().as_deref(), Some("<logo@example.com>"));
    }

    #[test]
    fn empty_bytes() {
        let mut store = store();
        let config = Config::default();
        let result = store.attach_bytes(b"", "a.txt", Disposition::Attachment, None, None, &config);

        assert!(matches!(result, Err(Error::InvalidAttachment { .. })));
    }

    #[test]
    fn duplicate_id_keeps_first() {
        let mut store = store();
        let config = Config::default();

        store
            .attach_bytes(b"first", "a.txt", Disposition::Inline, None, None, &config)
            .unwrap();
        store
            .attach_bytes(b"second", "b.txt", Disposition::Inline, None, None, &config)
            .unwrap();
        let again = store
            .attach_bytes(b"third", "dir/a.txt", Disposition::Inline, None, None, &config)
            .unwrap();

        assert_eq!(again.encoded(), STANDARD.encode("first"));
        assert_eq!(store.inline().len(), 2);
        assert_eq!(store.inline()[0].filename(), "a.txt");
        assert_eq!(store.inline()[1].filename(), "b.txt");

        // separate namespace
        store
            .attach_bytes(b"third", "a.txt", Disposition::Attachment, None, None, &config)
            .unwrap();
        assert_eq!(store.attachments().len(), 1);
    }

    #[test]
    fn known_id_skips_file_read() {
        let dir = TempDir::new().unwrap();
        let mut store = store();
        let config = Config::default();

        store
            .attach_bytes(b"data", "logo.png", Disposition::Inline, None, None, &config)
            .unwrap();
        let known = store
            .attach_file(dir.path().join("logo.png"), Disposition::Inline, None, None, &config)
            .unwrap();

        assert_eq!(known.encoded(), STANDARD.encode("data"));
    }

    #[test]
    fn clear_empties_both() {
        let mut store = store();
        let config = Config::default();
        store.attach_bytes(b"a", "a.txt", Disposition::Inline, None, None, &config).unwrap();
        store.attach_bytes(b"b", "b.txt", Disposition::Attachment, None, None, &config).unwrap();

        store.clear();

        assert!(store.is_empty());
    }
}
