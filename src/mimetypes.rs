//! File extension to media type table.
//!
//! The table is built once, then shared read-only between drafts
//! (usually behind an [`Arc`](std::sync::Arc)).

use crate::error::{Error, Result};
use mime::Mime;
use std::collections::HashMap;
use std::path::Path;

const DEFAULT_TYPES: &[(&str, &str)] = &[
    ("aif", "audio/x-aiff"),
    ("aifc", "audio/x-aiff"),
    ("aiff", "audio/x-aiff"),
    ("avi", "video/x-msvideo"),
    ("bin", "application/macbinary"),
    ("bmp", "image/bmp"),
    ("css", "text/css"),
    ("csv", "text/csv"),
    ("doc", "application/msword"),
    ("docx", "application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
    ("eml", "message/rfc822"),
    ("eps", "application/postscript"),
    ("exe", "application/octet-stream"),
    ("gif", "image/gif"),
    ("gtar", "application/x-gtar"),
    ("gz", "application/x-gzip"),
    ("htm", "text/html"),
    ("html", "text/html"),
    ("ico", "image/x-icon"),
    ("ics", "text/calendar"),
    ("jpe", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("jpg", "image/jpeg"),
    ("js", "application/x-javascript"),
    ("json", "application/json"),
    ("log", "text/plain"),
    ("mid", "audio/midi"),
    ("midi", "audio/midi"),
    ("mov", "video/quicktime"),
    ("mp2", "audio/mpeg"),
    ("mp3", "audio/mpeg"),
    ("mp4", "video/mp4"),
    ("mpeg", "video/mpeg"),
    ("mpg", "video/mpeg"),
    ("odt", "application/vnd.oasis.opendocument.text"),
    ("ogg", "audio/ogg"),
    ("pdf", "application/pdf"),
    ("png", "image/png"),
    ("ppt", "application/vnd.ms-powerpoint"),
    ("pptx", "application/vnd.openxmlformats-officedocument.presentationml.presentation"),
    ("ps", "application/postscript"),
    ("psd", "application/x-photoshop"),
    ("qt", "video/quicktime"),
    ("rtf", "text/rtf"),
    ("svg", "image/svg+xml"),
    ("swf", "application/x-shockwave-flash"),
    ("tar", "application/x-tar"),
    ("text", "text/plain"),
    ("tgz", "application/x-tar"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("txt", "text/plain"),
    ("wav", "audio/x-wav"),
    ("webp", "image/webp"),
    ("xhtml", "application/xhtml+xml"),
    ("xls", "application/vnd.ms-excel"),
    ("xlsx", "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
    ("xml", "text/xml"),
    ("xsl", "text/xml"),
    ("zip", "application/zip"),
];

/// Immutable extension → media type mapping
#[derive(Debug, Clone)]
pub struct MimeTypes {
    types: HashMap<String, Mime>,
    fallback: Mime,
}

impl MimeTypes {
    /// Empty table, every lookup resolves to `application/octet-stream`
    pub fn empty() -> Self {
        MimeTypes {
            types: HashMap::new(),
            fallback: mime::APPLICATION_OCTET_STREAM,
        }
    }

    /// Build a table from externally loaded `(extension, media type)` pairs
    pub fn from_pairs<I, E, M>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (E, M)>,
        E: AsRef<str>,
        M: AsRef<str>,
    {
        pairs
            .into_iter()
            .try_fold(Self::empty(), |table, (ext, mime)| table.with(ext.as_ref(), mime.as_ref()))
    }

    /// Add or replace an entry
    pub fn with(mut self, extension: &str, mime: &str) -> Result<Self> {
        let mime = parse_mime(mime)?;
        self.types
            .insert(extension.trim_start_matches('.').to_ascii_lowercase(), mime);
        Ok(self)
    }

    /// Media type for a file extension (case-insensitive)
    pub fn get(&self, extension: &str) -> &Mime {
        self.types
            .get(&extension.to_ascii_lowercase())
            .unwrap_or(&self.fallback)
    }

    /// Media type of a file by its extension
    pub fn lookup<P: AsRef<Path>>(&self, path: P) -> &Mime {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(&self.fallback, |ext| self.get(ext))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for MimeTypes {
    fn default() -> Self {
        let types = DEFAULT_TYPES
            .iter()
            .filter_map(|(ext, mime)| mime.parse().ok().map(|mime| ((*ext).to_string(), mime)))
            .collect();

        MimeTypes {
            types,
            fallback: mime::APPLICATION_OCTET_STREAM,
        }
    }
}

pub(crate) fn parse_mime(mime: &str) -> Result<Mime> {
    mime.trim()
        .parse()
        .map_err(|_| Error::InvalidMime(mime.into()))
}
