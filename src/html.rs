//! Html body preparation: comment stripping, inline resource references
//! and the generated plain text alternative.

use crate::config::Newline;
use crate::encoder::wrap;
use crate::error::Result;
use regex::{Captures, Regex};
use std::collections::HashMap;

lazy_static! {
    static ref HTML_COMMENT_RE: Regex = Regex::new(r"(?s)<!--.*?-->").unwrap();
    static ref CSS_COMMENT_RE: Regex = Regex::new(r"(?s)/\*.*?\*/").unwrap();
    static ref RESOURCE_RE: Regex = Regex::new(r#"(?i)\b(src|background)="([^"]*)""#).unwrap();
    static ref HIDDEN_BLOCK_RE: Regex = Regex::new(
        r"(?is)<head\b[^>]*>.*?</head\s*>|<title\b[^>]*>.*?</title\s*>|<style\b[^>]*>.*?</style\s*>|<script\b[^>]*>.*?</script\s*>"
    ).unwrap();
    static ref TAG_RE: Regex = Regex::new(r"(?s)<[^>]*>").unwrap();
}

/// Remove html and css comments
pub fn strip_comments(html: &str) -> String {
    let html = HTML_COMMENT_RE.replace_all(html, "");
    CSS_COMMENT_RE.replace_all(&html, "").into_owned()
}

/// Whether a resource reference points to a local file
pub fn is_local_resource(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    !(lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("cid:"))
}

/// Local `src="…"` and `background="…"` values in document order, without repeats
pub fn local_resources(html: &str) -> Vec<&str> {
    let mut found: Vec<&str> = Vec::new();
    for caps in RESOURCE_RE.captures_iter(html) {
        if let Some(url) = caps.get(2).map(|m| m.as_str()) {
            if is_local_resource(url) && !found.contains(&url) {
                found.push(url);
            }
        }
    }
    found
}

/// Attach local resources and point their references to the attachments
///
/// `attach` receives every distinct local reference once and returns the
/// `cid:` reference replacing it. The first error aborts the rewrite.
pub fn rewrite_resources<F>(html: &str, mut attach: F) -> Result<String>
where
    F: FnMut(&str) -> Result<String>,
{
    let mut cids = HashMap::new();
    for url in local_resources(html) {
        let cid = attach(url)?;
        tracing::debug!(%url, %cid, "inline resource rewritten");
        cids.insert(url.to_string(), cid);
    }

    if cids.is_empty() {
        return Ok(html.into());
    }

    let rewritten = RESOURCE_RE.replace_all(html, |caps: &Captures| match cids.get(&caps[2]) {
        Some(cid) => format!("{}=\"{}\"", &caps[1], cid),
        None => caps[0].to_string(),
    });
    Ok(rewritten.into_owned())
}

/// Plain text rendering of an html body
///
/// Drops the head, title, style and script blocks and all tags, trims
/// every line and keeps at most one blank line in a row, then wraps the
/// result at `width` (0 disables wrapping).
pub fn generate_alt(html: &str, width: usize, newline: Newline) -> String {
    let text = HIDDEN_BLOCK_RE.replace_all(html, "");
    let text = TAG_RE.replace_all(&text, "");

    let mut lines = Vec::new();
    let mut previous_blank = false;
    for line in text.trim().lines().map(str::trim) {
        if !line.is_empty() || !previous_blank {
            lines.push(line);
        }
        previous_blank = line.is_empty();
    }

    let nl = newline.as_str();
    let text = lines.join(nl);
    wrap(&text, width, "utf-8", newline, false)
        .trim_end_matches(['\r', '\n'])
        .to_string()
}
