use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use emailcompose::{
    content_id_for, Config, Disposition, Error, MailType, MessageDraft, Newline, Role, SendOutcome,
    TransferEncoding,
};
use pretty_assertions::assert_eq;
use quoted_printable::ParseMode;
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[derive(Debug, Clone)]
struct Delivery {
    to: String,
    subject: String,
    body: String,
    headers: String,
    envelope_from: String,
}

fn recorder(
    log: &RefCell<Vec<Delivery>>,
    accept: bool,
) -> impl Fn(&str, &str, &str, &str, &str) -> bool + '_ {
    move |to: &str, subject: &str, body: &str, headers: &str, envelope_from: &str| {
        log.borrow_mut().push(Delivery {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
            headers: headers.into(),
            envelope_from: envelope_from.into(),
        });
        accept
    }
}

fn write_file(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, data).unwrap();
    path
}

fn boundary(content_type: &str) -> &str {
    let start = content_type.find("boundary=\"").unwrap() + "boundary=\"".len();
    let end = start + content_type[start..].find('"').unwrap();
    &content_type[start..end]
}

fn simple_draft() -> MessageDraft {
    let mut draft = MessageDraft::default();
    draft.to("a@x.com").from("b@y.com", None).subject("Hi").body("Hello");
    draft
}

#[test]
fn plain_message_is_sent() {
    let log = RefCell::new(Vec::new());
    let mut draft = simple_draft();

    assert_eq!(draft.send(&recorder(&log, true)).unwrap(), SendOutcome::Sent);

    let log = log.into_inner();
    assert_eq!(log.len(), 1);
    let sent = &log[0];
    assert_eq!(sent.to, "a@x.com");
    assert_eq!(sent.subject, "Hi");
    assert_eq!(sent.envelope_from, "b@y.com");
    assert_eq!(sent.body, "Hello\r\n");

    let lines: Vec<&str> = sent.headers.split("\r\n").collect();
    assert!(lines.contains(&"To: a@x.com"));
    assert!(lines.contains(&"From: b@y.com"));
    assert!(lines.contains(&"Content-Type: text/plain; charset=\"utf-8\""));
    assert!(!sent.headers.ends_with("\r\n\r\n"));
}

#[test]
fn html_resources_become_inline_parts() {
    let dir = TempDir::new().unwrap();
    let logo = write_file(dir.path(), "logo.png", b"\x89PNG fake image");
    let id = content_id_for("logo.png");

    let mut draft = simple_draft();
    draft
        .html_body(&format!(
            r#"<p>Logo</p><img src="{}"><img src="https://example.com/remote.png">"#,
            logo.display()
        ))
        .unwrap();

    assert!(draft.body_ref().contains(&format!("src=\"cid:{}\"", id)));
    assert!(draft.body_ref().contains("src=\"https://example.com/remote.png\""));
    let attachment = draft.attachments().get(Disposition::Inline, &id).unwrap();
    assert_eq!(attachment.filename(), "logo.png");
    assert_eq!(attachment.mime().essence_str(), "image/png");
    assert_eq!(draft.alt_body_ref(), "Logo");
    assert_eq!(draft.mail_type(), MailType::HtmlAltInline);

    let message = draft.build().unwrap();
    let outer = boundary(message.header("Content-Type").unwrap()).to_string();
    assert!(message.header("Content-Type").unwrap().starts_with("multipart/alternative"));
    assert!(message.body_block().contains(&format!("Content-ID: <{}>\r\n", id)));
    assert!(message.body_block().ends_with(&format!("--{}--", outer)));
}

#[test]
fn html_alt_attach_boundaries() {
    let dir = TempDir::new().unwrap();
    let report = write_file(dir.path(), "report.pdf", b"%PDF-1.4 fake");

    let mut draft = simple_draft();
    draft
        .html_body_with("<p>Hello</p>", Some(false), Some(false))
        .unwrap()
        .alt_body("Hello")
        .attach(&report, false, None, None)
        .unwrap();

    assert_eq!(draft.mail_type(), MailType::HtmlAltAttach);

    let message = draft.build().unwrap();
    let body = message.body_block();
    let outer = boundary(message.header("Content-Type").unwrap()).to_string();
    let inner = outer.replacen("B1_", "B2_", 1);

    assert!(outer.starts_with("B1_"));
    assert!(message.header("Content-Type").unwrap().starts_with("multipart/mixed"));
    assert_eq!(body.matches(&format!("--{}--", outer)).count(), 1);
    assert_eq!(body.matches(&format!("--{}--", inner)).count(), 1);
    assert_eq!(
        body.matches(&format!("multipart/alternative; boundary=\"{}\"", inner)).count(),
        1
    );
    assert!(!body.contains("B3_"));
    assert!(body.contains("Content-Disposition: attachment; filename=\"report.pdf\""));

    let known = [
        format!("--{}", outer),
        format!("--{}--", outer),
        format!("--{}", inner),
        format!("--{}--", inner),
    ];
    for line in body.lines().filter(|line| line.starts_with("--")) {
        assert!(known.iter().any(|known| known == line), "unexpected boundary line {}", line);
    }
}

#[test]
fn missing_recipients_never_reach_transport() {
    let log = RefCell::new(Vec::new());
    let mut draft = MessageDraft::default();
    draft.from("b@y.com", None).reply_to("r@y.com").body("Hello");

    assert!(matches!(draft.send(&recorder(&log, true)), Err(Error::MissingRecipient)));

    draft.to("a@x.com").clear_recipients();
    assert!(matches!(draft.send(&recorder(&log, true)), Err(Error::MissingRecipient)));

    assert!(log.borrow().is_empty());
}

#[test]
fn invalid_addresses_are_reported() {
    let log = RefCell::new(Vec::new());
    let mut draft = simple_draft();
    draft.cc(["user@example.com", "not-an-email"]);

    match draft.send(&recorder(&log, true)).unwrap() {
        SendOutcome::FailedValidation(failed) => {
            assert_eq!(failed.len(), 1);
            assert_eq!(failed[0].role, Role::Cc);
            assert_eq!(failed[0].recipient.email, "not-an-email");
        }
        other => panic!("unexpected {:?}", other),
    }
    assert!(log.borrow().is_empty());
    assert_eq!(draft.invalid_addresses().len(), 1);
    assert_eq!(draft.addresses().list(Role::Cc).len(), 2);

    draft.clear(&[Role::Cc]).cc("user@example.com");
    assert_eq!(draft.send(&recorder(&log, true)).unwrap(), SendOutcome::Sent);
    assert!(draft.invalid_addresses().is_empty());
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn validation_can_be_skipped() {
    let log = RefCell::new(Vec::new());
    let mut draft = simple_draft();
    draft.to("not-an-email");

    assert_eq!(draft.send_with(&recorder(&log, true), Some(false)).unwrap(), SendOutcome::Sent);
    assert_eq!(log.borrow()[0].to, "a@x.com, not-an-email");
}

#[test]
fn line_breaks_in_addresses_never_reach_transport() {
    let log = RefCell::new(Vec::new());
    let mut draft = simple_draft();
    draft.to("c@x.com\nBcc: victim@evil.com");

    assert!(matches!(
        draft.send_with(&recorder(&log, true), Some(false)),
        Err(Error::InvalidAddress(email)) if email == "c@x.com\nBcc: victim@evil.com"
    ));
    assert!(log.borrow().is_empty());
}

#[test]
fn refused_by_transport() {
    let log = RefCell::new(Vec::new());
    let mut draft = simple_draft();

    assert_eq!(draft.send(&recorder(&log, false)).unwrap(), SendOutcome::FailedSend);
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn resend_uses_fresh_boundaries() {
    let log = RefCell::new(Vec::new());
    let mut draft = simple_draft();
    draft.attach_bytes(b"a,b\n1,2\n", "table.csv", false, None, None).unwrap();

    draft.send(&recorder(&log, true)).unwrap();
    draft.to("c@x.com");
    draft.send(&recorder(&log, true)).unwrap();

    let log = log.into_inner();
    let content_type = |headers: &str| {
        let line = headers.lines().find(|l| l.starts_with("Content-Type:")).unwrap();
        boundary(line).to_string()
    };
    let first = content_type(&log[0].headers);
    let second = content_type(&log[1].headers);

    assert_ne!(first, second);
    assert!(!log[1].body.contains(&first));
    assert_eq!(log[1].to, "a@x.com, c@x.com");
    assert_eq!(draft.body_ref(), "Hello");
}

#[test]
fn attachment_content_round_trip() {
    let dir = TempDir::new().unwrap();
    let data: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
    let path = write_file(dir.path(), "blob.dat", &data);

    let mut draft = simple_draft();
    draft.attach(&path, false, None, None).unwrap();

    let attachment = &draft.attachments().attachments()[0];
    assert_eq!(attachment.mime().essence_str(), "application/octet-stream");
    assert!(attachment.encoded().split("\r\n").all(|line| line.len() <= 76));

    let decoded = STANDARD.decode(attachment.encoded().replace("\r\n", "")).unwrap();
    assert_eq!(decoded, data);
}

#[test]
fn failed_attach_leaves_draft_unattached() {
    let dir = TempDir::new().unwrap();
    let empty = write_file(dir.path(), "empty.txt", b"");

    let mut draft = simple_draft();

    assert!(matches!(
        draft.attach(dir.path().join("missing.txt"), false, None, None),
        Err(Error::AttachmentNotFound(_))
    ));
    assert!(matches!(
        draft.attach(&empty, false, None, None),
        Err(Error::InvalidAttachment { .. })
    ));
    assert!(draft.attachments().is_empty());
    assert_eq!(draft.mail_type(), MailType::Plain);
}

#[test]
fn quoted_printable_lf_message() {
    let config = Config {
        encoding: TransferEncoding::QuotedPrintable,
        newline: Newline::Lf,
        ..Config::default()
    };
    let mut draft = MessageDraft::new(config, Default::default());
    draft
        .to("a@x.com")
        .from("b@y.com", None)
        .body("Привет, мир! ".repeat(12));

    let message = draft.build().unwrap();

    assert_eq!(message.header("Content-Transfer-Encoding"), Some("quoted-printable"));
    assert!(!message.to_string().contains('\r'));
    for line in message.body_block().lines() {
        let text = line.trim_end_matches('=').trim_end();
        assert!(text.len() <= 76, "line too long: {}", line);
        // every escape is complete
        for (index, _) in text.match_indices('=') {
            let escape = &text.as_bytes()[index + 1..];
            assert!(
                escape.len() >= 2 && escape[..2].iter().all(u8::is_ascii_hexdigit),
                "broken escape in {}",
                line
            );
        }
    }
}

#[test]
fn quoted_printable_lines_hold_whole_characters() {
    let text = "Привет".repeat(20);

    for wordwrap in [76, 0] {
        let config = Config {
            encoding: TransferEncoding::QuotedPrintable,
            newline: Newline::Lf,
            wordwrap,
            ..Config::default()
        };
        let mut draft = MessageDraft::new(config, Default::default());
        draft.to("a@x.com").from("b@y.com", None).body(text.as_str());

        let message = draft.build().unwrap();
        let mut decoded = Vec::new();
        for line in message.body_block().lines() {
            let (line, soft) = match line.strip_suffix('=') {
                Some(line) => (line, true),
                None => (line, false),
            };
            assert!(line.len() <= 76, "line too long: {}", line);
            let bytes = quoted_printable::decode(line, ParseMode::Robust).unwrap();
            assert!(std::str::from_utf8(&bytes).is_ok(), "split character in {}", line);
            decoded.extend(bytes);
            if !soft {
                decoded.push(b'\n');
            }
        }
        assert_eq!(String::from_utf8(decoded).unwrap().trim_end(), text);
    }
}
