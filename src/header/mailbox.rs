use super::Header;
use crate::mailbox::{AddressList, Recipient};
use crate::utf8_b;
use std::fmt::{Display, Formatter, Result as FmtResult};

macro_rules! mailbox_header {
    ( $type_name: ident, $header_name: expr ) => {
        #[derive(Debug, Clone, PartialEq)]
        pub struct $type_name(pub Recipient);

        impl Header for $type_name {
            fn header_name() -> &'static str {
                $header_name
            }
        }

        impl Display for $type_name {
            fn fmt(&self, f: &mut Formatter) -> FmtResult {
                fmt_mailboxes(std::slice::from_ref(&self.0), f)
            }
        }
    };
}

macro_rules! mailboxes_header {
    ( $type_name: ident, $header_name: expr ) => {
        #[derive(Debug, Clone, PartialEq)]
        pub struct $type_name(pub AddressList);

        impl Header for $type_name {
            fn header_name() -> &'static str {
                $header_name
            }
        }

        impl Display for $type_name {
            fn fmt(&self, f: &mut Formatter) -> FmtResult {
                fmt_mailboxes(&self.0, f)
            }
        }
    };
}

mailbox_header!(From, "From");
mailboxes_header!(ReplyTo, "Reply-To");

mailboxes_header!(To, "To");
mailboxes_header!(Cc, "Cc");
mailboxes_header!(Bcc, "Bcc");

/// `Return-Path:` header, the bare sender address
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnPath(pub String);

impl Header for ReturnPath {
    fn header_name() -> &'static str {
        "Return-Path"
    }
}

impl Display for ReturnPath {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        f.write_str(&self.0)
    }
}

// RFC 5322 specials which force a quoted display name
const SPECIALS: &[char] = &['(', ')', '<', '>', '[', ']', ':', ';', '@', '\\', ',', '.', '"'];

fn encode_name(name: &str) -> String {
    let encoded = utf8_b::encode(name);
    if encoded != name || !name.contains(SPECIALS) {
        return encoded;
    }
    format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
}

fn fmt_mailboxes<'a, I>(list: I, f: &mut Formatter) -> FmtResult
where
    I: IntoIterator<Item = &'a Recipient>,
{
    for (index, recipient) in list.into_iter().enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        recipient.recode_name(encode_name).fmt(f)?;
    }
    Ok(())
}
