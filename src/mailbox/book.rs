use super::{AddressList, MailboxError, Recipient};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Address list of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    To,
    Cc,
    Bcc,
    ReplyTo,
}

impl Role {
    /// Lists which receive the message and are checked on validation
    pub const RECIPIENTS: [Role; 3] = [Role::To, Role::Cc, Role::Bcc];

    pub const ALL: [Role; 4] = [Role::To, Role::Cc, Role::Bcc, Role::ReplyTo];
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        f.write_str(match *self {
            Role::To => "to",
            Role::Cc => "cc",
            Role::Bcc => "bcc",
            Role::ReplyTo => "reply_to",
        })
    }
}

/// Anything which can be added to an address list
///
/// A bare string is an address without a name, a pair is an address with a
/// name. Lists of either add every entry in order.
pub trait IntoRecipients {
    fn into_recipients(self) -> Vec<Recipient>;
}

impl IntoRecipients for Recipient {
    fn into_recipients(self) -> Vec<Recipient> {
        vec![self]
    }
}

impl IntoRecipients for &str {
    fn into_recipients(self) -> Vec<Recipient> {
        vec![Recipient::new(self, None)]
    }
}

impl IntoRecipients for String {
    fn into_recipients(self) -> Vec<Recipient> {
        vec![Recipient::new(self, None)]
    }
}

impl IntoRecipients for (&str, &str) {
    fn into_recipients(self) -> Vec<Recipient> {
        vec![Recipient::new(self.0, Some(self.1.into()))]
    }
}

impl IntoRecipients for (String, String) {
    fn into_recipients(self) -> Vec<Recipient> {
        vec![Recipient::new(self.0, Some(self.1))]
    }
}

impl IntoRecipients for (&str, Option<&str>) {
    fn into_recipients(self) -> Vec<Recipient> {
        vec![Recipient::new(self.0, self.1.map(Into::into))]
    }
}

impl<T: IntoRecipients> IntoRecipients for Vec<T> {
    fn into_recipients(self) -> Vec<Recipient> {
        self.into_iter().flat_map(IntoRecipients::into_recipients).collect()
    }
}

impl<T: IntoRecipients, const N: usize> IntoRecipients for [T; N] {
    fn into_recipients(self) -> Vec<Recipient> {
        self.into_iter().flat_map(IntoRecipients::into_recipients).collect()
    }
}

/// Recipient which failed address validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidRecipient {
    pub role: Role,
    pub recipient: Recipient,
    pub error: MailboxError,
}

impl Display for InvalidRecipient {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{}: {} ({})", self.role, self.recipient, self.error)
    }
}

/// The `To`, `Cc`, `Bcc` and `Reply-To` lists of a message
#[derive(Debug, Clone, Default)]
pub struct AddressBook {
    to: AddressList,
    cc: AddressList,
    bcc: AddressList,
    reply_to: AddressList,
}

impl AddressBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list(&self, role: Role) -> &AddressList {
        match role {
            Role::To => &self.to,
            Role::Cc => &self.cc,
            Role::Bcc => &self.bcc,
            Role::ReplyTo => &self.reply_to,
        }
    }

    fn list_mut(&mut self, role: Role) -> &mut AddressList {
        match role {
            Role::To => &mut self.to,
            Role::Cc => &mut self.cc,
            Role::Bcc => &mut self.bcc,
            Role::ReplyTo => &mut self.reply_to,
        }
    }

    /// Add one or more recipients to a list
    pub fn add<R: IntoRecipients>(&mut self, role: Role, recipients: R) {
        self.list_mut(role).extend(recipients.into_recipients());
    }

    /// Empty the given lists, the others are untouched
    pub fn clear(&mut self, roles: &[Role]) {
        for role in roles {
            self.list_mut(*role).clear();
        }
    }

    /// Whether anybody receives the message
    pub fn has_recipients(&self) -> bool {
        Role::RECIPIENTS.iter().any(|role| !self.list(*role).is_empty())
    }

    /// Check the address syntax of every recipient
    ///
    /// Reply-To addresses are not checked. All failures are collected.
    pub fn validate(&self) -> Result<(), Vec<InvalidRecipient>> {
        let failed: Vec<_> = Role::RECIPIENTS
            .iter()
            .flat_map(|role| {
                self.list(*role).iter().filter_map(move |recipient| {
                    recipient.address().err().map(|error| InvalidRecipient {
                        role: *role,
                        recipient: recipient.clone(),
                        error,
                    })
                })
            })
            .collect();

        if failed.is_empty() {
            Ok(())
        } else {
            Err(failed)
        }
    }
}

#[cfg(test)]
mod test {
    use super::{AddressBook, Role};
    use crate::mailbox::{MailboxError, Recipient};
    use pretty_assertions::assert_eq;

    #[test]
    fn add_single_pair_and_lists() {
        let mut book = AddressBook::new();
        book.add(Role::To, "a@x.com");
        book.add(Role::To, ("b@x.com", "Bob"));
        book.add(Role::Cc, vec!["c@x.com", "d@x.com"]);
        book.add(Role::Bcc, [("e@x.com", Some("Eve")), ("f@x.com", None)]);

        assert_eq!(book.list(Role::To).to_string(), "a@x.com, Bob <b@x.com>");
        assert_eq!(book.list(Role::Cc).to_string(), "c@x.com, d@x.com");
        assert_eq!(book.list(Role::Bcc).to_string(), "Eve <e@x.com>, f@x.com");
        assert!(book.list(Role::ReplyTo).is_empty());
    }

    #[test]
    fn re_adding_overwrites_name() {
        let mut book = AddressBook::new();
        book.add(Role::To, ("a@x.com", "Old"));
        book.add(Role::To, ("A@x.com", "New"));

        assert_eq!(book.list(Role::To).len(), 1);
        assert_eq!(book.list(Role::To).to_string(), "New <a@x.com>");
    }

    #[test]
    fn clear_keeps_other_lists() {
        let mut book = AddressBook::new();
        book.add(Role::To, "a@x.com");
        book.add(Role::Cc, "b@x.com");
        book.add(Role::ReplyTo, "c@x.com");

        book.clear(&[Role::To, Role::Cc]);

        assert!(!book.has_recipients());
        assert_eq!(book.list(Role::ReplyTo).len(), 1);
    }

    #[test]
    fn validate_collects_every_failure() {
        let mut book = AddressBook::new();
        book.add(Role::To, vec!["user@example.com", "not-an-email"]);
        book.add(Role::Bcc, "bad address@example.com");
        book.add(Role::ReplyTo, "also-not-an-email");

        let failed = book.validate().unwrap_err();

        assert_eq!(failed.len(), 2);
        assert_eq!(failed[0].role, Role::To);
        assert_eq!(failed[0].recipient, Recipient::new("not-an-email", None));
        assert_eq!(failed[0].error, MailboxError::MissingParts);
        assert_eq!(failed[1].role, Role::Bcc);
        assert_eq!(failed[1].error, MailboxError::InvalidUser);

        // validation never touches the lists
        assert_eq!(book.list(Role::To).len(), 2);
    }

    #[test]
    fn validate_success() {
        let mut book = AddressBook::new();
        book.add(Role::To, "user@example.com");
        book.add(Role::Cc, ("other@пример.рф", "Ünïcode Name"));

        assert_eq!(book.validate(), Ok(()));
    }
}
