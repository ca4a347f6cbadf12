use super::check::{check_domain, check_user};
use crate::utf8_b;
use std::fmt::{Display, Formatter, Result as FmtResult, Write};
use std::slice::Iter;
use std::str::FromStr;

/// Email address
///
/// This type contains a syntactically valid email in canonical form (_user@domain.tld_).
#[derive(Debug, Clone, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub struct Address {
    /// User part
    pub user: String,

    /// Domain part
    pub domain: String,
}

impl Address {
    /// Create email address from parts
    #[inline]
    pub fn new<U: Into<String>, D: Into<String>>(user: U, domain: D) -> Self {
        Address {
            user: user.into(),
            domain: domain.into(),
        }
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        f.write_str(&self.user)?;
        f.write_char('@')?;
        f.write_str(&self.domain)
    }
}

impl FromStr for Address {
    type Err = MailboxError;

    fn from_str(val: &str) -> Result<Self, MailboxError> {
        let (user, domain) = val.rsplit_once('@').ok_or(MailboxError::MissingParts)?;

        if user.is_empty() || domain.is_empty() {
            return Err(MailboxError::MissingParts);
        }

        check_user(user)?;
        check_domain(domain)?;

        Ok(Address::new(user, domain))
    }
}

/// Message recipient or sender
///
/// The email is stored as given, its syntax is only checked by
/// [`Recipient::address`] (and so by address book validation).
///
/// **NOTE**: Enable feature "serde" to be able serialize/deserialize it using [serde](https://serde.rs/).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Recipient {
    pub email: String,
    pub name: Option<String>,
}

impl Recipient {
    #[inline]
    pub fn new<E: Into<String>>(email: E, name: Option<String>) -> Self {
        Recipient {
            email: email.into(),
            name,
        }
    }

    /// Identity of the recipient within an address list
    pub fn key(&self) -> String {
        self.email.to_lowercase()
    }

    /// Parse and check the email address
    pub fn address(&self) -> Result<Address, MailboxError> {
        self.email.parse()
    }

    /// Name if present and not blank
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|name| !name.is_empty())
    }

    /// Whether the email can be written into a header line as is
    pub fn is_header_safe(&self) -> bool {
        !self.email.contains(char::is_control)
    }

    /// Domain of the email including the `@`, used for message ids
    pub fn domain_part(&self) -> &str {
        self.email.rfind('@').map_or("", |at| &self.email[at..])
    }

    /// Encode recipient name using function
    pub(crate) fn recode_name<F>(&self, f: F) -> Self
    where
        F: FnOnce(&str) -> String,
    {
        Recipient::new(self.email.clone(), self.display_name().map(f))
    }
}

impl Display for Recipient {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        if let Some(name) = self.display_name() {
            f.write_str(name)?;
            f.write_str(" <")?;
            f.write_str(&self.email)?;
            return f.write_char('>');
        }
        f.write_str(&self.email)
    }
}

impl FromStr for Recipient {
    type Err = MailboxError;

    fn from_str(src: &str) -> Result<Recipient, Self::Err> {
        match (src.find('<'), src.rfind('>')) {
            (Some(addr_open), Some(addr_close)) if addr_open < addr_close => {
                let email = src[addr_open + 1..addr_close].trim();
                if email.is_empty() {
                    return Err(MailboxError::MissingParts);
                }
                let name = src[..addr_open].trim().trim_matches('"');
                let name = if name.is_empty() {
                    None
                } else {
                    Some(utf8_b::decode(name).ok_or(MailboxError::InvalidUtf8b)?)
                };
                Ok(Recipient::new(email, name))
            }
            (Some(_), _) | (_, Some(_)) => Err(MailboxError::Unbalanced),
            _ => {
                let email = src.trim();
                if email.is_empty() {
                    Err(MailboxError::MissingParts)
                } else {
                    Ok(Recipient::new(email, None))
                }
            }
        }
    }
}

/// Insertion ordered list of recipients without duplicates
///
/// Recipients are identified by the lower-cased email, adding a known
/// recipient again replaces its name and keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressList(Vec<Recipient>);

impl AddressList {
    #[inline]
    pub fn new() -> Self {
        AddressList(Vec::new())
    }

    /// Add recipient or update the name of a known one
    pub fn push(&mut self, recipient: Recipient) {
        let key = recipient.key();
        match self.0.iter_mut().find(|known| known.key() == key) {
            Some(known) => known.name = recipient.name,
            None => self.0.push(recipient),
        }
    }

    /// Find recipient by email, case-insensitive
    pub fn get(&self, email: &str) -> Option<&Recipient> {
        let key = email.to_lowercase();
        self.0.iter().find(|known| known.key() == key)
    }

    #[inline]
    pub fn clear(&mut self) {
        self.0.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> Iter<Recipient> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a AddressList {
    type Item = &'a Recipient;
    type IntoIter = Iter<'a, Recipient>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Extend<Recipient> for AddressList {
    fn extend<T: IntoIterator<Item = Recipient>>(&mut self, iter: T) {
        for recipient in iter {
            self.push(recipient);
        }
    }
}

impl FromIterator<Recipient> for AddressList {
    fn from_iter<T: IntoIterator<Item = Recipient>>(iter: T) -> Self {
        let mut list = AddressList::new();
        list.extend(iter);
        list
    }
}

impl Display for AddressList {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        let mut iter = self.iter();

        if let Some(recipient) = iter.next() {
            recipient.fmt(f)?;

            for recipient in iter {
                f.write_str(", ")?;
                recipient.fmt(f)?;
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MailboxError {
    #[error("Missing domain or user")]
    MissingParts,
    #[error("Unbalanced angle bracket")]
    Unbalanced,
    #[error("Invalid email user")]
    InvalidUser,
    #[error("Invalid email domain")]
    InvalidDomain,
    #[error("Invalid UTF8b data")]
    InvalidUtf8b,
}

#[cfg(test)]
mod test {
    use super::{Address, AddressList, MailboxError, Recipient};
    use pretty_assertions::assert_eq;

    #[test]
    fn recipient_format_address_only() {
        assert_eq!(format!("{}", Recipient::new("kayo@example.com", None)), "kayo@example.com");
    }

    #[test]
    fn recipient_format_address_with_name() {
        assert_eq!(
            format!("{}", Recipient::new("kayo@example.com", Some("K.".into()))),
            "K. <kayo@example.com>"
        );
    }

    #[test]
    fn format_address_with_blank_name() {
        assert_eq!(
            format!("{}", Recipient::new("kayo@example.com", Some("  ".into()))),
            "kayo@example.com"
        );
        assert_eq!(
            format!("{}", Recipient::new("kayo@example.com", Some(" K. ".into()))),
            "K. <kayo@example.com>"
        );
    }

    #[test]
    fn parse_recipient() {
        assert_eq!("kayo@example.com".parse(), Ok(Recipient::new("kayo@example.com", None)));
        assert_eq!(
            "K. <kayo@example.com>".parse(),
            Ok(Recipient::new("kayo@example.com", Some("K.".into())))
        );
        assert_eq!(" <kayo@example.com>".parse(), Ok(Recipient::new("kayo@example.com", None)));
        assert_eq!(
            "=?utf-8?b?0JrQsNC4?= <kayo@example.com>".parse(),
            Ok(Recipient::new("kayo@example.com", Some("Каи".into())))
        );
        assert_eq!("K. <kayo@example.com".parse::<Recipient>(), Err(MailboxError::Unbalanced));
        assert_eq!("".parse::<Recipient>(), Err(MailboxError::MissingParts));
    }

    #[test]
    fn parse_address() {
        assert_eq!("user@example.com".parse(), Ok(Address::new("user", "example.com")));
        assert_eq!("not-an-email".parse::<Address>(), Err(MailboxError::MissingParts));
        assert_eq!("@example.com".parse::<Address>(), Err(MailboxError::MissingParts));
        assert_eq!("a b@example.com".parse::<Address>(), Err(MailboxError::InvalidUser));
        assert_eq!("user@exa_mple.com".parse::<Address>(), Err(MailboxError::InvalidDomain));
    }

    #[test]
    fn header_safe_email() {
        assert!(Recipient::new("b@y.com", Some("Line\nbreak".into())).is_header_safe());
        assert!(!Recipient::new("b@y.com\r\nBcc: c@z.com", None).is_header_safe());
        assert!(!Recipient::new("b@y.com\t", None).is_header_safe());
    }

    #[test]
    fn domain_part() {
        assert_eq!(Recipient::new("b@y.com", None).domain_part(), "@y.com");
        assert_eq!(Recipient::new("nobody", None).domain_part(), "");
    }

    #[test]
    fn list_dedup_overwrites_name() {
        let mut list = AddressList::new();
        list.push(Recipient::new("a@x.com", None));
        list.push(Recipient::new("b@x.com", None));
        list.push(Recipient::new("A@X.com", Some("Alice".into())));

        assert_eq!(list.len(), 2);
        assert_eq!(list.to_string(), "Alice <a@x.com>, b@x.com");
        assert_eq!(list.get("A@x.COM").and_then(|r| r.name.as_deref()), Some("Alice"));
    }
}
