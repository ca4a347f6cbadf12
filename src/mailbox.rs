//! Addresses, recipient lists and their validation.

mod book;
mod check;
#[cfg(feature = "serde")]
mod serde;
mod types;

pub use self::book::{AddressBook, IntoRecipients, InvalidRecipient, Role};
pub use self::types::{Address, AddressList, MailboxError, Recipient};
