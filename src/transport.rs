//! Delivery seam and the outcome of a send.

use crate::mailbox::InvalidRecipient;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Hands a composed message over for delivery
///
/// Any `Fn(to, subject, body, headers, envelope_from) -> bool` closure is a
/// transport. Retries and timeouts belong to the implementation.
pub trait Transport {
    /// Deliver the message, `false` when it was refused
    ///
    /// `to` is the formatted `To` list, `subject` the unencoded subject,
    /// `headers` the header block without the terminating blank line.
    fn send(&self, to: &str, subject: &str, body: &str, headers: &str, envelope_from: &str) -> bool;
}

impl<F> Transport for F
where
    F: Fn(&str, &str, &str, &str, &str) -> bool,
{
    fn send(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        headers: &str,
        envelope_from: &str,
    ) -> bool {
        self(to, subject, body, headers, envelope_from)
    }
}

/// Result of a send which got past the preconditions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// The transport accepted the message
    Sent,
    /// Some recipient addresses are malformed, nothing was sent
    FailedValidation(Vec<InvalidRecipient>),
    /// The transport refused the message
    FailedSend,
}

impl SendOutcome {
    #[inline]
    pub fn is_sent(&self) -> bool {
        matches!(self, SendOutcome::Sent)
    }
}

impl Display for SendOutcome {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            SendOutcome::Sent => f.write_str("sent"),
            SendOutcome::FailedValidation(failed) => {
                write!(f, "validation failed for {} recipient(s)", failed.len())
            }
            SendOutcome::FailedSend => f.write_str("transport failed"),
        }
    }
}

/// Stages of the send pipeline, reported in logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendState {
    Draft,
    Validated,
    Built,
    Sent,
    Failed,
}

impl Display for SendState {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        f.write_str(match self {
            SendState::Draft => "draft",
            SendState::Validated => "validated",
            SendState::Built => "built",
            SendState::Sent => "sent",
            SendState::Failed => "failed",
        })
    }
}
