use super::MailboxError;
use idna::domain_to_ascii;
use regex::Regex;
use std::net::IpAddr;

lazy_static! {
    // https://html.spec.whatwg.org/multipage/input.html#valid-e-mail-address
    // Quoted local parts and comments are rejected.
    static ref USER_RE: Regex = Regex::new(r"(?i)^[a-z0-9.!#$%&'*+/=?^_`{|}~-]+\z").unwrap();
    static ref DOMAIN_RE: Regex = Regex::new(
        r"(?i)^[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?)*\z"
    ).unwrap();
    // address literal, RFC 5321 §4.1.3
    static ref LITERAL_RE: Regex = Regex::new(r"(?i)^\[(?:ipv6:)?([a-f0-9:.]+)\]\z").unwrap();
}

/// Local part of an address
pub fn check_user(user: &str) -> Result<(), MailboxError> {
    if USER_RE.is_match(user) {
        Ok(())
    } else {
        Err(MailboxError::InvalidUser)
    }
}

/// Domain part of an address, internationalized names are checked in their punycode form
pub fn check_domain(domain: &str) -> Result<(), MailboxError> {
    if check_domain_ascii(domain) || check_literal(domain) {
        return Ok(());
    }

    match domain_to_ascii(domain) {
        Ok(ascii) if !ascii.is_empty() && check_domain_ascii(&ascii) => Ok(()),
        _ => Err(MailboxError::InvalidDomain),
    }
}

fn check_domain_ascii(domain: &str) -> bool {
    DOMAIN_RE.is_match(domain)
}

fn check_literal(domain: &str) -> bool {
    LITERAL_RE
        .captures(domain)
        .and_then(|caps| caps.get(1))
        .map_or(false, |ip| ip.as_str().parse::<IpAddr>().is_ok())
}
