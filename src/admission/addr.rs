//! Textual IP address and CIDR validation.

use ipnet::IpNet;
use std::net::IpAddr;

/// Address family of a textual IP value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddrFamily {
    /// IPv4 address.
    V4,
    /// IPv6 address.
    V6,
    /// Not a valid address.
    Invalid,
}

/// Parse a textual IP address, tolerating surrounding whitespace.
///
/// Returns `None` for empty, whitespace-only, or unparseable input. This is
/// the single entry point through which addresses reach the rule sets and the
/// cache, so nothing unvalidated is ever stored.
pub(crate) fn parse_address(text: &str) -> Option<IpAddr> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse().ok()
}

/// Parse a textual CIDR range, tolerating surrounding whitespace.
///
/// Host bits in the literal are accepted and masked during containment
/// checks; an out-of-range prefix length fails the parse.
pub(crate) fn parse_range(text: &str) -> Option<IpNet> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse().ok()
}

/// Check whether `text` is a syntactically valid IPv4 or IPv6 address.
#[must_use]
pub fn is_valid_address(text: &str) -> bool {
    parse_address(text).is_some()
}

/// Check whether `text` is a syntactically valid CIDR range.
#[must_use]
pub fn is_valid_range(text: &str) -> bool {
    parse_range(text).is_some()
}

/// Classify a textual address by family.
#[must_use]
pub fn address_family(text: &str) -> AddrFamily {
    match parse_address(text) {
        Some(IpAddr::V4(_)) => AddrFamily::V4,
        Some(IpAddr::V6(_)) => AddrFamily::V6,
        None => AddrFamily::Invalid,
    }
}
