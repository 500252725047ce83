//! Client IP resolution from request headers and peer address.
//!
//! Header values are trusted only syntactically. The leftmost
//! `X-Forwarded-For` entry is treated as the originating client, which a
//! client can spoof unless upstream proxies are trusted to append; deploying
//! operators own that trust boundary.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use super::addr;

/// Determine the best-guess originating address for a request.
///
/// Header names are expected lowercase, as normalized by
/// [`crate::gateway::Request`]. Resolution order, first success wins:
/// `x-forwarded-for` (first valid comma-separated segment), `x-real-ip`,
/// `cf-connecting-ip`, then the raw peer address. Returns `None` when
/// nothing validates; the filter fails open in that case.
#[must_use]
pub fn resolve_client_ip(
    headers: &HashMap<String, String>,
    peer_addr: Option<&str>,
) -> Option<IpAddr> {
    if let Some(xff) = headers.get("x-forwarded-for") {
        for segment in xff.split(',') {
            if let Some(ip) = addr::parse_address(segment) {
                return Some(ip);
            }
        }
    }

    if let Some(value) = headers.get("x-real-ip") {
        if let Some(ip) = addr::parse_address(value) {
            return Some(ip);
        }
    }

    if let Some(value) = headers.get("cf-connecting-ip") {
        if let Some(ip) = addr::parse_address(value) {
            return Some(ip);
        }
    }

    peer_ip(peer_addr?)
}

/// Extract the host address from a raw peer value, which may carry a port.
fn peer_ip(raw: &str) -> Option<IpAddr> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    // "1.2.3.4:80" and "[::1]:80" both parse as socket addresses.
    if let Ok(sock) = trimmed.parse::<SocketAddr>() {
        return Some(sock.ip());
    }

    // Bare address, possibly bracketed.
    let bare = trimmed.trim_matches(|c| c == '[' || c == ']');
    if let Some(ip) = addr::parse_address(bare) {
        return Some(ip);
    }

    // Host with a non-numeric or missing port after the last colon.
    let (host, _) = trimmed.rsplit_once(':')?;
    addr::parse_address(host.trim_matches(|c| c == '[' || c == ']'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn test_forwarded_for_first_valid_segment() {
        let h = headers(&[("x-forwarded-for", "203.0.113.50, 10.0.0.1")]);
        assert_eq!(resolve_client_ip(&h, Some("10.0.0.1:1234")), Some(ip("203.0.113.50")));
    }

    #[test]
    fn test_forwarded_for_skips_invalid_segments() {
        let h = headers(&[("x-forwarded-for", "unknown, 203.0.113.50")]);
        assert_eq!(resolve_client_ip(&h, None), Some(ip("203.0.113.50")));
    }

    #[test]
    fn test_header_precedence() {
        let h = headers(&[
            ("x-forwarded-for", "203.0.113.50"),
            ("x-real-ip", "198.51.100.7"),
            ("cf-connecting-ip", "192.0.2.9"),
        ]);
        assert_eq!(resolve_client_ip(&h, Some("10.0.0.1:1234")), Some(ip("203.0.113.50")));

        let h = headers(&[
            ("x-real-ip", "198.51.100.7"),
            ("cf-connecting-ip", "192.0.2.9"),
        ]);
        assert_eq!(resolve_client_ip(&h, None), Some(ip("198.51.100.7")));

        let h = headers(&[("cf-connecting-ip", "192.0.2.9")]);
        assert_eq!(resolve_client_ip(&h, None), Some(ip("192.0.2.9")));
    }

    #[test]
    fn test_invalid_headers_fall_through_to_peer() {
        let h = headers(&[
            ("x-forwarded-for", "not-an-ip"),
            ("x-real-ip", ""),
        ]);
        assert_eq!(resolve_client_ip(&h, Some("10.0.0.1:1234")), Some(ip("10.0.0.1")));
    }

    #[test]
    fn test_peer_with_port() {
        let h = HashMap::new();
        assert_eq!(resolve_client_ip(&h, Some("192.168.1.50:1234")), Some(ip("192.168.1.50")));
    }

    #[test]
    fn test_peer_ipv6_bracketed() {
        let h = HashMap::new();
        assert_eq!(
            resolve_client_ip(&h, Some("[2001:db8::1]:12345")),
            Some(ip("2001:db8::1"))
        );
        assert_eq!(resolve_client_ip(&h, Some("[2001:db8::1]")), Some(ip("2001:db8::1")));
    }

    #[test]
    fn test_peer_without_port() {
        let h = HashMap::new();
        assert_eq!(resolve_client_ip(&h, Some("192.168.1.50")), Some(ip("192.168.1.50")));
        assert_eq!(resolve_client_ip(&h, Some("2001:db8::1")), Some(ip("2001:db8::1")));
    }

    #[test]
    fn test_unresolvable() {
        let h = HashMap::new();
        assert_eq!(resolve_client_ip(&h, None), None);
        assert_eq!(resolve_client_ip(&h, Some("")), None);
        assert_eq!(resolve_client_ip(&h, Some("garbage")), None);
        assert_eq!(resolve_client_ip(&h, Some("foo:bar")), None);
    }
}
