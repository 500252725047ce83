//! Rule sets for exact-address and CIDR-range membership.

use ipnet::IpNet;
use std::collections::HashSet;
use std::net::IpAddr;
use tracing::warn;

use super::addr;

/// An immutable-after-load set of addresses and CIDR ranges.
///
/// Built once from raw configuration strings; read-only afterwards, so it is
/// shared across request-handling tasks without synchronization. Two
/// independent instances exist per filter: one blocklist, one whitelist.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    /// Individually listed addresses, keyed by parsed value.
    exact: HashSet<IpAddr>,

    /// CIDR ranges in configuration order.
    ranges: Vec<IpNet>,
}

impl RuleSet {
    /// Build a rule set from raw address and CIDR strings.
    ///
    /// Each entry is validated independently. Empty entries are ignored;
    /// invalid ones are skipped with a warning so a partially-bad
    /// configuration still loads. Construction never fails.
    #[must_use]
    pub fn from_entries(addresses: &[String], ranges: &[String]) -> Self {
        let mut exact = HashSet::with_capacity(addresses.len());
        for raw in addresses {
            if raw.trim().is_empty() {
                continue;
            }
            match addr::parse_address(raw) {
                Some(ip) => {
                    exact.insert(ip);
                },
                None => warn!(entry = %raw, "skipping invalid address entry"),
            }
        }

        let mut parsed_ranges = Vec::with_capacity(ranges.len());
        for raw in ranges {
            if raw.trim().is_empty() {
                continue;
            }
            match addr::parse_range(raw) {
                Some(net) => parsed_ranges.push(net),
                None => warn!(entry = %raw, "skipping invalid CIDR entry"),
            }
        }

        Self {
            exact,
            ranges: parsed_ranges,
        }
    }

    /// Check whether the address matches the exact set or any range.
    ///
    /// Exact membership is O(1); ranges are scanned in configuration order
    /// and the scan stops at the first match.
    #[must_use]
    pub fn contains(&self, ip: IpAddr) -> bool {
        if self.exact.contains(&ip) {
            return true;
        }
        self.ranges.iter().any(|net| net.contains(&ip))
    }

    /// Number of loaded entries (exact addresses + ranges).
    #[must_use]
    pub fn len(&self) -> usize {
        self.exact.len() + self.ranges.len()
    }

    /// Whether the rule set holds no entries at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.ranges.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn test_exact_match() {
        let rules = RuleSet::from_entries(&strings(&["192.168.1.100", "::1"]), &[]);

        assert!(rules.contains(ip("192.168.1.100")));
        assert!(rules.contains(ip("::1")));
        assert!(!rules.contains(ip("192.168.1.101")));
    }

    #[test]
    fn test_range_match() {
        let rules = RuleSet::from_entries(&[], &strings(&["192.168.0.0/16", "2001:db8::/32"]));

        assert!(rules.contains(ip("192.168.1.50")));
        assert!(rules.contains(ip("192.168.255.255")));
        assert!(rules.contains(ip("2001:db8::1")));
        assert!(!rules.contains(ip("10.0.0.1")));
        assert!(!rules.contains(ip("2001:db9::1")));
    }

    #[test]
    fn test_exact_match_is_canonical() {
        // Textual variants of the same address compare equal once parsed.
        let rules = RuleSet::from_entries(&strings(&["2001:DB8::1"]), &[]);
        assert!(rules.contains(ip("2001:db8::1")));
    }

    #[test]
    fn test_overlapping_ranges() {
        let rules = RuleSet::from_entries(&[], &strings(&["10.0.0.0/8", "10.1.0.0/16"]));
        assert!(rules.contains(ip("10.1.2.3")));
    }

    #[test]
    fn test_invalid_entries_skipped() {
        let rules = RuleSet::from_entries(
            &strings(&["not-an-ip", "192.168.1.1", ""]),
            &strings(&["10.0.0.0/99", "10.0.0.0/8", "garbage"]),
        );

        assert_eq!(rules.len(), 2);
        assert!(rules.contains(ip("192.168.1.1")));
        assert!(rules.contains(ip("10.1.2.3")));
    }

    #[test]
    fn test_family_mismatch() {
        let rules = RuleSet::from_entries(&[], &strings(&["192.168.0.0/16"]));
        assert!(!rules.contains(ip("2001:db8::1")));
    }

    #[test]
    fn test_empty_rule_set() {
        let rules = RuleSet::from_entries(&[], &[]);
        assert!(rules.is_empty());
        assert!(!rules.contains(ip("192.168.1.1")));
    }

    #[test]
    fn test_match_all_range() {
        let rules = RuleSet::from_entries(&[], &strings(&["0.0.0.0/0"]));
        assert!(rules.contains(ip("1.2.3.4")));
        assert!(rules.contains(ip("255.255.255.255")));
    }
}
