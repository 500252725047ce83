//! Classification outcome for a client address.

/// Outcome of evaluating a client address against the rule sets.
///
/// Exactly three values exist; the filter maps `Allowed` and `Whitelisted`
/// to forwarding and `Blocked` to the rejection response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    /// Matched neither list; forwarded by default.
    Allowed,

    /// Matched the blocklist and not the whitelist; rejected.
    Blocked,

    /// Matched the whitelist; forwarded regardless of the blocklist.
    Whitelisted,
}

impl Decision {
    /// Whether this decision lets the request through to the downstream
    /// handler.
    #[must_use]
    pub fn permits(&self) -> bool {
        matches!(self, Self::Allowed | Self::Whitelisted)
    }

    /// Stable lowercase label for logging.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allowed => "allowed",
            Self::Blocked => "blocked",
            Self::Whitelisted => "whitelisted",
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
