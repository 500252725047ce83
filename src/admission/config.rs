//! Configuration for the admission filter.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::cache::DEFAULT_TTL;
use super::error::{AdmissionError, AdmissionResult};

fn default_status_code() -> u16 {
    403
}

fn default_message() -> String {
    "Access Denied".to_string()
}

fn default_cache_ttl() -> i64 {
    300
}

/// Admission filter configuration.
///
/// Field names are camelCase on the wire. Every field is optional; rule
/// entries are validated individually at load time and invalid ones are
/// skipped rather than failing construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionConfig {
    /// Individually blocked addresses.
    #[serde(default)]
    pub blocked_addresses: Vec<String>,

    /// Blocked CIDR ranges.
    #[serde(default)]
    pub blocked_ranges: Vec<String>,

    /// Individually whitelisted addresses; whitelist beats blocklist.
    #[serde(default)]
    pub whitelist_addresses: Vec<String>,

    /// Whitelisted CIDR ranges.
    #[serde(default)]
    pub whitelist_ranges: Vec<String>,

    /// Status code for rejection responses. Must be within 400-599.
    #[serde(default = "default_status_code")]
    pub status_code: u16,

    /// Rejection body, sent verbatim as text/plain.
    #[serde(default = "default_message")]
    pub message: String,

    /// Cache entry lifetime in seconds; non-positive values fall back to
    /// the default.
    #[serde(default = "default_cache_ttl", rename = "cacheTTLSeconds")]
    pub cache_ttl_seconds: i64,

    /// Gates verbose per-request diagnostics.
    #[serde(default)]
    pub debug_logging: bool,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            blocked_addresses: Vec::new(),
            blocked_ranges: Vec::new(),
            whitelist_addresses: Vec::new(),
            whitelist_ranges: Vec::new(),
            status_code: default_status_code(),
            message: default_message(),
            cache_ttl_seconds: default_cache_ttl(),
            debug_logging: false,
        }
    }
}

impl AdmissionConfig {
    /// Create a configuration with all defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from a raw TOML document.
    pub fn from_toml(raw: &str) -> AdmissionResult<Self> {
        toml::from_str(raw).map_err(|e| AdmissionError::Config(e.to_string()))
    }

    /// Add a blocked address.
    #[must_use]
    pub fn block_address(mut self, addr: impl Into<String>) -> Self {
        self.blocked_addresses.push(addr.into());
        self
    }

    /// Add a blocked CIDR range.
    #[must_use]
    pub fn block_range(mut self, range: impl Into<String>) -> Self {
        self.blocked_ranges.push(range.into());
        self
    }

    /// Add a whitelisted address.
    #[must_use]
    pub fn whitelist_address(mut self, addr: impl Into<String>) -> Self {
        self.whitelist_addresses.push(addr.into());
        self
    }

    /// Add a whitelisted CIDR range.
    #[must_use]
    pub fn whitelist_range(mut self, range: impl Into<String>) -> Self {
        self.whitelist_ranges.push(range.into());
        self
    }

    /// Set the rejection status code.
    #[must_use]
    pub fn with_status_code(mut self, code: u16) -> Self {
        self.status_code = code;
        self
    }

    /// Set the rejection message body.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Set the cache TTL in seconds.
    #[must_use]
    pub fn with_cache_ttl(mut self, seconds: i64) -> Self {
        self.cache_ttl_seconds = seconds;
        self
    }

    /// Enable or disable verbose per-request diagnostics.
    #[must_use]
    pub fn with_debug_logging(mut self, enabled: bool) -> Self {
        self.debug_logging = enabled;
        self
    }

    /// Validate the configuration.
    ///
    /// Only the status code is fatal; rule entries are checked entry by
    /// entry during rule-set construction.
    pub fn validate(&self) -> AdmissionResult<()> {
        if !(400..=599).contains(&self.status_code) {
            return Err(AdmissionError::InvalidStatusCode(self.status_code));
        }
        Ok(())
    }

    /// Effective cache TTL, with non-positive values replaced by the default.
    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        if self.cache_ttl_seconds <= 0 {
            DEFAULT_TTL
        } else {
            Duration::from_secs(self.cache_ttl_seconds as u64)
        }
    }
}
