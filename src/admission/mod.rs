//! # Admission Module
//!
//! IP-based request admission for ipgate. The engine classifies a client
//! address against whitelist and blocklist rule sets (exact addresses and
//! CIDR ranges, IPv4 and IPv6) and decides whether the request is forwarded
//! downstream or answered with a configurable rejection.
//!
//! ## Decision policy
//!
//! Whitelist membership always wins, then blocklist membership, then
//! default-allow. Classifications are cached per address with a TTL; a
//! client that cannot be identified is forwarded (fail-open).
//!
//! ## Usage
//!
//! ```ignore
//! use ipgate::admission::{AdmissionConfig, AdmissionFilter};
//!
//! let config = AdmissionConfig::new()
//!     .block_range("203.0.113.0/24")
//!     .whitelist_address("203.0.113.7");
//! let filter = AdmissionFilter::new(config, "edge")?;
//! chain.add(std::sync::Arc::new(filter));
//! ```

mod addr;
mod cache;
mod config;
mod decision;
mod error;
mod filter;
mod resolver;
mod rules;

pub use addr::{address_family, is_valid_address, is_valid_range, AddrFamily};
pub use cache::{DecisionCache, DEFAULT_CACHE_CAPACITY, DEFAULT_TTL};
pub use config::AdmissionConfig;
pub use decision::Decision;
pub use error::{AdmissionError, AdmissionResult};
pub use filter::{AdmissionFilter, AdmissionStats};
pub use resolver::resolve_client_ip;
pub use rules::RuleSet;
