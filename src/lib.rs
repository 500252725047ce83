//! # ipgate
//!
//! An IP admission filter for HTTP services: classifies each request's
//! client address against whitelist and blocklist rule sets (exact addresses
//! and CIDR ranges, IPv4 and IPv6) and either forwards the request or
//! terminates it with a configurable status code and body.
//!
//! ## Features
//!
//! - Exact-address and CIDR rule sets, IPv4 and IPv6
//! - Whitelist-over-blocklist precedence
//! - Client IP extraction from proxy headers with peer-address fallback
//! - Bounded, TTL-expiring decision cache safe under concurrent access
//! - Fail-open handling for unidentifiable clients
//!
//! ## Architecture
//!
//! The classification engine lives in [`admission`]; the request-time entry
//! point is [`admission::AdmissionFilter`], which implements the
//! [`gateway::Middleware`] seam. The [`gateway`] module supplies a minimal
//! hosting surface (request/response types, middleware chain, tokio
//! HTTP/1.1 server) so the filter runs standalone; embedding it elsewhere
//! only requires driving the middleware trait.

pub mod admission;
pub mod gateway;
