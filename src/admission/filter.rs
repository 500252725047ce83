//! Admission filter: per-request resolve/classify/decide orchestration.

use bytes::Bytes;
use http::StatusCode;
use std::net::IpAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use super::cache::{DecisionCache, DEFAULT_CACHE_CAPACITY};
use super::config::AdmissionConfig;
use super::decision::Decision;
use super::error::{AdmissionError, AdmissionResult};
use super::resolver;
use super::rules::RuleSet;
use crate::gateway::{HttpResult, Middleware, MiddlewareAction, Request, Response};

/// Counters for admission decisions.
#[derive(Debug, Default)]
pub struct AdmissionStats {
    /// Requests seen by the filter.
    pub requests_checked: AtomicU64,
    /// Requests passed to the downstream handler.
    pub requests_forwarded: AtomicU64,
    /// Requests answered with the rejection response.
    pub requests_rejected: AtomicU64,
    /// Classifications served from the cache.
    pub cache_hits: AtomicU64,
    /// Requests with no resolvable client address (forwarded fail-open).
    pub unresolved_clients: AtomicU64,
}

impl AdmissionStats {
    /// Create new stats.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// IP admission filter.
///
/// Holds the two rule sets, the decision cache, and the prebuilt rejection
/// payload. Each instance owns its cache, so separately configured filters
/// never interfere. The per-request entry point is [`Middleware::before`];
/// [`classify`](Self::classify) exposes the engine directly for hosts that
/// resolve the client address themselves.
pub struct AdmissionFilter {
    /// Instance name for diagnostics.
    name: String,

    /// Whitelist rules, checked first.
    whitelist: RuleSet,

    /// Blocklist rules.
    blocklist: RuleSet,

    /// TTL cache of prior classifications.
    cache: DecisionCache,

    /// Rejection status code.
    status: StatusCode,

    /// Rejection body bytes.
    body: Bytes,

    /// Verbose per-request diagnostics.
    debug: bool,

    /// Decision counters.
    stats: Arc<AdmissionStats>,
}

impl std::fmt::Debug for AdmissionFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdmissionFilter")
            .field("name", &self.name)
            .field("whitelist_entries", &self.whitelist.len())
            .field("blocklist_entries", &self.blocklist.len())
            .field("status", &self.status)
            .field("debug", &self.debug)
            .finish()
    }
}

impl AdmissionFilter {
    /// Build a filter from its configuration.
    ///
    /// Fails only for an out-of-range rejection status code. Malformed rule
    /// entries are skipped during rule-set construction; an empty message
    /// falls back to the default body.
    pub fn new(config: AdmissionConfig, name: impl Into<String>) -> AdmissionResult<Self> {
        let name = name.into();
        config.validate()?;

        let status = StatusCode::from_u16(config.status_code)
            .map_err(|_| AdmissionError::InvalidStatusCode(config.status_code))?;

        let message = if config.message.is_empty() {
            "Access Denied".to_string()
        } else {
            config.message.clone()
        };

        let whitelist =
            RuleSet::from_entries(&config.whitelist_addresses, &config.whitelist_ranges);
        let blocklist = RuleSet::from_entries(&config.blocked_addresses, &config.blocked_ranges);
        let cache = DecisionCache::new(config.cache_ttl(), DEFAULT_CACHE_CAPACITY);

        info!(
            filter = %name,
            blocklist_entries = blocklist.len(),
            whitelist_entries = whitelist.len(),
            status = status.as_u16(),
            cache_ttl_secs = cache.ttl().as_secs(),
            "admission filter initialized"
        );

        Ok(Self {
            name,
            whitelist,
            blocklist,
            cache,
            status,
            body: Bytes::from(message),
            debug: config.debug_logging,
            stats: Arc::new(AdmissionStats::new()),
        })
    }

    /// Classify a client address.
    ///
    /// A fresh cached decision short-circuits rule evaluation; otherwise the
    /// whitelist is consulted before the blocklist (whitelist always wins,
    /// so operators can punch holes through broad CIDR bans) and the outcome
    /// is recorded. The default `Allowed` is recorded too, which keeps the
    /// cache bounded by distinct-client cardinality rather than by rule
    /// matches.
    pub fn classify(&self, ip: IpAddr) -> Decision {
        if let Some(cached) = self.cache.lookup(&ip) {
            self.stats.cache_hits.fetch_add(1, Ordering::Relaxed);
            if self.debug {
                debug!(filter = %self.name, client = %ip, decision = %cached, "cache hit");
            }
            return cached;
        }

        let decision = if self.whitelist.contains(ip) {
            Decision::Whitelisted
        } else if self.blocklist.contains(ip) {
            Decision::Blocked
        } else {
            Decision::Allowed
        };

        self.cache.record(ip, decision);

        if self.debug {
            debug!(filter = %self.name, client = %ip, decision = %decision, "classified");
        }

        decision
    }

    /// Resolve and classify a request's client.
    ///
    /// `None` means no client address could be determined; callers must
    /// treat that as forward (fail-open), never as a rejection.
    #[must_use]
    pub fn check_request(&self, request: &Request) -> Option<Decision> {
        let ip = resolver::resolve_client_ip(request.headers(), request.remote_addr())?;
        Some(self.classify(ip))
    }

    /// Build the rejection response: configured status, text/plain body,
    /// explicit Content-Length.
    fn rejection(&self) -> Response {
        Response::builder()
            .status(self.status)
            .header("content-type", "text/plain; charset=utf-8")
            .header("content-length", self.body.len().to_string())
            .body(self.body.clone())
            .build()
    }

    /// Get the decision counters.
    #[must_use]
    pub fn stats(&self) -> &Arc<AdmissionStats> {
        &self.stats
    }
}

impl Middleware for AdmissionFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn before(&self, request: Request) -> HttpResult<MiddlewareAction> {
        self.stats.requests_checked.fetch_add(1, Ordering::Relaxed);

        let Some(decision) = self.check_request(&request) else {
            // Fail open: an unidentifiable client is never blocked.
            self.stats.unresolved_clients.fetch_add(1, Ordering::Relaxed);
            self.stats.requests_forwarded.fetch_add(1, Ordering::Relaxed);
            if self.debug {
                debug!(filter = %self.name, "no client address resolved, forwarding");
            }
            return Ok(MiddlewareAction::Continue(request));
        };

        match decision {
            Decision::Blocked => {
                self.stats.requests_rejected.fetch_add(1, Ordering::Relaxed);
                if self.debug {
                    debug!(filter = %self.name, path = %request.path(), "request rejected");
                }
                Ok(MiddlewareAction::Respond(self.rejection()))
            },
            Decision::Allowed | Decision::Whitelisted => {
                self.stats.requests_forwarded.fetch_add(1, Ordering::Relaxed);
                Ok(MiddlewareAction::Continue(request))
            },
        }
    }

    fn priority(&self) -> i32 {
        // Run ahead of application middleware so blocked clients do no work.
        95
    }
}
