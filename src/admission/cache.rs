//! Bounded, TTL-expiring cache of classification decisions.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use super::decision::Decision;

/// Default entry lifetime when the configured TTL is unusable.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Entry count past which a write triggers the expiry sweep.
pub const DEFAULT_CACHE_CAPACITY: usize = 10_000;

/// A cached classification with its recording time.
#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    decision: Decision,
    recorded_at: Instant,
}

/// Bounded TTL cache mapping client addresses to their last classification.
///
/// Reads and writes are guarded by a shared-read/exclusive-write lock held
/// only for the duration of the map access, never across rule evaluation.
/// The capacity is a soft amortization trigger: a write that pushes the table
/// past it sweeps out every expired entry, but a burst of distinct fresh keys
/// is held until their TTL elapses.
#[derive(Debug)]
pub struct DecisionCache {
    entries: RwLock<HashMap<IpAddr, CacheEntry>>,
    ttl: Duration,
    capacity: usize,
}

impl DecisionCache {
    /// Create a cache with the given entry lifetime and sweep threshold.
    ///
    /// A zero TTL is replaced by [`DEFAULT_TTL`]; the configuration layer
    /// maps non-positive configured values to zero before reaching here.
    #[must_use]
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        let ttl = if ttl.is_zero() { DEFAULT_TTL } else { ttl };
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            capacity,
        }
    }

    /// Create a cache with the default TTL and capacity.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_TTL, DEFAULT_CACHE_CAPACITY)
    }

    /// Look up a fresh classification for the address.
    ///
    /// Returns `None` when no entry exists or the entry has outlived the
    /// TTL; a stale row left in the table behaves exactly like a miss.
    #[must_use]
    pub fn lookup(&self, ip: &IpAddr) -> Option<Decision> {
        let entries = self.entries.read().unwrap();
        let entry = entries.get(ip)?;
        if entry.recorded_at.elapsed() > self.ttl {
            return None;
        }
        Some(entry.decision)
    }

    /// Insert or overwrite the classification for the address.
    ///
    /// When the insert pushes the table past capacity, the caller sweeps out
    /// every expired entry while still holding the write lock.
    pub fn record(&self, ip: IpAddr, decision: Decision) {
        let mut entries = self.entries.write().unwrap();
        entries.insert(
            ip,
            CacheEntry {
                decision,
                recorded_at: Instant::now(),
            },
        );

        if entries.len() > self.capacity {
            let ttl = self.ttl;
            entries.retain(|_, entry| entry.recorded_at.elapsed() <= ttl);
        }
    }

    /// Number of physically present entries, stale rows included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    /// Whether the table is physically empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().unwrap().is_empty()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.write().unwrap().clear();
    }

    /// Effective entry lifetime.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::IpAddr;
    use std::sync::Arc;

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn test_lookup_hit_and_miss() {
        let cache = DecisionCache::with_defaults();
        assert_eq!(cache.lookup(&ip("10.0.0.1")), None);

        cache.record(ip("10.0.0.1"), Decision::Blocked);
        assert_eq!(cache.lookup(&ip("10.0.0.1")), Some(Decision::Blocked));
        assert_eq!(cache.lookup(&ip("10.0.0.2")), None);
    }

    #[test]
    fn test_record_overwrites() {
        let cache = DecisionCache::with_defaults();
        cache.record(ip("10.0.0.1"), Decision::Allowed);
        cache.record(ip("10.0.0.1"), Decision::Blocked);

        assert_eq!(cache.lookup(&ip("10.0.0.1")), Some(Decision::Blocked));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_ttl_expiry() {
        let cache = DecisionCache::new(Duration::from_millis(40), DEFAULT_CACHE_CAPACITY);
        cache.record(ip("10.0.0.1"), Decision::Whitelisted);
        assert_eq!(cache.lookup(&ip("10.0.0.1")), Some(Decision::Whitelisted));

        std::thread::sleep(Duration::from_millis(60));

        // Stale entry behaves as a miss even though the row is still present.
        assert_eq!(cache.lookup(&ip("10.0.0.1")), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_zero_ttl_replaced_by_default() {
        let cache = DecisionCache::new(Duration::ZERO, DEFAULT_CACHE_CAPACITY);
        assert_eq!(cache.ttl(), DEFAULT_TTL);
    }

    #[test]
    fn test_overflow_sweep_removes_expired() {
        let cache = DecisionCache::new(Duration::from_millis(40), 4);
        for i in 0..5 {
            cache.record(ip(&format!("10.0.0.{i}")), Decision::Allowed);
        }
        // 5th insert exceeded capacity but nothing was expired yet.
        assert_eq!(cache.len(), 5);

        std::thread::sleep(Duration::from_millis(60));

        cache.record(ip("10.0.1.1"), Decision::Allowed);
        // The triggering write survives; the five stale entries are gone.
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.lookup(&ip("10.0.1.1")), Some(Decision::Allowed));
    }

    #[test]
    fn test_sweep_keeps_fresh_entries() {
        let cache = DecisionCache::new(Duration::from_secs(60), 4);
        for i in 0..6 {
            cache.record(ip(&format!("10.0.0.{i}")), Decision::Allowed);
        }
        // Everything is fresh, so the cap does not bound the table.
        assert_eq!(cache.len(), 6);
    }

    #[test]
    fn test_clear() {
        let cache = DecisionCache::with_defaults();
        cache.record(ip("10.0.0.1"), Decision::Allowed);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_concurrent_access() {
        let cache = Arc::new(DecisionCache::with_defaults());
        let mut handles = Vec::new();

        for t in 0..8 {
            let cache = Arc::clone(&cache);
            handles.push(std::thread::spawn(move || {
                for i in 0..100 {
                    let addr = ip(&format!("10.{t}.0.{}", i % 16));
                    cache.record(addr, Decision::Allowed);
                    let _ = cache.lookup(&addr);
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 8 * 16);
    }
}
