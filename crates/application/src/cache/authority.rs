//! Top-level referral cache keyed by zone.
//!
//! Lets a depth-0 resolution skip the root hints when a delegation for an
//! enclosing zone is already known. An explicit, constructor-injected
//! instance; sharing across resolvers is the caller's choice.

use super::suffix::SuffixCache;
use chrono::{DateTime, Duration, Utc};
use ferrous_resolver_domain::{DomainName, NameServerSet};
use std::sync::Mutex;
use tracing::debug;

pub struct AuthorityCache {
    inner: Mutex<SuffixCache<NameServerSet>>,
}

impl AuthorityCache {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(SuffixCache::new()),
        }
    }

    /// The cached authority set for the closest enclosing zone of `name`.
    pub fn get(&self, name: &DomainName, now: DateTime<Utc>) -> Option<NameServerSet> {
        let mut cache = self.inner.lock().expect("authority cache lock poisoned");
        cache.get(name, now).cloned()
    }

    /// Store a referral, keyed by its zone. Without a TTL the entry never
    /// expires.
    pub fn insert(&self, set: NameServerSet, now: DateTime<Utc>, ttl: Option<u32>) {
        if set.is_empty() {
            return;
        }
        let zone = set.zone().clone();
        debug!(zone = %zone, servers = set.len(), "caching referral");
        let expires_at = ttl.map(|secs| now + Duration::seconds(i64::from(secs)));
        let mut cache = self.inner.lock().expect("authority cache lock poisoned");
        cache.insert(&zone, set, expires_at);
    }
}

impl Default for AuthorityCache {
    fn default() -> Self {
        Self::new()
    }
}
