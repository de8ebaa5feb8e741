//! Address records grouped by owner name.
//!
//! One instance is shared by reference across a whole resolution tree
//! (alias and name-server sub-resolutions included), so an address
//! discovered anywhere benefits every pending selection.

use super::suffix::SuffixCache;
use chrono::{DateTime, Duration, Utc};
use ferrous_resolver_domain::{DomainName, NameServerSet};
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Mutex;
use tracing::trace;

pub struct AddressCache {
    inner: Mutex<SuffixCache<Vec<IpAddr>>>,
}

impl AddressCache {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(SuffixCache::new()),
        }
    }

    /// Bulk-seed addresses that are trusted forever (no expiration).
    pub fn seed<I>(&self, entries: I)
    where
        I: IntoIterator<Item = (DomainName, IpAddr)>,
    {
        let mut groups: HashMap<DomainName, Vec<IpAddr>> = HashMap::new();
        for (owner, addr) in entries {
            groups.entry(owner).or_default().push(addr);
        }

        let mut cache = self.inner.lock().expect("address cache lock poisoned");
        for (owner, addrs) in groups {
            cache.insert(&owner, addrs, None);
        }
    }

    /// Insert TTL-bearing address records. Records with TTL 0 are discarded;
    /// each owner group expires at `now` + the minimum TTL among the group,
    /// so the set is never served past its shortest-lived member.
    pub fn insert<I>(&self, now: DateTime<Utc>, entries: I)
    where
        I: IntoIterator<Item = (DomainName, IpAddr, u32)>,
    {
        let mut groups: HashMap<DomainName, (Vec<IpAddr>, u32)> = HashMap::new();
        for (owner, addr, ttl) in entries {
            if ttl == 0 {
                continue;
            }
            let group = groups.entry(owner).or_insert_with(|| (Vec::new(), ttl));
            group.0.push(addr);
            group.1 = group.1.min(ttl);
        }

        let mut cache = self.inner.lock().expect("address cache lock poisoned");
        for (owner, (addrs, min_ttl)) in groups {
            trace!(owner = %owner, addresses = addrs.len(), ttl = min_ttl, "caching addresses");
            let expires_at = now + Duration::seconds(i64::from(min_ttl));
            cache.insert(&owner, addrs, Some(expires_at));
        }
    }

    pub fn get(&self, name: &DomainName, now: DateTime<Utc>) -> Option<Vec<IpAddr>> {
        let mut cache = self.inner.lock().expect("address cache lock poisoned");
        cache.get(name, now).cloned()
    }

    /// Copy cached addresses into every unresolved member of `set`.
    pub fn hydrate(&self, set: &mut NameServerSet, now: DateTime<Utc>) {
        let mut cache = self.inner.lock().expect("address cache lock poisoned");
        for server in set.servers_mut() {
            if server.is_resolved() {
                continue;
            }
            if let Some(addrs) = cache.get(server.name(), now) {
                server.add_addresses(addrs.iter().copied());
            }
        }
    }
}

impl Default for AddressCache {
    fn default() -> Self {
        Self::new()
    }
}
