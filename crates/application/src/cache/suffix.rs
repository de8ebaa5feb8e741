//! Expiring suffix-match cache.
//!
//! A trie keyed by domain labels, walked top-level label first. Each node
//! optionally holds one expirable leaf value. Lookup is best-suffix-match:
//! the walk descends while child labels match and returns the nearest live
//! leaf on the path. Expired leaves are treated as absent and cleared on
//! read; there is no eviction sweep, so memory stays bounded only while
//! callers bound the keyspace (here: zone names and previously-seen owner
//! names).

use chrono::{DateTime, Utc};
use ferrous_resolver_domain::{DomainName, Expiring, Label};
use rustc_hash::FxBuildHasher;
use std::collections::HashMap;

struct CacheNode<T> {
    children: HashMap<Label, CacheNode<T>, FxBuildHasher>,
    leaf: Option<Expiring<T>>,
}

impl<T> CacheNode<T> {
    fn new() -> Self {
        Self {
            children: HashMap::with_hasher(FxBuildHasher),
            leaf: None,
        }
    }
}

pub struct SuffixCache<T> {
    root: CacheNode<T>,
}

impl<T> SuffixCache<T> {
    pub fn new() -> Self {
        Self {
            root: CacheNode::new(),
        }
    }

    /// Insert or overwrite the leaf at the exact path of `name`'s labels.
    pub fn insert(&mut self, name: &DomainName, value: T, expires_at: Option<DateTime<Utc>>) {
        let mut node = &mut self.root;
        for label in name.labels_root_first() {
            node = node
                .children
                .entry(label.clone())
                .or_insert_with(CacheNode::new);
        }
        node.leaf = Some(Expiring::new(value, expires_at));
    }

    /// Best-suffix-match lookup: the deepest live leaf on the path toward
    /// `name`, or `None`. Expired leaves encountered on the path are cleared.
    pub fn get(&mut self, name: &DomainName, now: DateTime<Utc>) -> Option<&T> {
        let labels: Vec<&Label> = name.labels_root_first().collect();

        let mut node = &self.root;
        let mut best: Option<usize> = None;
        let mut expired: Vec<usize> = Vec::new();
        let mut depth = 0;
        loop {
            match &node.leaf {
                Some(leaf) if leaf.is_expired(now) => expired.push(depth),
                Some(_) => best = Some(depth),
                None => {}
            }
            let Some(label) = labels.get(depth) else { break };
            match node.children.get(*label) {
                Some(child) => {
                    node = child;
                    depth += 1;
                }
                None => break,
            }
        }

        for &d in &expired {
            if let Some(stale) = self.node_at_mut(&labels[..d]) {
                stale.leaf = None;
            }
        }

        let best = best?;
        self.node_at(&labels[..best])
            .and_then(|node| node.leaf.as_ref())
            .map(Expiring::value)
    }

    fn node_at(&self, labels: &[&Label]) -> Option<&CacheNode<T>> {
        let mut node = &self.root;
        for label in labels {
            node = node.children.get(*label)?;
        }
        Some(node)
    }

    fn node_at_mut(&mut self, labels: &[&Label]) -> Option<&mut CacheNode<T>> {
        let mut node = &mut self.root;
        for label in labels {
            node = node.children.get_mut(*label)?;
        }
        Some(node)
    }
}

impl<T> Default for SuffixCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
