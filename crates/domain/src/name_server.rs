//! Candidate name servers for a zone.
//!
//! A `NameServerSet` is the delegation produced by one referral: the zone it
//! covers plus the servers named for it, with whatever glue addresses came
//! along. Selection prefers servers whose addresses are already known, so a
//! step can avoid triggering a nested address resolution.

use crate::errors::ResolverError;
use crate::name::DomainName;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::net::IpAddr;

#[derive(Debug, Clone)]
pub struct NameServer {
    name: DomainName,
    zone: DomainName,
    addresses: Vec<IpAddr>,
}

impl NameServer {
    pub fn new(name: DomainName, zone: DomainName) -> Self {
        Self {
            name,
            zone,
            addresses: Vec::new(),
        }
    }

    pub fn with_addresses<I>(name: DomainName, zone: DomainName, addresses: I) -> Self
    where
        I: IntoIterator<Item = IpAddr>,
    {
        let mut server = Self::new(name, zone);
        server.add_addresses(addresses);
        server
    }

    pub fn name(&self) -> &DomainName {
        &self.name
    }

    /// The zone whose delegation named this server.
    pub fn zone(&self) -> &DomainName {
        &self.zone
    }

    pub fn addresses(&self) -> &[IpAddr] {
        &self.addresses
    }

    pub fn is_resolved(&self) -> bool {
        !self.addresses.is_empty()
    }

    /// Addresses accumulate; they are never removed.
    pub fn add_addresses<I: IntoIterator<Item = IpAddr>>(&mut self, addresses: I) {
        for addr in addresses {
            if !self.addresses.contains(&addr) {
                self.addresses.push(addr);
            }
        }
    }
}

/// The candidate authority set for one zone.
#[derive(Debug, Clone, Default)]
pub struct NameServerSet {
    zone: DomainName,
    servers: HashMap<DomainName, NameServer>,
}

impl NameServerSet {
    pub fn new(zone: DomainName) -> Self {
        Self {
            zone,
            servers: HashMap::new(),
        }
    }

    /// The empty sentinel: root zone, no servers.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn zone(&self) -> &DomainName {
        &self.zone
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn get(&self, name: &DomainName) -> Option<&NameServer> {
        self.servers.get(name)
    }

    pub fn get_mut(&mut self, name: &DomainName) -> Option<&mut NameServer> {
        self.servers.get_mut(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NameServer> {
        self.servers.values()
    }

    pub fn servers_mut(&mut self) -> impl Iterator<Item = &mut NameServer> {
        self.servers.values_mut()
    }

    /// Inserting a server that is already a member merges its addresses.
    pub fn insert(&mut self, server: NameServer) {
        match self.servers.entry(server.name().clone()) {
            Entry::Occupied(mut occupied) => {
                occupied
                    .get_mut()
                    .add_addresses(server.addresses().iter().copied());
            }
            Entry::Vacant(vacant) => {
                vacant.insert(server);
            }
        }
    }

    /// Random selection, weighted toward servers that are already resolved.
    ///
    /// If any member of the set is resolved, pick uniformly among the
    /// resolved members -- note this check spans the whole set, not just the
    /// deepest name-depth group. Otherwise pick uniformly within the deepest
    /// group, preferring more specific server names.
    pub fn select_any(&self) -> Option<&NameServer> {
        let resolved: Vec<&NameServer> =
            self.servers.values().filter(|s| s.is_resolved()).collect();
        if !resolved.is_empty() {
            return Some(resolved[fastrand::usize(0..resolved.len())]);
        }

        let deepest = self.servers.values().map(|s| s.name().level()).max()?;
        let group: Vec<&NameServer> = self
            .servers
            .values()
            .filter(|s| s.name().level() == deepest)
            .collect();
        Some(group[fastrand::usize(0..group.len())])
    }

    /// Pin selection to a specific member.
    pub fn select_one(&self, name: &DomainName) -> Result<&NameServer, ResolverError> {
        self.servers
            .get(name)
            .ok_or_else(|| ResolverError::ServerNotInSet(name.to_string()))
    }
}
