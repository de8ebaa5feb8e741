//! Bootstrap list of root name servers.
//!
//! Static read-only data; only consulted when the referral cache is disabled
//! or has nothing for the queried zone.

use ferrous_resolver_domain::{DomainName, IpPreference, NameServer, NameServerSet};
use std::net::IpAddr;

const ROOT_HINTS: &[(&str, &str, &str)] = &[
    ("a.root-servers.net", "198.41.0.4", "2001:503:ba3e::2:30"),
    ("b.root-servers.net", "170.247.170.2", "2801:1b8:10::b"),
    ("c.root-servers.net", "192.33.4.12", "2001:500:2::c"),
    ("d.root-servers.net", "199.7.91.13", "2001:500:2d::d"),
    ("e.root-servers.net", "192.203.230.10", "2001:500:a8::e"),
    ("f.root-servers.net", "192.5.5.241", "2001:500:2f::f"),
    ("g.root-servers.net", "192.112.36.4", "2001:500:12::d0d"),
    ("h.root-servers.net", "198.97.190.53", "2001:500:1::53"),
    ("i.root-servers.net", "192.36.148.17", "2001:7fe::53"),
    ("j.root-servers.net", "192.58.128.30", "2001:503:c27::2:30"),
    ("k.root-servers.net", "193.0.14.129", "2001:7fd::1"),
    ("l.root-servers.net", "199.7.83.42", "2001:500:9f::42"),
    ("m.root-servers.net", "202.12.27.33", "2001:dc3::35"),
];

/// The root-zone authority set, with addresses filtered by `preference`.
pub fn name_server_set(preference: IpPreference) -> NameServerSet {
    let zone = DomainName::root();
    let mut set = NameServerSet::new(zone.clone());
    for (name, v4, v6) in ROOT_HINTS {
        let name: DomainName = name.parse().unwrap();
        let addresses: Vec<IpAddr> = [v4.parse().unwrap(), v6.parse().unwrap()]
            .into_iter()
            .filter(|addr: &IpAddr| preference.allows(addr))
            .collect();
        set.insert(NameServer::with_addresses(name, zone.clone(), addresses));
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thirteen_servers_all_resolved() {
        let set = name_server_set(IpPreference::DualStack);
        assert_eq!(set.len(), 13);
        assert!(set.iter().all(|s| s.is_resolved()));
        assert!(set.zone().is_root());
    }

    #[test]
    fn v4_only_filters_v6_addresses() {
        let set = name_server_set(IpPreference::V4Only);
        assert!(set
            .iter()
            .all(|s| s.addresses().iter().all(|a| a.is_ipv4())));
    }
}
