//! Bridging between the decoded wire structures (`hickory-proto`) and the
//! domain model.

use ferrous_resolver_domain::{DomainName, NameServer, NameServerSet, RecordType, ResolverError};
use hickory_proto::rr::{Name, RData, Record, RecordType as WireType};
use std::net::IpAddr;
use std::str::FromStr;

pub fn to_wire_type(rtype: RecordType) -> WireType {
    WireType::from(rtype.to_u16())
}

pub fn from_wire_type(rtype: WireType) -> RecordType {
    RecordType::from_u16(u16::from(rtype))
}

pub fn to_wire_name(name: &DomainName) -> Result<Name, ResolverError> {
    Name::from_str(&name.to_string()).map_err(|e| ResolverError::Encode(e.to_string()))
}

pub fn from_wire_name(name: &Name) -> Result<DomainName, ResolverError> {
    if name.is_root() {
        return Ok(DomainName::root());
    }
    name.to_utf8().parse()
}

pub fn owner_name(record: &Record) -> Result<DomainName, ResolverError> {
    from_wire_name(record.name())
}

/// Address payload of an A/AAAA record; `None` for any other type.
pub fn address(record: &Record) -> Option<IpAddr> {
    match record.data() {
        RData::A(a) => Some(IpAddr::V4(a.0)),
        RData::AAAA(aaaa) => Some(IpAddr::V6(aaaa.0)),
        _ => None,
    }
}

/// `(owner, address, ttl)` for every address record in `records`. Records
/// whose owner name does not parse are skipped.
pub fn address_entries<'a, I>(records: I) -> Vec<(DomainName, IpAddr, u32)>
where
    I: IntoIterator<Item = &'a Record>,
{
    records
        .into_iter()
        .filter_map(|record| {
            let addr = address(record)?;
            let owner = owner_name(record).ok()?;
            Some((owner, addr, record.ttl()))
        })
        .collect()
}

pub fn ns_target(record: &Record) -> Option<DomainName> {
    match record.data() {
        RData::NS(ns) => from_wire_name(&ns.0).ok(),
        _ => None,
    }
}

pub fn cname_target(record: &Record) -> Option<DomainName> {
    match record.data() {
        RData::CNAME(cname) => from_wire_name(&cname.0).ok(),
        _ => None,
    }
}

pub fn soa_of(records: &[Record]) -> Option<&Record> {
    records.iter().find(|r| r.record_type() == WireType::SOA)
}

pub fn min_ttl<'a, I>(records: I) -> Option<u32>
where
    I: IntoIterator<Item = &'a Record>,
{
    records.into_iter().map(Record::ttl).min()
}

/// Whether a record of `record_type` answers a question for `stype`.
pub fn matches_question(record_type: WireType, stype: RecordType) -> bool {
    match stype {
        RecordType::ANY => record_type != WireType::OPT,
        other => u16::from(record_type) == other.to_u16(),
    }
}

/// Build the authority set delegating `sname` from an authority section,
/// overlaying glue addresses from the additional section.
///
/// NS records whose owner is not an ancestor of `sname` are ignored; among
/// the rest the deepest owner wins (the RFC 1034 closest enclosing zone
/// cut).
pub fn find_authorities(
    sname: &DomainName,
    authority: &[Record],
    additional: &[Record],
) -> NameServerSet {
    let mut candidates: Vec<(DomainName, DomainName)> = Vec::new();
    for record in authority {
        if record.record_type() != WireType::NS {
            continue;
        }
        let Ok(owner) = owner_name(record) else {
            continue;
        };
        let Some(target) = ns_target(record) else {
            continue;
        };
        if sname.is_below(&owner) {
            candidates.push((owner, target));
        }
    }

    let Some(zone_level) = candidates.iter().map(|(owner, _)| owner.level()).max() else {
        return NameServerSet::empty();
    };
    let zone = candidates
        .iter()
        .find(|(owner, _)| owner.level() == zone_level)
        .map(|(owner, _)| owner.clone())
        .unwrap_or_default();

    let mut set = NameServerSet::new(zone.clone());
    for (owner, target) in candidates {
        if owner.level() == zone_level {
            set.insert(NameServer::new(target, zone.clone()));
        }
    }

    for record in additional {
        let Some(addr) = address(record) else {
            continue;
        };
        let Ok(owner) = owner_name(record) else {
            continue;
        };
        if let Some(server) = set.get_mut(&owner) {
            server.add_addresses([addr]);
        }
    }

    set
}
