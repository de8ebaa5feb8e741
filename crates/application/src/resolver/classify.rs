//! Response classification (RFC 1034 §5.3.3 step 4, RFC 2308 §2.1/§2.2).

use super::records;
use ferrous_resolver_domain::{DomainName, NameServerSet, RecordType, ResolverError};
use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::Record;
use std::collections::{HashMap, HashSet};

/// What one response means for the question that was asked.
#[derive(Debug, Clone)]
pub enum QueryOutcome {
    AuthoritativeAnswer {
        records: Vec<Record>,
        canonical_name: DomainName,
    },
    /// Glue in the additional section already answered the question; saves
    /// one round trip against the delegated servers.
    NonAuthoritativeAnswer { records: Vec<Record> },
    /// A referral to a more specific set of name servers.
    NextAuthorities { authorities: NameServerSet },
    /// The answer lives at a canonical name outside this response.
    FollowCname {
        canonical_name: DomainName,
        authorities: NameServerSet,
    },
    NxDomain {
        canonical_name: DomainName,
        soa: Option<Record>,
    },
    NoData {
        canonical_name: DomainName,
        soa: Option<Record>,
    },
    /// Non-authoritative response with no usable delegation.
    MissingAuthorities,
    /// Authoritative NoError response with nothing usable at all.
    EmptyResponse,
    UnexpectedRcode { rcode: ResponseCode },
}

impl QueryOutcome {
    /// Whether this outcome ends the resolution (success or terminal
    /// failure) rather than advancing it.
    pub fn is_terminal(&self) -> bool {
        !matches!(
            self,
            QueryOutcome::NextAuthorities { .. } | QueryOutcome::FollowCname { .. }
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            QueryOutcome::AuthoritativeAnswer { .. } => "authoritative answer",
            QueryOutcome::NonAuthoritativeAnswer { .. } => "non-authoritative answer",
            QueryOutcome::NextAuthorities { .. } => "referral",
            QueryOutcome::FollowCname { .. } => "alias",
            QueryOutcome::NxDomain { .. } => "NXDOMAIN",
            QueryOutcome::NoData { .. } => "NODATA",
            QueryOutcome::MissingAuthorities => "missing authorities",
            QueryOutcome::EmptyResponse => "empty response",
            QueryOutcome::UnexpectedRcode { .. } => "unexpected rcode",
        }
    }
}

/// Classify `response` against the question `(sname, stype)`.
pub fn classify(
    sname: &DomainName,
    stype: RecordType,
    response: &Message,
) -> Result<QueryOutcome, ResolverError> {
    check_echoed_question(sname, stype, response)?;

    let rcode = response.response_code();
    if rcode != ResponseCode::NoError && rcode != ResponseCode::NXDomain {
        return Ok(QueryOutcome::UnexpectedRcode { rcode });
    }

    if !response.authoritative() {
        let authorities =
            records::find_authorities(sname, response.name_servers(), response.additionals());
        if authorities.is_empty() {
            return Ok(QueryOutcome::MissingAuthorities);
        }
        let glue_answers: Vec<Record> = response
            .additionals()
            .iter()
            .filter(|r| records::matches_question(r.record_type(), stype))
            .filter(|r| records::owner_name(r).map_or(false, |owner| owner == *sname))
            .cloned()
            .collect();
        if !glue_answers.is_empty() {
            return Ok(QueryOutcome::NonAuthoritativeAnswer {
                records: glue_answers,
            });
        }
        return Ok(QueryOutcome::NextAuthorities { authorities });
    }

    let (canonical_name, followed) = canonical_of(sname, stype, response.answers())?;

    if rcode == ResponseCode::NXDomain {
        return Ok(QueryOutcome::NxDomain {
            canonical_name,
            soa: records::soa_of(response.name_servers()).cloned(),
        });
    }

    let answers: Vec<Record> = response
        .answers()
        .iter()
        .filter(|r| records::matches_question(r.record_type(), stype))
        .filter(|r| {
            records::owner_name(r).map_or(false, |owner| owner == canonical_name)
        })
        .cloned()
        .collect();
    if !answers.is_empty() {
        return Ok(QueryOutcome::AuthoritativeAnswer {
            records: answers,
            canonical_name,
        });
    }

    let soa = records::soa_of(response.name_servers());
    let authorities = records::find_authorities(
        &canonical_name,
        response.name_servers(),
        response.additionals(),
    );
    if soa.is_some() || !authorities.is_empty() {
        return Ok(QueryOutcome::NoData {
            canonical_name,
            soa: soa.cloned(),
        });
    }

    if followed {
        return Ok(QueryOutcome::FollowCname {
            canonical_name,
            authorities,
        });
    }

    Ok(QueryOutcome::EmptyResponse)
}

fn check_echoed_question(
    sname: &DomainName,
    stype: RecordType,
    response: &Message,
) -> Result<(), ResolverError> {
    let asked = format!("{} {}", sname, stype);
    let mismatch = |answered: String| ResolverError::QuestionMismatch {
        asked: asked.clone(),
        answered,
    };

    let questions = response.queries();
    if questions.len() != 1 {
        return Err(mismatch(format!("{} questions", questions.len())));
    }
    let question = &questions[0];
    let answered_name = records::from_wire_name(question.name())
        .map_err(|_| mismatch(question.name().to_utf8()))?;
    let answered_type = records::from_wire_type(question.query_type());
    if answered_name != *sname || answered_type != stype {
        return Err(mismatch(format!("{} {}", answered_name, answered_type)));
    }
    Ok(())
}

/// Follow the CNAME chain rooted at `sname` inside one answer section.
///
/// Returns the final canonical name and whether any alias was followed.
/// A CNAME pointing at itself, a chain revisiting a name, or two CNAME
/// records with the same owner are each protocol violations.
fn canonical_of(
    sname: &DomainName,
    stype: RecordType,
    answers: &[Record],
) -> Result<(DomainName, bool), ResolverError> {
    if stype == RecordType::CNAME {
        return Ok((sname.clone(), false));
    }

    let mut aliases: HashMap<DomainName, DomainName> = HashMap::new();
    for record in answers {
        let Some(target) = records::cname_target(record) else {
            continue;
        };
        let owner = records::owner_name(record)?;
        if aliases.insert(owner.clone(), target).is_some() {
            return Err(ResolverError::AmbiguousCanonicalName(owner.to_string()));
        }
    }

    let mut canonical = sname.clone();
    let mut followed = false;
    let mut visited: HashSet<DomainName> = HashSet::new();
    visited.insert(canonical.clone());
    while let Some(target) = aliases.get(&canonical) {
        if *target == canonical {
            return Err(ResolverError::CanonicalNameSelfReference(
                canonical.to_string(),
            ));
        }
        if !visited.insert(target.clone()) {
            return Err(ResolverError::CanonicalNameCycle(sname.to_string()));
        }
        canonical = target.clone();
        followed = true;
    }

    Ok((canonical, followed))
}
