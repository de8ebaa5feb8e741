//! The step-wise resolution iterator (RFC 1034 §5.3.3).
//!
//! A pull-based state machine: each `advance` call performs at most one
//! network exchange and yields the step it produced, or delegates to an
//! active sub-iteration (resolving a selected name server's own address, or
//! chasing an alias). Steps are strictly ordered; a later step is never
//! evaluated before the previous outcome is known.

use super::classify::{classify, QueryOutcome};
use super::records;
use super::root_hints;
use crate::cache::{AddressCache, AuthorityCache};
use crate::ports::DnsTransport;
use chrono::{DateTime, Utc};
use ferrous_resolver_domain::{
    DomainName, NameServerSet, RecordType, ResolverConfig, ResolverError,
};
use futures::future::BoxFuture;
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{DNSClass, Record, RecordType as WireType};
use std::net::{IpAddr, SocketAddr};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

const DNS_PORT: u16 = 53;

/// One step's artifact: the exchange that happened and what it meant.
#[derive(Debug, Clone)]
pub struct ResolutionStep {
    pub request: Message,
    pub response: Message,
    /// The authority set the query was sent to.
    pub authorities: NameServerSet,
    pub server: SocketAddr,
    pub outcome: QueryOutcome,
    /// The set adopted for the next step, when the outcome was a referral
    /// or an alias.
    pub next_authorities: Option<NameServerSet>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ResolutionStep {
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// The active sub-iteration, if any. An exhaustively enumerable state: a
/// step either runs in this iterator or in exactly one child.
enum Nested {
    Idle,
    ResolvingAddress {
        sub: Box<ResolutionIter>,
        server: DomainName,
    },
    FollowingAlias {
        sub: Box<ResolutionIter>,
    },
}

pub struct ResolutionIter {
    sname: DomainName,
    stype: RecordType,
    transport: Arc<dyn DnsTransport>,
    config: Arc<ResolverConfig>,
    addresses: Arc<AddressCache>,
    referrals: Arc<AuthorityCache>,
    current: Option<NameServerSet>,
    pinned: Option<DomainName>,
    nested: Nested,
    /// A completed address sub-resolution waiting to be applied to the
    /// selected server before the deferred query is issued.
    pending: Option<(DomainName, Vec<IpAddr>)>,
    /// One step counter for the whole resolution tree: sub-iterations share
    /// it, so nested address resolutions cannot dodge the iteration cap.
    steps: Arc<AtomicU32>,
    root_cache_missed: bool,
    done: bool,
    answer: Option<QueryOutcome>,
}

impl ResolutionIter {
    pub fn new(
        sname: DomainName,
        stype: RecordType,
        transport: Arc<dyn DnsTransport>,
        config: Arc<ResolverConfig>,
        addresses: Arc<AddressCache>,
        referrals: Arc<AuthorityCache>,
    ) -> Self {
        Self {
            sname,
            stype,
            transport,
            config,
            addresses,
            referrals,
            current: None,
            pinned: None,
            nested: Nested::Idle,
            pending: None,
            steps: Arc::new(AtomicU32::new(0)),
            root_cache_missed: false,
            done: false,
            answer: None,
        }
    }

    /// Start from a known authority set instead of the cache/root hints.
    pub fn with_authorities(mut self, authorities: NameServerSet) -> Self {
        self.current = Some(authorities);
        self
    }

    /// Pin selection to one member of the offered set.
    pub fn with_server(mut self, name: DomainName) -> Self {
        self.pinned = Some(name);
        self
    }

    pub fn sname(&self) -> &DomainName {
        &self.sname
    }

    pub fn stype(&self) -> RecordType {
        self.stype
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// The terminal outcome, once `is_done`.
    pub fn outcome(&self) -> Option<&QueryOutcome> {
        self.answer.as_ref()
    }

    pub fn into_outcome(self) -> Option<QueryOutcome> {
        self.answer
    }

    /// Perform one step. Returns `None` once the resolution is exhausted.
    ///
    /// Boxed because an address sub-resolution may itself spawn further
    /// sub-resolutions.
    pub fn advance(&mut self) -> BoxFuture<'_, Result<Option<ResolutionStep>, ResolverError>> {
        Box::pin(async move {
            if self.done {
                return Ok(None);
            }
            loop {
                // An active sub-iteration owns the step entirely.
                match std::mem::replace(&mut self.nested, Nested::Idle) {
                    Nested::FollowingAlias { mut sub } => {
                        return match sub.advance().await? {
                            Some(step) => {
                                if sub.is_done() {
                                    // the alias outcome is this resolution's outcome
                                    self.answer = sub.answer.clone();
                                    self.done = true;
                                } else {
                                    self.nested = Nested::FollowingAlias { sub };
                                }
                                Ok(Some(step))
                            }
                            None => {
                                self.done = true;
                                Ok(None)
                            }
                        };
                    }
                    Nested::ResolvingAddress { mut sub, server } => {
                        return match sub.advance().await? {
                            Some(step) => {
                                if sub.is_done() {
                                    let addrs = sub.answer_addresses(&server);
                                    if addrs.is_empty() {
                                        return Err(ResolverError::AddressResolutionFailed(
                                            server.to_string(),
                                        ));
                                    }
                                    info!(
                                        server = %server,
                                        addresses = addrs.len(),
                                        "name server address resolved"
                                    );
                                    self.pending = Some((server, addrs));
                                } else {
                                    self.nested = Nested::ResolvingAddress { sub, server };
                                }
                                Ok(Some(step))
                            }
                            None => Err(ResolverError::AddressResolutionFailed(
                                server.to_string(),
                            )),
                        };
                    }
                    Nested::Idle => {}
                }

                // Apply a just-completed address sub-resolution to the
                // member that was waiting for it.
                if let Some((server, addrs)) = self.pending.take() {
                    if let Some(set) = self.current.as_mut() {
                        if let Some(member) = set.get_mut(&server) {
                            member.add_addresses(addrs);
                        }
                    }
                }

                // Hard cap against delegation loops the classifier cannot
                // see (oscillating referrals, glueless self-delegation).
                let step_no = self.steps.fetch_add(1, Ordering::Relaxed) + 1;
                if self.config.max_iterations > 0 && step_no > self.config.max_iterations {
                    return Err(ResolverError::IterationLimitExceeded(
                        self.config.max_iterations,
                    ));
                }

                let now = Utc::now();
                let mut authorities = match self.current.take() {
                    Some(set) => set,
                    None => self.seed_authorities(now),
                };
                self.addresses.hydrate(&mut authorities, now);

                let selected = match &self.pinned {
                    Some(name) => authorities.select_one(name)?.clone(),
                    None => authorities.select_any().cloned().ok_or_else(|| {
                        ResolverError::NoServersAvailable(authorities.zone().to_string())
                    })?,
                };
                self.current = Some(authorities.clone());
                debug!(
                    server = %selected.name(),
                    zone = %authorities.zone(),
                    "selected name server"
                );

                let Some(ip) = self
                    .config
                    .ip_preference
                    .pick(selected.addresses())
                    .copied()
                else {
                    // No usable address: defer the query behind a nested
                    // address resolution sharing our caches.
                    info!(server = %selected.name(), "resolving name server address");
                    let sub = self.sub_iter(
                        selected.name().clone(),
                        self.config.ip_preference.question_type(),
                    );
                    self.nested = Nested::ResolvingAddress {
                        sub: Box::new(sub),
                        server: selected.name().clone(),
                    };
                    continue;
                };

                // The single suspension point of a step.
                let request = build_request(&self.sname, self.stype)?;
                let server_addr = SocketAddr::new(ip, DNS_PORT);
                info!(
                    domain = %self.sname,
                    record_type = %self.stype,
                    server = %server_addr,
                    step = step_no,
                    "querying name server"
                );
                let started_at = Utc::now();
                let response = self.transport.lookup(&request, server_addr).await?;
                let finished_at = Utc::now();

                if response.id() != request.id() {
                    return Err(ResolverError::ResponseIdMismatch {
                        sent: request.id(),
                        received: response.id(),
                    });
                }
                if response.truncated() {
                    debug!(server = %server_addr, "response truncated");
                }

                let outcome = classify(&self.sname, self.stype, &response)?;

                // Address discoveries feed the shared cache, except
                // untrusted additional data in strict mode.
                if response.authoritative() || !self.config.strict_authoritative {
                    let entries = records::address_entries(
                        response.additionals().iter().chain(response.answers()),
                    );
                    if !entries.is_empty() {
                        self.addresses.insert(now, entries);
                    }
                }

                let mut next_authorities = None;
                match &outcome {
                    QueryOutcome::NextAuthorities { authorities: next } => {
                        info!(zone = %next.zone(), servers = next.len(), "referral received");
                        if self.root_cache_missed && self.config.use_authority_cache {
                            let ttl = records::min_ttl(
                                response
                                    .name_servers()
                                    .iter()
                                    .filter(|r| r.record_type() == WireType::NS),
                            );
                            self.referrals.insert(next.clone(), now, ttl);
                            self.root_cache_missed = false;
                        }
                        self.current = Some(next.clone());
                        next_authorities = Some(next.clone());
                    }
                    QueryOutcome::FollowCname {
                        canonical_name,
                        authorities: next,
                    } => {
                        info!(canonical_name = %canonical_name, "alias found");
                        if self.config.follow_cname {
                            let mut sub = self.sub_iter(canonical_name.clone(), self.stype);
                            if !next.is_empty() {
                                sub.current = Some(next.clone());
                            }
                            self.nested = Nested::FollowingAlias { sub: Box::new(sub) };
                            next_authorities = Some(next.clone());
                        } else {
                            self.done = true;
                            self.answer = Some(outcome.clone());
                        }
                    }
                    terminal => {
                        self.log_terminal(terminal, server_addr);
                        self.done = true;
                        self.answer = Some(outcome.clone());
                    }
                }

                return Ok(Some(ResolutionStep {
                    request,
                    response,
                    authorities,
                    server: server_addr,
                    outcome,
                    next_authorities,
                    started_at,
                    finished_at,
                }));
            }
        })
    }

    /// A nested resolution sharing this iterator's caches and step counter.
    fn sub_iter(&self, sname: DomainName, stype: RecordType) -> ResolutionIter {
        let mut sub = ResolutionIter::new(
            sname,
            stype,
            Arc::clone(&self.transport),
            Arc::clone(&self.config),
            Arc::clone(&self.addresses),
            Arc::clone(&self.referrals),
        );
        sub.steps = Arc::clone(&self.steps);
        sub
    }

    fn seed_authorities(&mut self, now: DateTime<Utc>) -> NameServerSet {
        if self.config.use_authority_cache {
            if let Some(set) = self.referrals.get(&self.sname, now) {
                debug!(zone = %set.zone(), "authorities seeded from referral cache");
                self.root_cache_missed = false;
                return set;
            }
        }
        self.root_cache_missed = true;
        debug!("authorities seeded from root hints");
        root_hints::name_server_set(self.config.ip_preference)
    }

    /// Address-type answer records from the terminal outcome, owned by
    /// `owner` or by the canonical name the answer settled on.
    fn answer_addresses(&self, owner: &DomainName) -> Vec<IpAddr> {
        let (answer_records, canonical): (&[Record], Option<&DomainName>) = match &self.answer {
            Some(QueryOutcome::AuthoritativeAnswer {
                records,
                canonical_name,
            }) => (records, Some(canonical_name)),
            Some(QueryOutcome::NonAuthoritativeAnswer { records }) => (records, None),
            _ => return Vec::new(),
        };
        answer_records
            .iter()
            .filter(|record| {
                records::owner_name(record)
                    .map_or(false, |o| o == *owner || Some(&o) == canonical)
            })
            .filter_map(records::address)
            .collect()
    }

    fn log_terminal(&self, outcome: &QueryOutcome, server: SocketAddr) {
        match outcome {
            QueryOutcome::AuthoritativeAnswer { records, .. } => {
                info!(answers = records.len(), "authoritative answer");
            }
            QueryOutcome::NonAuthoritativeAnswer { records } => {
                info!(answers = records.len(), "non-authoritative answer from glue");
            }
            QueryOutcome::NxDomain { canonical_name, .. } => {
                warn!(domain = %canonical_name, "name does not exist");
            }
            QueryOutcome::NoData { canonical_name, .. } => {
                warn!(
                    domain = %canonical_name,
                    record_type = %self.stype,
                    "no data for requested type"
                );
            }
            QueryOutcome::MissingAuthorities => {
                warn!(server = %server, "non-authoritative response without usable delegation");
            }
            QueryOutcome::EmptyResponse => {
                warn!(server = %server, "authoritative response with nothing usable");
            }
            QueryOutcome::UnexpectedRcode { rcode } => {
                warn!(server = %server, rcode = ?rcode, "unexpected response code");
            }
            QueryOutcome::NextAuthorities { .. } | QueryOutcome::FollowCname { .. } => {}
        }
    }
}

fn build_request(sname: &DomainName, stype: RecordType) -> Result<Message, ResolverError> {
    let mut query = Query::new();
    query.set_name(records::to_wire_name(sname)?);
    query.set_query_type(records::to_wire_type(stype));
    query.set_query_class(DNSClass::IN);

    let mut message = Message::new(fastrand::u16(..), MessageType::Query, OpCode::Query);
    message.set_recursion_desired(false);
    message.add_query(query);
    Ok(message)
}
