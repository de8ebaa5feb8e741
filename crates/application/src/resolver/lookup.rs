//! Whole-resolution conveniences built on the iterator.

use super::classify::QueryOutcome;
use super::iter::{ResolutionIter, ResolutionStep};
use super::records;
use crate::cache::{AddressCache, AuthorityCache};
use crate::ports::DnsTransport;
use ferrous_resolver_domain::{
    DomainName, NameServerSet, RecordType, ResolverConfig, ResolverError,
};
use hickory_proto::rr::{Record, RecordType as WireType};
use std::sync::Arc;
use tracing::{debug, info};

/// A drained resolution: every step taken plus the terminal outcome.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub steps: Vec<ResolutionStep>,
    pub outcome: QueryOutcome,
}

impl Resolution {
    /// The answer records, when the outcome carries any.
    pub fn answers(&self) -> &[Record] {
        match &self.outcome {
            QueryOutcome::AuthoritativeAnswer { records, .. }
            | QueryOutcome::NonAuthoritativeAnswer { records } => records,
            _ => &[],
        }
    }

    pub fn is_success(&self) -> bool {
        !self.answers().is_empty()
    }

    /// Wall-clock span from the first request to the last response.
    pub fn duration(&self) -> chrono::Duration {
        match (self.steps.first(), self.steps.last()) {
            (Some(first), Some(last)) => last.finished_at - first.started_at,
            _ => chrono::Duration::zero(),
        }
    }
}

/// Facade owning the transport and the two shared caches. Cheap to clone
/// via the `with_*` builders; sharing a cache across resolvers is explicit.
pub struct Resolver {
    transport: Arc<dyn DnsTransport>,
    config: Arc<ResolverConfig>,
    addresses: Arc<AddressCache>,
    referrals: Arc<AuthorityCache>,
}

impl Resolver {
    pub fn new(transport: Arc<dyn DnsTransport>, config: ResolverConfig) -> Self {
        Self {
            transport,
            config: Arc::new(config),
            addresses: Arc::new(AddressCache::new()),
            referrals: Arc::new(AuthorityCache::new()),
        }
    }

    pub fn with_address_cache(mut self, cache: Arc<AddressCache>) -> Self {
        self.addresses = cache;
        self
    }

    pub fn with_authority_cache(mut self, cache: Arc<AuthorityCache>) -> Self {
        self.referrals = cache;
        self
    }

    /// A fresh step iterator for `(sname, stype)`.
    pub fn iterate(&self, sname: DomainName, stype: RecordType) -> ResolutionIter {
        ResolutionIter::new(
            sname,
            stype,
            Arc::clone(&self.transport),
            Arc::clone(&self.config),
            Arc::clone(&self.addresses),
            Arc::clone(&self.referrals),
        )
    }

    /// Drain a full resolution of `(name, rtype)`.
    pub async fn resolve(
        &self,
        name: &DomainName,
        rtype: RecordType,
    ) -> Result<Resolution, ResolverError> {
        info!(domain = %name, record_type = %rtype, "resolution started");
        let mut iter = self.iterate(name.clone(), rtype);
        let mut steps = Vec::new();
        while let Some(step) = iter.advance().await? {
            steps.push(step);
        }
        let outcome = iter.into_outcome().ok_or(ResolverError::NoOutcome)?;

        if let QueryOutcome::AuthoritativeAnswer { records, .. }
        | QueryOutcome::NonAuthoritativeAnswer { records } = &outcome
        {
            for record in records {
                debug!(record = %record, "answer record");
            }
        }

        Ok(Resolution { steps, outcome })
    }

    /// The authoritative name servers for `name`: the last non-empty
    /// referral seen while draining a QTYPE NS resolution, plus whether an
    /// authoritative NS answer confirmed it.
    pub async fn find_authoritative_name_servers(
        &self,
        name: &DomainName,
    ) -> Result<(NameServerSet, bool), ResolverError> {
        let mut iter = self.iterate(name.clone(), RecordType::NS);
        let mut last = NameServerSet::empty();
        let mut authoritative = false;
        while let Some(step) = iter.advance().await? {
            if let Some(next) = &step.next_authorities {
                if !next.is_empty() {
                    last = next.clone();
                    authoritative = false;
                }
            }
            if let QueryOutcome::AuthoritativeAnswer {
                records: answers, ..
            } = &step.outcome
            {
                let set = records::find_authorities(name, answers, step.response.additionals());
                if !set.is_empty() {
                    last = set;
                }
                authoritative = true;
            }
        }
        Ok((last, authoritative))
    }

    /// Whether `name` can receive mail: an ANY resolution yielding MX or
    /// address answers.
    pub async fn can_receive_mail(&self, name: &DomainName) -> Result<bool, ResolverError> {
        let resolution = self.resolve(name, RecordType::ANY).await?;
        Ok(resolution.answers().iter().any(|record| {
            matches!(
                record.record_type(),
                WireType::MX | WireType::A | WireType::AAAA
            )
        }))
    }
}
